// Binding profiles: actions and bindings declared in TOML
//
// A profile is plain data. `build` turns it into a validated catalog and binding table;
// nothing here touches devices.
//
// ```toml
// name = "default"
//
// [[actions]]
// name = "fire"
// kind = "button"
//
// [[bindings]]
// action = "fire"
// adapter = { type = "key", key = "Space" }
//
// [[bindings]]
// action = "fire"
// adapter = { type = "gamepad_button", pad = 0, button = "South" }
// ```

use super::action::{ActionCatalog, ActionDefinition, ActionKind, ActionValue};
use super::adapter::gamepad::DEFAULT_DEADZONE;
use super::adapter::{GamepadAxisAdapter, GamepadStickAdapter};
use super::binding::{ActionBinding, BindingTable, InputBinding};
use super::device::{GamepadAxis, GamepadButton};
use super::InputError;
use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::path::Path;
use winit::event::MouseButton;
use winit::keyboard::KeyCode;

/// A named set of actions and their bindings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BindingProfile {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub actions: Vec<ActionSpec>,
    #[serde(default)]
    pub bindings: Vec<BindingSpec>,
}

/// One action declaration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionSpec {
    pub name: String,
    pub kind: ActionKind,
    #[serde(default)]
    pub initial: Option<InitialValue>,
}

/// Initial value written the natural way for each kind: `true`, `0.5` or `[0.0, 1.0]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InitialValue {
    Button(bool),
    Axis(f32),
    Vector([f32; 2]),
}

impl From<InitialValue> for ActionValue {
    fn from(value: InitialValue) -> Self {
        match value {
            InitialValue::Button(pressed) => ActionValue::Button(pressed),
            InitialValue::Axis(value) => ActionValue::Axis(value),
            InitialValue::Vector([x, y]) => ActionValue::Vector(Vec2::new(x, y)),
        }
    }
}

/// One binding declaration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BindingSpec {
    pub action: String,
    #[serde(default)]
    pub input_id: Option<String>,
    pub adapter: AdapterSpec,
}

fn default_deadzone() -> f32 {
    DEFAULT_DEADZONE
}

/// Built-in adapter selection, tagged by `type`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AdapterSpec {
    Key {
        key: KeyCode,
    },
    KeysAxis {
        negative: KeyCode,
        positive: KeyCode,
    },
    KeysVector {
        up: KeyCode,
        down: KeyCode,
        left: KeyCode,
        right: KeyCode,
    },
    MouseButton {
        button: MouseButton,
    },
    MousePosition,
    MouseWheel,
    GamepadButton {
        #[serde(default)]
        pad: usize,
        button: GamepadButton,
    },
    GamepadAxis {
        #[serde(default)]
        pad: usize,
        axis: GamepadAxis,
        #[serde(default = "default_deadzone")]
        deadzone: f32,
        #[serde(default)]
        invert: bool,
    },
    GamepadStick {
        #[serde(default)]
        pad: usize,
        x: GamepadAxis,
        y: GamepadAxis,
        #[serde(default = "default_deadzone")]
        deadzone: f32,
    },
    VirtualButton {
        button: u16,
    },
    VirtualAxis {
        axis: u16,
    },
}

impl AdapterSpec {
    /// Binding using this adapter, labelled the way the in-code constructors label it
    pub fn to_binding(&self) -> InputBinding {
        match *self {
            AdapterSpec::Key { key } => InputBinding::key(key),
            AdapterSpec::KeysAxis { negative, positive } => InputBinding::keys_axis(negative, positive),
            AdapterSpec::KeysVector {
                up,
                down,
                left,
                right,
            } => InputBinding::keys_vector(up, down, left, right),
            AdapterSpec::MouseButton { button } => InputBinding::mouse_button(button),
            AdapterSpec::MousePosition => InputBinding::mouse_position(),
            AdapterSpec::MouseWheel => InputBinding::mouse_wheel(),
            AdapterSpec::GamepadButton { pad, button } => InputBinding::gamepad_button(pad, button),
            AdapterSpec::GamepadAxis {
                pad,
                axis,
                deadzone,
                invert,
            } => {
                let mut adapter = GamepadAxisAdapter::new(pad, axis).with_deadzone(deadzone);
                adapter.invert = invert;
                InputBinding::gamepad_axis(pad, axis).with_adapter(adapter)
            }
            AdapterSpec::GamepadStick { pad, x, y, deadzone } => {
                let adapter = GamepadStickAdapter::new(pad, x, y).with_deadzone(deadzone);
                InputBinding::gamepad_stick(pad, x, y).with_adapter(adapter)
            }
            AdapterSpec::VirtualButton { button } => InputBinding::virtual_button(button),
            AdapterSpec::VirtualAxis { axis } => InputBinding::virtual_axis(axis),
        }
    }
}

impl BindingProfile {
    /// Parse a profile from TOML text
    pub fn from_toml_str(text: &str) -> Result<Self, InputError> {
        Ok(toml::from_str(text)?)
    }

    /// Load a profile from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, InputError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let profile = Self::from_toml_str(&text)?;
        log::info!(
            "Loaded binding profile '{}' from {}: {} action(s), {} binding(s)",
            profile.name,
            path.display(),
            profile.actions.len(),
            profile.bindings.len()
        );
        Ok(profile)
    }

    /// Build the catalog and binding table this profile describes
    ///
    /// Every declared action gets an entry in the table, in declaration order; bindings
    /// keep their order within each action.
    pub fn build(&self) -> Result<(ActionCatalog, BindingTable), InputError> {
        let mut catalog = ActionCatalog::new();
        for spec in &self.actions {
            let mut definition = ActionDefinition::new(spec.name.as_str(), spec.kind);
            if let Some(initial) = spec.initial {
                definition = definition.with_initial_value(initial)?;
            }
            catalog.insert(definition)?;
        }

        let mut entries: Vec<ActionBinding> = catalog.iter().cloned().map(ActionBinding::new).collect();
        for spec in &self.bindings {
            let entry = entries
                .iter_mut()
                .find(|entry| entry.name() == spec.action)
                .ok_or_else(|| InputError::UnknownAction(spec.action.clone()))?;

            let mut binding = spec.adapter.to_binding();
            if let Some(input_id) = &spec.input_id {
                binding = binding.with_input_id(input_id.as_str());
            }
            entry.bindings.push(binding);
        }

        let table: BindingTable = entries.into_iter().collect();
        table.validate(&catalog)?;
        Ok((catalog, table))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::input::device::DeviceKind;
    use approx::assert_relative_eq;

    const PROFILE: &str = r#"
        name = "test"
        description = "fire and move"

        [[actions]]
        name = "fire"
        kind = "button"

        [[actions]]
        name = "move"
        kind = "vector"

        [[actions]]
        name = "throttle"
        kind = "axis"
        initial = 0.5

        [[bindings]]
        action = "fire"
        adapter = { type = "key", key = "Space" }

        [[bindings]]
        action = "fire"
        input_id = "pad-a"
        adapter = { type = "gamepad_button", button = "South" }

        [[bindings]]
        action = "move"
        adapter = { type = "keys_vector", up = "KeyW", down = "KeyS", left = "KeyA", right = "KeyD" }

        [[bindings]]
        action = "move"
        adapter = { type = "gamepad_stick", x = "LeftStickX", y = "LeftStickY", deadzone = 0.2 }

        [[bindings]]
        action = "throttle"
        adapter = { type = "mouse_wheel" }
    "#;

    #[test]
    fn test_parse_profile() {
        let profile = BindingProfile::from_toml_str(PROFILE).unwrap();
        assert_eq!(profile.name, "test");
        assert_eq!(profile.actions.len(), 3);
        assert_eq!(profile.actions[2].initial, Some(InitialValue::Axis(0.5)));
        assert_eq!(
            profile.bindings[1].adapter,
            AdapterSpec::GamepadButton {
                pad: 0,
                button: GamepadButton::South
            }
        );
        match &profile.bindings[3].adapter {
            AdapterSpec::GamepadStick { deadzone, .. } => assert_relative_eq!(*deadzone, 0.2),
            other => panic!("unexpected adapter {:?}", other),
        }
    }

    #[test]
    fn test_build_profile() {
        let (catalog, table) = BindingProfile::from_toml_str(PROFILE).unwrap().build().unwrap();

        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.get("throttle").unwrap().initial_value(), ActionValue::Axis(0.5));

        let fire = table.iter().find(|entry| entry.name() == "fire").unwrap();
        let labels: Vec<_> = fire.bindings.iter().map(|b| b.input_id.as_str()).collect();
        assert_eq!(labels, vec!["Space", "pad-a"]);

        let devices: Vec<_> = table.devices().into_iter().collect();
        assert_eq!(devices, vec![DeviceKind::Keyboard, DeviceKind::Mouse, DeviceKind::Gamepad]);
    }

    #[test]
    fn test_vector_initial_value() {
        let text = r#"
            [[actions]]
            name = "aim"
            kind = "vector"
            initial = [0.0, 1.0]
        "#;
        let (catalog, _) = BindingProfile::from_toml_str(text).unwrap().build().unwrap();
        assert_eq!(
            catalog.get("aim").unwrap().initial_value(),
            ActionValue::Vector(Vec2::new(0.0, 1.0))
        );
    }

    #[test]
    fn test_binding_for_unknown_action() {
        let text = r#"
            [[bindings]]
            action = "jump"
            adapter = { type = "key", key = "Space" }
        "#;
        let result = BindingProfile::from_toml_str(text).unwrap().build();
        assert!(matches!(result, Err(InputError::UnknownAction(name)) if name == "jump"));
    }

    #[test]
    fn test_wrong_initial_kind() {
        let text = r#"
            [[actions]]
            name = "fire"
            kind = "button"
            initial = 1.0
        "#;
        let result = BindingProfile::from_toml_str(text).unwrap().build();
        assert!(matches!(result, Err(InputError::InvalidInitialValue { .. })));
    }

    #[test]
    fn test_adapter_kind_checked_at_build() {
        let text = r#"
            [[actions]]
            name = "fire"
            kind = "button"

            [[bindings]]
            action = "fire"
            adapter = { type = "mouse_position" }
        "#;
        let result = BindingProfile::from_toml_str(text).unwrap().build();
        assert!(matches!(result, Err(InputError::AdapterKindMismatch { .. })));
    }

    #[test]
    fn test_malformed_toml() {
        let result = BindingProfile::from_toml_str("actions = 3");
        assert!(matches!(result, Err(InputError::Profile(_))));

        let result = BindingProfile::from_toml_str(
            r#"
            [[bindings]]
            action = "fire"
            adapter = { type = "teleport" }
        "#,
        );
        assert!(matches!(result, Err(InputError::Profile(_))));
    }

    #[test]
    fn test_load_missing_file() {
        let result = BindingProfile::load("/definitely/not/here.toml");
        assert!(matches!(result, Err(InputError::Io(_))));
    }

    #[test]
    fn test_bundled_profile_builds() {
        let profile = BindingProfile::from_toml_str(include_str!("../../../profiles/default.toml")).unwrap();
        let (catalog, table) = profile.build().unwrap();
        assert_eq!(profile.name, "default");
        assert_eq!(
            profile.description.as_deref(),
            Some("Fire, move, menu and zoom on keyboard and mouse")
        );
        assert!(catalog.contains("fire") && catalog.contains("zoom"));
        assert!(!table.devices().contains(&DeviceKind::Gamepad));
    }

    #[test]
    fn test_gamepad_axis_spec_options() {
        let spec = AdapterSpec::GamepadAxis {
            pad: 1,
            axis: GamepadAxis::RightStickY,
            deadzone: 0.3,
            invert: true,
        };
        let binding = spec.to_binding();
        assert_eq!(binding.device, DeviceKind::Gamepad);
        let debug = format!("{:?}", binding.adapter);
        assert!(debug.contains("invert: true"));
        assert!(debug.contains("deadzone: 0.3"));
    }
}
