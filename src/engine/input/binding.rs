// Binding table: which physical inputs drive which actions

use super::action::{ActionCatalog, ActionDefinition};
use super::adapter::{
    GamepadAxisAdapter, GamepadButtonAdapter, GamepadStickAdapter, InputAdapter, KeyboardAxisAdapter,
    KeyboardButtonAdapter, KeyboardVectorAdapter, MouseButtonAdapter, MousePositionAdapter,
    MouseWheelAdapter, VirtualAxisAdapter, VirtualButtonAdapter,
};
use super::device::{DeviceKind, GamepadAxis, GamepadButton};
use super::InputError;
use std::collections::{BTreeSet, HashSet};
use std::fmt;
use std::rc::Rc;
use winit::event::MouseButton;
use winit::keyboard::KeyCode;

/// One physical input bound to an action through an adapter
///
/// `input_id` is a label for diagnostics and editors; matching is the adapter's job.
#[derive(Clone)]
pub struct InputBinding {
    pub device: DeviceKind,
    pub input_id: String,
    pub adapter: Rc<dyn InputAdapter>,
}

impl InputBinding {
    pub fn new(device: DeviceKind, input_id: impl Into<String>, adapter: impl InputAdapter + 'static) -> Self {
        Self {
            device,
            input_id: input_id.into(),
            adapter: Rc::new(adapter),
        }
    }

    /// Bind an adapter on the device it reads, labelled by the adapter itself
    pub fn from_adapter(adapter: impl InputAdapter + 'static) -> Self {
        let input_id = format!("{:?}", adapter);
        Self::new(adapter.device(), input_id, adapter)
    }

    pub fn key(code: KeyCode) -> Self {
        Self::new(DeviceKind::Keyboard, format!("{:?}", code), KeyboardButtonAdapter::new(code))
    }

    pub fn keys_axis(negative: KeyCode, positive: KeyCode) -> Self {
        Self::new(
            DeviceKind::Keyboard,
            format!("{:?}/{:?}", negative, positive),
            KeyboardAxisAdapter::new(negative, positive),
        )
    }

    pub fn keys_vector(up: KeyCode, down: KeyCode, left: KeyCode, right: KeyCode) -> Self {
        Self::new(
            DeviceKind::Keyboard,
            format!("{:?}/{:?}/{:?}/{:?}", up, down, left, right),
            KeyboardVectorAdapter::new(up, down, left, right),
        )
    }

    pub fn mouse_button(button: MouseButton) -> Self {
        Self::new(DeviceKind::Mouse, format!("{:?}", button), MouseButtonAdapter::new(button))
    }

    pub fn mouse_position() -> Self {
        Self::new(DeviceKind::Mouse, "position", MousePositionAdapter)
    }

    pub fn mouse_wheel() -> Self {
        Self::new(DeviceKind::Mouse, "wheel", MouseWheelAdapter)
    }

    pub fn gamepad_button(pad: usize, button: GamepadButton) -> Self {
        Self::new(
            DeviceKind::Gamepad,
            format!("{}:{:?}", pad, button),
            GamepadButtonAdapter::new(pad, button),
        )
    }

    pub fn gamepad_axis(pad: usize, axis: GamepadAxis) -> Self {
        Self::new(
            DeviceKind::Gamepad,
            format!("{}:{:?}", pad, axis),
            GamepadAxisAdapter::new(pad, axis),
        )
    }

    pub fn gamepad_stick(pad: usize, x: GamepadAxis, y: GamepadAxis) -> Self {
        Self::new(
            DeviceKind::Gamepad,
            format!("{}:{:?}+{:?}", pad, x, y),
            GamepadStickAdapter::new(pad, x, y),
        )
    }

    pub fn virtual_button(button: u16) -> Self {
        Self::new(DeviceKind::Virtual, format!("button{}", button), VirtualButtonAdapter::new(button))
    }

    pub fn virtual_axis(axis: u16) -> Self {
        Self::new(DeviceKind::Virtual, format!("axis{}", axis), VirtualAxisAdapter::new(axis))
    }

    /// Swap the adapter, keeping device and label
    pub fn with_adapter(mut self, adapter: impl InputAdapter + 'static) -> Self {
        self.adapter = Rc::new(adapter);
        self
    }

    /// Replace the diagnostic label
    pub fn with_input_id(mut self, input_id: impl Into<String>) -> Self {
        self.input_id = input_id.into();
        self
    }
}

impl fmt::Debug for InputBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InputBinding")
            .field("device", &self.device)
            .field("input_id", &self.input_id)
            .field("adapter", &self.adapter)
            .finish()
    }
}

/// An action and the ordered inputs that drive it
#[derive(Debug, Clone)]
pub struct ActionBinding {
    pub action: ActionDefinition,
    pub bindings: Vec<InputBinding>,
}

impl ActionBinding {
    pub fn new(action: ActionDefinition) -> Self {
        Self {
            action,
            bindings: Vec::new(),
        }
    }

    /// Append a binding; earlier bindings are evaluated first
    pub fn with(mut self, binding: InputBinding) -> Self {
        self.bindings.push(binding);
        self
    }

    pub fn name(&self) -> &str {
        self.action.name()
    }
}

/// Ordered list of action bindings, one per action
#[derive(Debug, Clone, Default)]
pub struct BindingTable {
    entries: Vec<ActionBinding>,
}

impl BindingTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, binding: ActionBinding) -> Self {
        self.entries.push(binding);
        self
    }

    pub fn push(&mut self, binding: ActionBinding) {
        self.entries.push(binding);
    }

    pub fn iter(&self) -> impl Iterator<Item = &ActionBinding> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Device kinds referenced by at least one input binding
    pub fn devices(&self) -> BTreeSet<DeviceKind> {
        self.entries
            .iter()
            .flat_map(|entry| entry.bindings.iter().map(|binding| binding.device))
            .collect()
    }

    /// Device kinds in the order they are first referenced (table order, then binding order)
    pub fn device_order(&self) -> Vec<DeviceKind> {
        let mut order = Vec::new();
        for binding in self.entries.iter().flat_map(|entry| entry.bindings.iter()) {
            if !order.contains(&binding.device) {
                order.push(binding.device);
            }
        }
        order
    }

    /// Catalog made of the actions embedded in this table, in table order
    pub fn derive_catalog(&self) -> Result<ActionCatalog, InputError> {
        ActionCatalog::from_definitions(self.entries.iter().map(|entry| entry.action.clone()))
    }

    /// Check the table against a catalog
    ///
    /// Every action must exist in the catalog with the same definition, appear once, and
    /// every adapter must read the binding's device and produce the action's kind.
    pub fn validate(&self, catalog: &ActionCatalog) -> Result<(), InputError> {
        let mut seen = HashSet::new();

        for entry in &self.entries {
            let name = entry.name();
            if !seen.insert(name) {
                return Err(InputError::DuplicateAction(name.to_string()));
            }

            let definition = catalog
                .get(name)
                .ok_or_else(|| InputError::UnknownAction(name.to_string()))?;
            if *definition != entry.action {
                return Err(InputError::ActionMismatch {
                    name: name.to_string(),
                });
            }

            for binding in &entry.bindings {
                let adapter_device = binding.adapter.device();
                if binding.device != adapter_device {
                    return Err(InputError::DeviceMismatch {
                        action: name.to_string(),
                        binding: binding.device,
                        adapter: adapter_device,
                    });
                }

                let produced = binding.adapter.output();
                if produced != definition.kind() {
                    return Err(InputError::AdapterKindMismatch {
                        action: name.to_string(),
                        expected: definition.kind(),
                        actual: produced,
                    });
                }
            }
        }

        Ok(())
    }
}

impl FromIterator<ActionBinding> for BindingTable {
    fn from_iter<I: IntoIterator<Item = ActionBinding>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fire() -> ActionBinding {
        ActionBinding::new(ActionDefinition::button("fire"))
            .with(InputBinding::key(KeyCode::Space))
            .with(InputBinding::gamepad_button(0, GamepadButton::South))
    }

    #[test]
    fn test_devices_in_use() {
        let table = BindingTable::new()
            .with(fire())
            .with(ActionBinding::new(ActionDefinition::vector("look")));

        let devices: Vec<_> = table.devices().into_iter().collect();
        assert_eq!(devices, vec![DeviceKind::Keyboard, DeviceKind::Gamepad]);
    }

    #[test]
    fn test_device_order_follows_first_reference() {
        let table = BindingTable::new()
            .with(ActionBinding::new(ActionDefinition::axis("zoom")).with(InputBinding::mouse_wheel()))
            .with(fire())
            .with(ActionBinding::new(ActionDefinition::button("jump")).with(InputBinding::key(KeyCode::KeyJ)));

        assert_eq!(
            table.device_order(),
            vec![DeviceKind::Mouse, DeviceKind::Keyboard, DeviceKind::Gamepad]
        );
    }

    #[test]
    fn test_input_id_labels() {
        assert_eq!(InputBinding::key(KeyCode::Space).input_id, "Space");
        assert_eq!(InputBinding::gamepad_button(1, GamepadButton::South).input_id, "1:South");
        assert_eq!(
            InputBinding::virtual_axis(3).with_input_id("throttle").input_id,
            "throttle"
        );
    }

    #[test]
    fn test_derive_catalog_keeps_order() {
        let table = BindingTable::new()
            .with(fire())
            .with(ActionBinding::new(ActionDefinition::axis("zoom")));
        let catalog = table.derive_catalog().unwrap();
        let names: Vec<_> = catalog.iter().map(|action| action.name()).collect();
        assert_eq!(names, vec!["fire", "zoom"]);
        assert!(table.validate(&catalog).is_ok());
    }

    #[test]
    fn test_unknown_action_is_rejected() {
        let table = BindingTable::new().with(fire());
        let catalog = ActionCatalog::new();
        assert!(matches!(
            table.validate(&catalog),
            Err(InputError::UnknownAction(name)) if name == "fire"
        ));
    }

    #[test]
    fn test_duplicate_action_is_rejected() {
        let table = BindingTable::new().with(fire()).with(fire());
        let catalog = ActionCatalog::from_definitions([ActionDefinition::button("fire")]).unwrap();
        assert!(matches!(table.validate(&catalog), Err(InputError::DuplicateAction(_))));
        assert!(matches!(table.derive_catalog(), Err(InputError::DuplicateAction(_))));
    }

    #[test]
    fn test_definition_mismatch_is_rejected() {
        let table = BindingTable::new().with(fire());
        let catalog = ActionCatalog::from_definitions([ActionDefinition::axis("fire")]).unwrap();
        assert!(matches!(
            table.validate(&catalog),
            Err(InputError::ActionMismatch { .. })
        ));
    }

    #[test]
    fn test_adapter_kind_mismatch_is_rejected() {
        let table = BindingTable::new()
            .with(ActionBinding::new(ActionDefinition::axis("zoom")).with(InputBinding::key(KeyCode::KeyZ)));
        let catalog = table.derive_catalog().unwrap();
        assert!(matches!(
            table.validate(&catalog),
            Err(InputError::AdapterKindMismatch {
                expected: crate::engine::input::ActionKind::Axis,
                actual: crate::engine::input::ActionKind::Button,
                ..
            })
        ));
    }

    #[test]
    fn test_device_mismatch_is_rejected() {
        let binding = InputBinding::new(DeviceKind::Mouse, "Space", KeyboardButtonAdapter::new(KeyCode::Space));
        let table = BindingTable::new().with(ActionBinding::new(ActionDefinition::button("fire")).with(binding));
        let catalog = table.derive_catalog().unwrap();
        assert!(matches!(
            table.validate(&catalog),
            Err(InputError::DeviceMismatch {
                binding: DeviceKind::Mouse,
                adapter: DeviceKind::Keyboard,
                ..
            })
        ));
    }

    #[test]
    fn test_from_adapter_uses_adapter_device() {
        let binding = InputBinding::from_adapter(GamepadStickAdapter::right(0));
        assert_eq!(binding.device, DeviceKind::Gamepad);
        assert!(binding.input_id.contains("GamepadStickAdapter"));
    }
}
