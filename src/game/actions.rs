// Demo actions and their default bindings

use crate::engine::input::{
    ActionBinding, ActionDefinition, BindingTable, GamepadAxis, GamepadButton, InputBinding,
};
use winit::event::MouseButton;
use winit::keyboard::KeyCode;

pub const FIRE: &str = "fire";
pub const MOVE: &str = "move";
pub const MENU: &str = "menu";

/// Default bindings
///
/// Keyboard and mouse always; gamepad bindings (pad 0) only when a gamepad backend exists,
/// since every bound device kind needs a backend.
pub fn default_bindings(with_gamepad: bool) -> BindingTable {
    let mut fire = ActionBinding::new(ActionDefinition::button(FIRE))
        // Space or left click
        .with(InputBinding::key(KeyCode::Space))
        .with(InputBinding::mouse_button(MouseButton::Left));

    let mut movement = ActionBinding::new(ActionDefinition::vector(MOVE))
        // WASD and arrows
        .with(InputBinding::keys_vector(KeyCode::KeyW, KeyCode::KeyS, KeyCode::KeyA, KeyCode::KeyD))
        .with(InputBinding::keys_vector(
            KeyCode::ArrowUp,
            KeyCode::ArrowDown,
            KeyCode::ArrowLeft,
            KeyCode::ArrowRight,
        ));

    let mut menu = ActionBinding::new(ActionDefinition::button(MENU)).with(InputBinding::key(KeyCode::Escape));

    if with_gamepad {
        fire = fire.with(InputBinding::gamepad_button(0, GamepadButton::South));
        movement = movement.with(InputBinding::gamepad_stick(0, GamepadAxis::LeftStickX, GamepadAxis::LeftStickY));
        menu = menu.with(InputBinding::gamepad_button(0, GamepadButton::Start));
    }

    BindingTable::new().with(fire).with(movement).with(menu)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::input::DeviceKind;

    #[test]
    fn test_default_bindings_validate() {
        let table = default_bindings(true);
        let catalog = table.derive_catalog().unwrap();
        assert!(table.validate(&catalog).is_ok());
        assert_eq!(catalog.len(), 3);
    }

    #[test]
    fn test_gamepad_bindings_are_optional() {
        let without: Vec<_> = default_bindings(false).devices().into_iter().collect();
        assert_eq!(without, vec![DeviceKind::Keyboard, DeviceKind::Mouse]);

        assert!(default_bindings(true).devices().contains(&DeviceKind::Gamepad));
    }
}
