// Mouse adapters

use super::InputAdapter;
use crate::engine::input::action::{ActionKind, ActionValue};
use crate::engine::input::device::{DeviceKind, DeviceState, InputId, PointerAxis};
use crate::engine::input::event::{DeviceEvent, MouseEvent};
use glam::Vec2;
use winit::event::MouseButton;

/// Button action driven by a mouse button
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MouseButtonAdapter {
    pub button: MouseButton,
}

impl MouseButtonAdapter {
    pub fn new(button: MouseButton) -> Self {
        Self { button }
    }
}

impl InputAdapter for MouseButtonAdapter {
    fn device(&self) -> DeviceKind {
        DeviceKind::Mouse
    }

    fn output(&self) -> ActionKind {
        ActionKind::Button
    }

    fn matches(&self, event: &DeviceEvent) -> bool {
        matches!(
            event,
            DeviceEvent::Mouse(MouseEvent::ButtonDown(button) | MouseEvent::ButtonUp(button))
                if *button == self.button
        )
    }

    fn adapt(&self, _event: &DeviceEvent, device: &dyn DeviceState) -> ActionValue {
        ActionValue::Button(device.is_input_active(InputId::MouseButton(self.button)))
    }
}

/// Vector action tracking the pointer position in window coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MousePositionAdapter;

impl InputAdapter for MousePositionAdapter {
    fn device(&self) -> DeviceKind {
        DeviceKind::Mouse
    }

    fn output(&self) -> ActionKind {
        ActionKind::Vector
    }

    fn matches(&self, event: &DeviceEvent) -> bool {
        matches!(event, DeviceEvent::Mouse(MouseEvent::Moved { .. }))
    }

    fn adapt(&self, _event: &DeviceEvent, device: &dyn DeviceState) -> ActionValue {
        ActionValue::Vector(device.pointer_position().unwrap_or(Vec2::ZERO))
    }
}

/// Axis action following the wheel: the delta of the last drain, 0 once the wheel rests
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MouseWheelAdapter;

impl InputAdapter for MouseWheelAdapter {
    fn device(&self) -> DeviceKind {
        DeviceKind::Mouse
    }

    fn output(&self) -> ActionKind {
        ActionKind::Axis
    }

    fn matches(&self, event: &DeviceEvent) -> bool {
        matches!(event, DeviceEvent::Mouse(MouseEvent::Wheel { .. }))
    }

    fn adapt(&self, _event: &DeviceEvent, device: &dyn DeviceState) -> ActionValue {
        ActionValue::Axis(device.axis_value(InputId::Pointer(PointerAxis::Wheel)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::input::device::{MouseState, RawMouseEvent};
    use crate::engine::input::testing::snapshot_with;

    #[test]
    fn test_button_adapter() {
        let adapter = MouseButtonAdapter::new(MouseButton::Right);
        let event = DeviceEvent::Mouse(MouseEvent::ButtonDown(MouseButton::Right));
        assert!(adapter.matches(&event));
        assert!(!adapter.matches(&DeviceEvent::Mouse(MouseEvent::ButtonDown(MouseButton::Left))));

        let device = snapshot_with::<MouseState>(vec![RawMouseEvent::Pressed(MouseButton::Right)]);
        assert_eq!(adapter.adapt(&event, &device), ActionValue::Button(true));
    }

    #[test]
    fn test_position_adapter() {
        let adapter = MousePositionAdapter;
        let event = DeviceEvent::Mouse(MouseEvent::Moved {
            position: Vec2::new(3.0, 4.0),
        });
        assert!(adapter.matches(&event));
        assert!(!adapter.matches(&DeviceEvent::Mouse(MouseEvent::Wheel { delta: 1.0 })));

        let device = snapshot_with::<MouseState>(vec![RawMouseEvent::Moved(Vec2::new(3.0, 4.0))]);
        assert_eq!(adapter.adapt(&event, &device), ActionValue::Vector(Vec2::new(3.0, 4.0)));
    }

    #[test]
    fn test_wheel_adapter_reports_drain_total() {
        let adapter = MouseWheelAdapter;
        let device = snapshot_with::<MouseState>(vec![RawMouseEvent::Wheel(1.0), RawMouseEvent::Wheel(1.5)]);
        let event = DeviceEvent::Mouse(MouseEvent::Wheel { delta: 1.5 });
        assert_eq!(adapter.adapt(&event, &device), ActionValue::Axis(2.5));
    }
}
