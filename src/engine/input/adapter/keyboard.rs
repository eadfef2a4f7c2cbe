// Keyboard adapters

use super::InputAdapter;
use crate::engine::input::action::{ActionKind, ActionValue};
use crate::engine::input::device::{DeviceKind, DeviceState, InputId};
use crate::engine::input::event::{DeviceEvent, KeyEvent};
use crate::math::digital_axis;
use glam::Vec2;
use winit::keyboard::KeyCode;

/// Whether `event` is a press or release of one of `codes` (auto-repeat excluded)
fn is_transition_of(event: &DeviceEvent, codes: &[KeyCode]) -> bool {
    match event {
        DeviceEvent::Keyboard(KeyEvent::Down { repeat: true, .. }) => false,
        DeviceEvent::Keyboard(key) => codes.contains(&key.code()),
        _ => false,
    }
}

fn held(device: &dyn DeviceState, code: KeyCode) -> bool {
    device.is_input_active(InputId::Key(code))
}

/// Button action driven by one physical key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyboardButtonAdapter {
    pub code: KeyCode,
}

impl KeyboardButtonAdapter {
    pub fn new(code: KeyCode) -> Self {
        Self { code }
    }
}

impl InputAdapter for KeyboardButtonAdapter {
    fn device(&self) -> DeviceKind {
        DeviceKind::Keyboard
    }

    fn output(&self) -> ActionKind {
        ActionKind::Button
    }

    fn matches(&self, event: &DeviceEvent) -> bool {
        is_transition_of(event, &[self.code])
    }

    fn adapt(&self, _event: &DeviceEvent, device: &dyn DeviceState) -> ActionValue {
        ActionValue::Button(held(device, self.code))
    }
}

/// Axis action from a pair of keys: -1, 0 or 1 (both held cancel out)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyboardAxisAdapter {
    pub negative: KeyCode,
    pub positive: KeyCode,
}

impl KeyboardAxisAdapter {
    pub fn new(negative: KeyCode, positive: KeyCode) -> Self {
        Self { negative, positive }
    }
}

impl InputAdapter for KeyboardAxisAdapter {
    fn device(&self) -> DeviceKind {
        DeviceKind::Keyboard
    }

    fn output(&self) -> ActionKind {
        ActionKind::Axis
    }

    fn matches(&self, event: &DeviceEvent) -> bool {
        is_transition_of(event, &[self.negative, self.positive])
    }

    fn adapt(&self, _event: &DeviceEvent, device: &dyn DeviceState) -> ActionValue {
        ActionValue::Axis(digital_axis(held(device, self.negative), held(device, self.positive)))
    }
}

/// Vector action from four keys; `up` is +y
///
/// Diagonals are normalized so keyboard movement is no faster than a full stick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyboardVectorAdapter {
    pub up: KeyCode,
    pub down: KeyCode,
    pub left: KeyCode,
    pub right: KeyCode,
}

impl KeyboardVectorAdapter {
    pub fn new(up: KeyCode, down: KeyCode, left: KeyCode, right: KeyCode) -> Self {
        Self {
            up,
            down,
            left,
            right,
        }
    }

    /// The usual WASD layout
    pub fn wasd() -> Self {
        Self::new(KeyCode::KeyW, KeyCode::KeyS, KeyCode::KeyA, KeyCode::KeyD)
    }

    /// Arrow keys
    pub fn arrows() -> Self {
        Self::new(
            KeyCode::ArrowUp,
            KeyCode::ArrowDown,
            KeyCode::ArrowLeft,
            KeyCode::ArrowRight,
        )
    }
}

impl InputAdapter for KeyboardVectorAdapter {
    fn device(&self) -> DeviceKind {
        DeviceKind::Keyboard
    }

    fn output(&self) -> ActionKind {
        ActionKind::Vector
    }

    fn matches(&self, event: &DeviceEvent) -> bool {
        is_transition_of(event, &[self.up, self.down, self.left, self.right])
    }

    fn adapt(&self, _event: &DeviceEvent, device: &dyn DeviceState) -> ActionValue {
        let direction = Vec2::new(
            digital_axis(held(device, self.left), held(device, self.right)),
            digital_axis(held(device, self.down), held(device, self.up)),
        );
        ActionValue::Vector(direction.normalize_or_zero())
    }
}
