// Normalized device events
//
// Device snapshots turn raw backend events into these after updating their durable
// state. Listeners and the binding table only ever see normalized events.

use super::device::{DeviceKind, GamepadAxis, GamepadButton};
use glam::Vec2;
use winit::event::MouseButton;
use winit::keyboard::KeyCode;

/// Keyboard event, identified by physical key code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyEvent {
    /// Key went down (`repeat` is set for auto-repeat while held)
    Down { code: KeyCode, repeat: bool },
    /// Key went up
    Up { code: KeyCode },
}

impl KeyEvent {
    pub fn code(&self) -> KeyCode {
        match *self {
            KeyEvent::Down { code, .. } | KeyEvent::Up { code } => code,
        }
    }
}

/// Mouse event
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MouseEvent {
    ButtonDown(MouseButton),
    ButtonUp(MouseButton),
    /// Pointer moved to a new position (window coordinates)
    Moved { position: Vec2 },
    /// Wheel scrolled by `delta` lines; a zero delta marks the wheel coming to rest
    Wheel { delta: f32 },
}

/// Gamepad event; `pad` is the backend's gamepad index
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GamepadEvent {
    Connected { pad: usize },
    Disconnected { pad: usize },
    ButtonDown { pad: usize, button: GamepadButton },
    ButtonUp { pad: usize, button: GamepadButton },
    AxisChanged { pad: usize, axis: GamepadAxis, value: f32 },
}

impl GamepadEvent {
    pub fn pad(&self) -> usize {
        match *self {
            GamepadEvent::Connected { pad }
            | GamepadEvent::Disconnected { pad }
            | GamepadEvent::ButtonDown { pad, .. }
            | GamepadEvent::ButtonUp { pad, .. }
            | GamepadEvent::AxisChanged { pad, .. } => pad,
        }
    }
}

/// Event from a virtual (injected) device with numbered channels
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VirtualEvent {
    ButtonDown { button: u16 },
    ButtonUp { button: u16 },
    AxisMoved { axis: u16, value: f32 },
}

/// A normalized event tagged with the device kind that produced it
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DeviceEvent {
    Keyboard(KeyEvent),
    Mouse(MouseEvent),
    Gamepad(GamepadEvent),
    Virtual(VirtualEvent),
}

impl DeviceEvent {
    /// Source device kind
    pub fn kind(&self) -> DeviceKind {
        match self {
            DeviceEvent::Keyboard(_) => DeviceKind::Keyboard,
            DeviceEvent::Mouse(_) => DeviceKind::Mouse,
            DeviceEvent::Gamepad(_) => DeviceKind::Gamepad,
            DeviceEvent::Virtual(_) => DeviceKind::Virtual,
        }
    }
}
