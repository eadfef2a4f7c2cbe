// Gamepad snapshot and the standard gamepad layout

use super::{DeviceKind, DeviceModel, InputId};
use crate::engine::input::event::{DeviceEvent, GamepadEvent};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Number of buttons in the standard layout
pub const STANDARD_BUTTON_COUNT: usize = 17;

/// Number of axes in the standard layout
pub const STANDARD_AXIS_COUNT: usize = 4;

/// Buttons of the standard gamepad layout, by index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum GamepadButton {
    /// Bottom face button (A on Xbox, Cross on PlayStation)
    South = 0,
    /// Right face button (B / Circle)
    East = 1,
    /// Left face button (X / Square)
    West = 2,
    /// Top face button (Y / Triangle)
    North = 3,
    /// Left bumper
    L1 = 4,
    /// Right bumper
    R1 = 5,
    /// Left trigger
    L2 = 6,
    /// Right trigger
    R2 = 7,
    /// Back / Share
    Select = 8,
    /// Start / Options
    Start = 9,
    /// Left stick press
    L3 = 10,
    /// Right stick press
    R3 = 11,
    DpadUp = 12,
    DpadDown = 13,
    DpadLeft = 14,
    DpadRight = 15,
    /// Guide / PS button
    Home = 16,
}

impl GamepadButton {
    pub const ALL: [GamepadButton; STANDARD_BUTTON_COUNT] = [
        GamepadButton::South,
        GamepadButton::East,
        GamepadButton::West,
        GamepadButton::North,
        GamepadButton::L1,
        GamepadButton::R1,
        GamepadButton::L2,
        GamepadButton::R2,
        GamepadButton::Select,
        GamepadButton::Start,
        GamepadButton::L3,
        GamepadButton::R3,
        GamepadButton::DpadUp,
        GamepadButton::DpadDown,
        GamepadButton::DpadLeft,
        GamepadButton::DpadRight,
        GamepadButton::Home,
    ];

    /// Index in the standard layout
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

/// Axes of the standard gamepad layout, by index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum GamepadAxis {
    LeftStickX = 0,
    LeftStickY = 1,
    RightStickX = 2,
    RightStickY = 3,
}

impl GamepadAxis {
    pub const ALL: [GamepadAxis; STANDARD_AXIS_COUNT] = [
        GamepadAxis::LeftStickX,
        GamepadAxis::LeftStickY,
        GamepadAxis::RightStickX,
        GamepadAxis::RightStickY,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

/// Full polled state of one gamepad, indexed by the standard layout
///
/// Missing entries read as released / centered; extra entries are ignored.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GamepadReading {
    pub buttons: Vec<bool>,
    pub axes: Vec<f32>,
}

/// Raw gamepad event as delivered by a backend
#[derive(Debug, Clone, PartialEq)]
pub enum RawGamepadEvent {
    Connected { pad: usize },
    Disconnected { pad: usize },
    Button { pad: usize, button: GamepadButton, pressed: bool },
    Axis { pad: usize, axis: GamepadAxis, value: f32 },
    /// A complete state poll; diffed against durable state
    Reading { pad: usize, reading: GamepadReading },
}

#[derive(Debug, Clone, Default)]
struct PadState {
    buttons: [bool; STANDARD_BUTTON_COUNT],
    axes: [f32; STANDARD_AXIS_COUNT],
}

impl PadState {
    fn set_button(&mut self, pad: usize, button: GamepadButton, pressed: bool, out: &mut Vec<DeviceEvent>) {
        let slot = &mut self.buttons[button.index()];
        if *slot == pressed {
            return;
        }
        *slot = pressed;
        let event = if pressed {
            GamepadEvent::ButtonDown { pad, button }
        } else {
            GamepadEvent::ButtonUp { pad, button }
        };
        out.push(DeviceEvent::Gamepad(event));
    }

    fn set_axis(&mut self, pad: usize, axis: GamepadAxis, value: f32, out: &mut Vec<DeviceEvent>) {
        let slot = &mut self.axes[axis.index()];
        if *slot == value {
            return;
        }
        *slot = value;
        out.push(DeviceEvent::Gamepad(GamepadEvent::AxisChanged { pad, axis, value }));
    }
}

/// Durable gamepad state for every connected pad
///
/// Events for pads that were never announced by a `Connected` event are ignored:
/// hot-plugging can race with polling and that is not an error.
#[derive(Debug, Default)]
pub struct GamepadState {
    pads: BTreeMap<usize, PadState>,
}

impl GamepadState {
    pub fn is_connected(&self, pad: usize) -> bool {
        self.pads.contains_key(&pad)
    }

    /// Indices of connected pads, ascending
    pub fn connected_pads(&self) -> Vec<usize> {
        self.pads.keys().copied().collect()
    }

    /// Check if a button is held on a pad (false for unknown pads)
    pub fn is_button_down(&self, pad: usize, button: GamepadButton) -> bool {
        self.pads
            .get(&pad)
            .map_or(false, |state| state.buttons[button.index()])
    }

    /// Current axis value on a pad (0 for unknown pads)
    pub fn axis(&self, pad: usize, axis: GamepadAxis) -> f32 {
        self.pads
            .get(&pad)
            .map_or(0.0, |state| state.axes[axis.index()])
    }
}

impl DeviceModel for GamepadState {
    type Raw = RawGamepadEvent;

    const KIND: DeviceKind = DeviceKind::Gamepad;

    fn apply(&mut self, raw: RawGamepadEvent, out: &mut Vec<DeviceEvent>) {
        match raw {
            RawGamepadEvent::Connected { pad } => {
                if self.pads.contains_key(&pad) {
                    log::debug!("Gamepad {} announced twice; keeping its state", pad);
                } else {
                    log::info!("Gamepad {} connected", pad);
                    self.pads.insert(pad, PadState::default());
                }
                out.push(DeviceEvent::Gamepad(GamepadEvent::Connected { pad }));
            }
            RawGamepadEvent::Disconnected { pad } => {
                let Some(mut state) = self.pads.remove(&pad) else {
                    log::trace!("Ignoring disconnect for unknown gamepad {}", pad);
                    return;
                };
                // Held inputs are released before the pad goes away
                for button in GamepadButton::ALL {
                    state.set_button(pad, button, false, out);
                }
                for axis in GamepadAxis::ALL {
                    state.set_axis(pad, axis, 0.0, out);
                }
                log::info!("Gamepad {} disconnected", pad);
                out.push(DeviceEvent::Gamepad(GamepadEvent::Disconnected { pad }));
            }
            RawGamepadEvent::Button {
                pad,
                button,
                pressed,
            } => match self.pads.get_mut(&pad) {
                Some(state) => state.set_button(pad, button, pressed, out),
                None => log::trace!("Ignoring button event for unknown gamepad {}", pad),
            },
            RawGamepadEvent::Axis { pad, axis, value } => match self.pads.get_mut(&pad) {
                Some(state) => state.set_axis(pad, axis, value, out),
                None => log::trace!("Ignoring axis event for unknown gamepad {}", pad),
            },
            RawGamepadEvent::Reading { pad, reading } => {
                let Some(state) = self.pads.get_mut(&pad) else {
                    log::trace!("Ignoring reading for unknown gamepad {}", pad);
                    return;
                };
                for button in GamepadButton::ALL {
                    let pressed = reading.buttons.get(button.index()).copied().unwrap_or(false);
                    state.set_button(pad, button, pressed, out);
                }
                for axis in GamepadAxis::ALL {
                    let value = reading.axes.get(axis.index()).copied().unwrap_or(0.0);
                    state.set_axis(pad, axis, value, out);
                }
            }
        }
    }

    fn is_input_active(&self, input: InputId) -> bool {
        match input {
            InputId::GamepadButton { pad, button } => self.is_button_down(pad, button),
            InputId::GamepadAxis { pad, axis } => self.axis(pad, axis) != 0.0,
            _ => false,
        }
    }

    fn axis_value(&self, input: InputId) -> f32 {
        match input {
            InputId::GamepadAxis { pad, axis } => self.axis(pad, axis),
            InputId::GamepadButton { pad, button } => {
                if self.is_button_down(pad, button) {
                    1.0
                } else {
                    0.0
                }
            }
            _ => 0.0,
        }
    }
}
