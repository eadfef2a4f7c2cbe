// Gamepad adapters
//
// A pad that gets unplugged releases its held inputs as ordinary button/axis events, so
// these adapters only ever look at button and axis changes.

use super::InputAdapter;
use crate::engine::input::action::{ActionKind, ActionValue};
use crate::engine::input::device::{DeviceKind, DeviceState, GamepadAxis, GamepadButton, InputId};
use crate::engine::input::event::{DeviceEvent, GamepadEvent};
use crate::math::{apply_deadzone, apply_radial_deadzone};
use glam::Vec2;

/// Deadzone used by the analog adapters unless configured otherwise
pub const DEFAULT_DEADZONE: f32 = 0.15;

fn is_axis_change_of(event: &DeviceEvent, pad: usize, axes: &[GamepadAxis]) -> bool {
    matches!(
        event,
        DeviceEvent::Gamepad(GamepadEvent::AxisChanged { pad: p, axis, .. })
            if *p == pad && axes.contains(axis)
    )
}

/// Button action driven by one button of the standard layout on one pad
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GamepadButtonAdapter {
    pub pad: usize,
    pub button: GamepadButton,
}

impl GamepadButtonAdapter {
    pub fn new(pad: usize, button: GamepadButton) -> Self {
        Self { pad, button }
    }
}

impl InputAdapter for GamepadButtonAdapter {
    fn device(&self) -> DeviceKind {
        DeviceKind::Gamepad
    }

    fn output(&self) -> ActionKind {
        ActionKind::Button
    }

    fn matches(&self, event: &DeviceEvent) -> bool {
        match event {
            DeviceEvent::Gamepad(GamepadEvent::ButtonDown { pad, button })
            | DeviceEvent::Gamepad(GamepadEvent::ButtonUp { pad, button }) => {
                *pad == self.pad && *button == self.button
            }
            _ => false,
        }
    }

    fn adapt(&self, _event: &DeviceEvent, device: &dyn DeviceState) -> ActionValue {
        ActionValue::Button(device.is_input_active(InputId::GamepadButton {
            pad: self.pad,
            button: self.button,
        }))
    }
}

/// Axis action driven by one analog axis, with a deadzone and optional inversion
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GamepadAxisAdapter {
    pub pad: usize,
    pub axis: GamepadAxis,
    pub deadzone: f32,
    pub invert: bool,
}

impl GamepadAxisAdapter {
    pub fn new(pad: usize, axis: GamepadAxis) -> Self {
        Self {
            pad,
            axis,
            deadzone: DEFAULT_DEADZONE,
            invert: false,
        }
    }

    pub fn with_deadzone(mut self, deadzone: f32) -> Self {
        self.deadzone = deadzone;
        self
    }

    pub fn inverted(mut self) -> Self {
        self.invert = true;
        self
    }
}

impl InputAdapter for GamepadAxisAdapter {
    fn device(&self) -> DeviceKind {
        DeviceKind::Gamepad
    }

    fn output(&self) -> ActionKind {
        ActionKind::Axis
    }

    fn matches(&self, event: &DeviceEvent) -> bool {
        is_axis_change_of(event, self.pad, &[self.axis])
    }

    fn adapt(&self, _event: &DeviceEvent, device: &dyn DeviceState) -> ActionValue {
        let raw = device.axis_value(InputId::GamepadAxis {
            pad: self.pad,
            axis: self.axis,
        });
        let value = apply_deadzone(raw, self.deadzone);
        ActionValue::Axis(if self.invert { -value } else { value })
    }
}

/// Vector action from a pair of axes, usually one stick, with a radial deadzone
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GamepadStickAdapter {
    pub pad: usize,
    pub x: GamepadAxis,
    pub y: GamepadAxis,
    pub deadzone: f32,
}

impl GamepadStickAdapter {
    pub fn new(pad: usize, x: GamepadAxis, y: GamepadAxis) -> Self {
        Self {
            pad,
            x,
            y,
            deadzone: DEFAULT_DEADZONE,
        }
    }

    pub fn left(pad: usize) -> Self {
        Self::new(pad, GamepadAxis::LeftStickX, GamepadAxis::LeftStickY)
    }

    pub fn right(pad: usize) -> Self {
        Self::new(pad, GamepadAxis::RightStickX, GamepadAxis::RightStickY)
    }

    pub fn with_deadzone(mut self, deadzone: f32) -> Self {
        self.deadzone = deadzone;
        self
    }
}

impl InputAdapter for GamepadStickAdapter {
    fn device(&self) -> DeviceKind {
        DeviceKind::Gamepad
    }

    fn output(&self) -> ActionKind {
        ActionKind::Vector
    }

    fn matches(&self, event: &DeviceEvent) -> bool {
        is_axis_change_of(event, self.pad, &[self.x, self.y])
    }

    fn adapt(&self, _event: &DeviceEvent, device: &dyn DeviceState) -> ActionValue {
        let stick = Vec2::new(
            device.axis_value(InputId::GamepadAxis {
                pad: self.pad,
                axis: self.x,
            }),
            device.axis_value(InputId::GamepadAxis {
                pad: self.pad,
                axis: self.y,
            }),
        );
        ActionValue::Vector(apply_radial_deadzone(stick, self.deadzone))
    }
}
