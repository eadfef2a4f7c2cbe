// Gamepad backend over gilrs

use super::InputBackend;
use crate::engine::input::buffer::EventSink;
use crate::engine::input::device::{GamepadAxis, GamepadButton, RawGamepadEvent};
use crate::engine::input::InputError;
use gilrs::{EventType, Gilrs};

/// Pull-style gamepad backend
///
/// gilrs is polled from the tick thread: every `pump` drains its event queue into the
/// sink. Pads already connected when delivery starts are announced first.
pub struct GilrsBackend {
    gilrs: Gilrs,
    sink: Option<EventSink<RawGamepadEvent>>,
}

impl GilrsBackend {
    pub fn new() -> Result<Self, InputError> {
        let gilrs = Gilrs::new().map_err(|e| InputError::Backend(format!("unable to load gamepad library: {}", e)))?;
        for (id, gamepad) in gilrs.gamepads() {
            log::info!("Found gamepad {}: {}", usize::from(id), gamepad.name());
        }
        Ok(Self { gilrs, sink: None })
    }

    fn translate(event: EventType, pad: usize) -> Option<RawGamepadEvent> {
        Some(match event {
            EventType::Connected => RawGamepadEvent::Connected { pad },
            EventType::Disconnected => RawGamepadEvent::Disconnected { pad },
            EventType::ButtonPressed(button, _) => RawGamepadEvent::Button {
                pad,
                button: map_button(button)?,
                pressed: true,
            },
            EventType::ButtonReleased(button, _) => RawGamepadEvent::Button {
                pad,
                button: map_button(button)?,
                pressed: false,
            },
            EventType::AxisChanged(axis, value, _) => RawGamepadEvent::Axis {
                pad,
                axis: map_axis(axis)?,
                value,
            },
            _ => return None,
        })
    }
}

impl InputBackend for GilrsBackend {
    type Event = RawGamepadEvent;

    fn start_delivering(&mut self, sink: EventSink<RawGamepadEvent>) {
        for (id, _) in self.gilrs.gamepads() {
            sink.push(RawGamepadEvent::Connected { pad: usize::from(id) });
        }
        self.sink = Some(sink);
    }

    fn stop_delivering(&mut self) {
        self.sink = None;
    }

    fn pump(&mut self) {
        while let Some(event) = self.gilrs.next_event() {
            let gilrs::Event { id, event, .. } = event;
            let Some(sink) = self.sink.as_ref() else {
                continue;
            };
            if let Some(raw) = Self::translate(event, usize::from(id)) {
                sink.push(raw);
            }
        }
        self.gilrs.inc();
    }
}

fn map_button(button: gilrs::Button) -> Option<GamepadButton> {
    use gilrs::Button;

    Some(match button {
        Button::South => GamepadButton::South,
        Button::East => GamepadButton::East,
        Button::West => GamepadButton::West,
        Button::North => GamepadButton::North,
        Button::LeftTrigger => GamepadButton::L1,
        Button::RightTrigger => GamepadButton::R1,
        Button::LeftTrigger2 => GamepadButton::L2,
        Button::RightTrigger2 => GamepadButton::R2,
        Button::Select => GamepadButton::Select,
        Button::Start => GamepadButton::Start,
        Button::LeftThumb => GamepadButton::L3,
        Button::RightThumb => GamepadButton::R3,
        Button::DPadUp => GamepadButton::DpadUp,
        Button::DPadDown => GamepadButton::DpadDown,
        Button::DPadLeft => GamepadButton::DpadLeft,
        Button::DPadRight => GamepadButton::DpadRight,
        Button::Mode => GamepadButton::Home,
        _ => return None,
    })
}

fn map_axis(axis: gilrs::Axis) -> Option<GamepadAxis> {
    use gilrs::Axis;

    Some(match axis {
        Axis::LeftStickX => GamepadAxis::LeftStickX,
        Axis::LeftStickY => GamepadAxis::LeftStickY,
        Axis::RightStickX => GamepadAxis::RightStickX,
        Axis::RightStickY => GamepadAxis::RightStickY,
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_button_mapping() {
        assert_eq!(map_button(gilrs::Button::South), Some(GamepadButton::South));
        assert_eq!(map_button(gilrs::Button::Mode), Some(GamepadButton::Home));
        assert_eq!(map_button(gilrs::Button::C), None);
    }

    #[test]
    fn test_axis_mapping() {
        assert_eq!(map_axis(gilrs::Axis::RightStickY), Some(GamepadAxis::RightStickY));
        assert_eq!(map_axis(gilrs::Axis::LeftZ), None);
    }
}
