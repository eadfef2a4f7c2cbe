// Keyboard snapshot

use super::{DeviceKind, DeviceModel, InputId};
use crate::engine::input::event::{DeviceEvent, KeyEvent};
use winit::keyboard::KeyCode;

/// Raw keyboard event as delivered by a backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawKeyboardEvent {
    Pressed { code: KeyCode, repeat: bool },
    Released { code: KeyCode },
    /// The input focus was lost; every held key is released
    FocusLost,
}

/// Durable keyboard state: the set of held keys, in press order
#[derive(Debug, Default)]
pub struct KeyboardState {
    held: Vec<KeyCode>,
}

impl KeyboardState {
    /// Check if a key is currently held
    pub fn is_key_down(&self, code: KeyCode) -> bool {
        self.held.contains(&code)
    }

    /// All held keys, oldest press first
    pub fn held_keys(&self) -> &[KeyCode] {
        &self.held
    }
}

impl DeviceModel for KeyboardState {
    type Raw = RawKeyboardEvent;

    const KIND: DeviceKind = DeviceKind::Keyboard;

    fn apply(&mut self, raw: RawKeyboardEvent, out: &mut Vec<DeviceEvent>) {
        match raw {
            RawKeyboardEvent::Pressed { code, repeat } => {
                if !self.held.contains(&code) {
                    self.held.push(code);
                }
                out.push(DeviceEvent::Keyboard(KeyEvent::Down { code, repeat }));
            }
            RawKeyboardEvent::Released { code } => {
                self.held.retain(|held| *held != code);
                out.push(DeviceEvent::Keyboard(KeyEvent::Up { code }));
            }
            RawKeyboardEvent::FocusLost => {
                if !self.held.is_empty() {
                    log::debug!("Focus lost; releasing {} held key(s)", self.held.len());
                }
                for code in self.held.drain(..) {
                    out.push(DeviceEvent::Keyboard(KeyEvent::Up { code }));
                }
            }
        }
    }

    fn is_input_active(&self, input: InputId) -> bool {
        match input {
            InputId::Key(code) => self.is_key_down(code),
            _ => false,
        }
    }

    fn axis_value(&self, input: InputId) -> f32 {
        if self.is_input_active(input) {
            1.0
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> RawKeyboardEvent {
        RawKeyboardEvent::Pressed {
            code,
            repeat: false,
        }
    }

    #[test]
    fn test_press_and_release() {
        let mut keyboard = KeyboardState::default();
        let mut out = Vec::new();

        keyboard.apply(press(KeyCode::Space), &mut out);
        assert!(keyboard.is_key_down(KeyCode::Space));
        assert!(keyboard.is_input_active(InputId::Key(KeyCode::Space)));

        keyboard.apply(RawKeyboardEvent::Released { code: KeyCode::Space }, &mut out);
        assert!(!keyboard.is_key_down(KeyCode::Space));
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn test_repeat_does_not_duplicate() {
        let mut keyboard = KeyboardState::default();
        let mut out = Vec::new();

        keyboard.apply(press(KeyCode::KeyW), &mut out);
        keyboard.apply(
            RawKeyboardEvent::Pressed {
                code: KeyCode::KeyW,
                repeat: true,
            },
            &mut out,
        );

        assert_eq!(keyboard.held_keys(), &[KeyCode::KeyW]);
        assert_eq!(
            out[1],
            DeviceEvent::Keyboard(KeyEvent::Down {
                code: KeyCode::KeyW,
                repeat: true
            })
        );
    }

    #[test]
    fn test_focus_lost_releases_in_press_order() {
        let mut keyboard = KeyboardState::default();
        let mut out = Vec::new();
        keyboard.apply(press(KeyCode::KeyD), &mut out);
        keyboard.apply(press(KeyCode::KeyA), &mut out);
        out.clear();

        keyboard.apply(RawKeyboardEvent::FocusLost, &mut out);

        assert!(keyboard.held_keys().is_empty());
        assert_eq!(
            out,
            vec![
                DeviceEvent::Keyboard(KeyEvent::Up { code: KeyCode::KeyD }),
                DeviceEvent::Keyboard(KeyEvent::Up { code: KeyCode::KeyA }),
            ]
        );
    }

    #[test]
    fn test_axis_value_for_keys() {
        let mut keyboard = KeyboardState::default();
        let mut out = Vec::new();
        keyboard.apply(press(KeyCode::KeyA), &mut out);

        assert_eq!(keyboard.axis_value(InputId::Key(KeyCode::KeyA)), 1.0);
        assert_eq!(keyboard.axis_value(InputId::Key(KeyCode::KeyB)), 0.0);
        assert_eq!(keyboard.axis_value(InputId::VirtualAxis(0)), 0.0);
    }
}
