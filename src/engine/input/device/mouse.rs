// Mouse snapshot

use super::{DeviceKind, DeviceModel, InputId, PointerAxis};
use crate::engine::input::event::{DeviceEvent, MouseEvent};
use glam::Vec2;
use winit::event::MouseButton;

/// Raw mouse event as delivered by a backend
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RawMouseEvent {
    Pressed(MouseButton),
    Released(MouseButton),
    /// Pointer moved to a position in window coordinates
    Moved(Vec2),
    /// Vertical wheel movement in lines
    Wheel(f32),
}

/// Durable mouse state
///
/// The wheel delta covers only the most recent drain: it is accumulated while draining
/// and reset when the next drain begins. A drain that resets a non-zero delta emits a
/// `Wheel { delta: 0.0 }` event so wheel-driven actions come back to rest.
#[derive(Debug, Default)]
pub struct MouseState {
    buttons: Vec<MouseButton>,
    position: Option<Vec2>,
    wheel_delta: f32,
}

impl MouseState {
    /// Check if a mouse button is currently held
    pub fn is_button_down(&self, button: MouseButton) -> bool {
        self.buttons.contains(&button)
    }

    /// Last known pointer position (`None` until the pointer has moved)
    pub fn position(&self) -> Option<Vec2> {
        self.position
    }

    /// Wheel movement accumulated during the last drain
    pub fn wheel_delta(&self) -> f32 {
        self.wheel_delta
    }
}

impl DeviceModel for MouseState {
    type Raw = RawMouseEvent;

    const KIND: DeviceKind = DeviceKind::Mouse;

    fn begin_drain(&mut self, out: &mut Vec<DeviceEvent>) {
        if self.wheel_delta != 0.0 {
            self.wheel_delta = 0.0;
            out.push(DeviceEvent::Mouse(MouseEvent::Wheel { delta: 0.0 }));
        }
    }

    fn apply(&mut self, raw: RawMouseEvent, out: &mut Vec<DeviceEvent>) {
        match raw {
            RawMouseEvent::Pressed(button) => {
                if !self.buttons.contains(&button) {
                    self.buttons.push(button);
                }
                out.push(DeviceEvent::Mouse(MouseEvent::ButtonDown(button)));
            }
            RawMouseEvent::Released(button) => {
                self.buttons.retain(|held| *held != button);
                out.push(DeviceEvent::Mouse(MouseEvent::ButtonUp(button)));
            }
            RawMouseEvent::Moved(position) => {
                self.position = Some(position);
                out.push(DeviceEvent::Mouse(MouseEvent::Moved { position }));
            }
            RawMouseEvent::Wheel(delta) => {
                self.wheel_delta += delta;
                out.push(DeviceEvent::Mouse(MouseEvent::Wheel { delta }));
            }
        }
    }

    fn is_input_active(&self, input: InputId) -> bool {
        match input {
            InputId::MouseButton(button) => self.is_button_down(button),
            InputId::Pointer(PointerAxis::Wheel) => self.wheel_delta != 0.0,
            _ => false,
        }
    }

    fn axis_value(&self, input: InputId) -> f32 {
        match input {
            InputId::MouseButton(button) => {
                if self.is_button_down(button) {
                    1.0
                } else {
                    0.0
                }
            }
            InputId::Pointer(PointerAxis::X) => self.position.map_or(0.0, |p| p.x),
            InputId::Pointer(PointerAxis::Y) => self.position.map_or(0.0, |p| p.y),
            InputId::Pointer(PointerAxis::Wheel) => self.wheel_delta,
            _ => 0.0,
        }
    }

    fn pointer_position(&self) -> Option<Vec2> {
        self.position
    }
}
