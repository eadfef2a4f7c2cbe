// Window-event routing into keyboard and mouse backends

use super::{ChannelBackend, InputFeed};
use crate::engine::input::device::{RawKeyboardEvent, RawMouseEvent};
use glam::Vec2;
use winit::event::{ElementState, MouseScrollDelta, WindowEvent};
use winit::keyboard::PhysicalKey;

/// Pixels per wheel line when a touchpad reports pixel deltas
const PIXELS_PER_LINE: f32 = 40.0;

/// Feeds winit window events to the keyboard and mouse snapshots
///
/// The host calls [`WinitRouter::handle_window_event`] from its event loop; the two
/// backends returned by [`WinitRouter::new`] go into `DeviceBackends`.
pub struct WinitRouter {
    keyboard: InputFeed<RawKeyboardEvent>,
    mouse: InputFeed<RawMouseEvent>,
}

impl WinitRouter {
    pub fn new() -> (
        Self,
        ChannelBackend<RawKeyboardEvent>,
        ChannelBackend<RawMouseEvent>,
    ) {
        let (keyboard_backend, keyboard) = ChannelBackend::new();
        let (mouse_backend, mouse) = ChannelBackend::new();
        (Self { keyboard, mouse }, keyboard_backend, mouse_backend)
    }

    /// Route one window event; returns `true` if it was an input event we forwarded
    pub fn handle_window_event(&self, event: &WindowEvent) -> bool {
        match event {
            WindowEvent::KeyboardInput { event, .. } => {
                match keyboard_event(event.physical_key, event.state, event.repeat) {
                    Some(raw) => self.keyboard.send(raw),
                    None => false,
                }
            }
            WindowEvent::MouseInput { state, button, .. } => {
                let raw = match state {
                    ElementState::Pressed => RawMouseEvent::Pressed(*button),
                    ElementState::Released => RawMouseEvent::Released(*button),
                };
                self.mouse.send(raw)
            }
            WindowEvent::CursorMoved { position, .. } => {
                let position = Vec2::new(position.x as f32, position.y as f32);
                self.mouse.send(RawMouseEvent::Moved(position))
            }
            WindowEvent::MouseWheel { delta, .. } => {
                self.mouse.send(RawMouseEvent::Wheel(wheel_delta(delta)))
            }
            WindowEvent::Focused(false) => self.keyboard.send(RawKeyboardEvent::FocusLost),
            _ => false,
        }
    }
}

/// Convert a winit key event into a raw keyboard event (unidentified keys are dropped)
pub fn keyboard_event(key: PhysicalKey, state: ElementState, repeat: bool) -> Option<RawKeyboardEvent> {
    let PhysicalKey::Code(code) = key else {
        return None;
    };
    Some(match state {
        ElementState::Pressed => RawKeyboardEvent::Pressed { code, repeat },
        ElementState::Released => RawKeyboardEvent::Released { code },
    })
}

/// Vertical wheel movement in lines
pub fn wheel_delta(delta: &MouseScrollDelta) -> f32 {
    match delta {
        MouseScrollDelta::LineDelta(_, y) => *y,
        MouseScrollDelta::PixelDelta(position) => position.y as f32 / PIXELS_PER_LINE,
    }
}
