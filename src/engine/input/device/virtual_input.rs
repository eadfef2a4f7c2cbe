// Virtual device snapshot: numbered buttons and axes fed by injected events

use super::{DeviceKind, DeviceModel, InputId};
use crate::engine::input::event::{DeviceEvent, VirtualEvent};
use std::collections::{BTreeMap, BTreeSet};

/// Raw virtual-device event
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RawVirtualEvent {
    ButtonPressed { button: u16 },
    ButtonReleased { button: u16 },
    AxisMoved { axis: u16, value: f32 },
}

/// Durable state of a virtual device
#[derive(Debug, Default)]
pub struct VirtualState {
    buttons: BTreeSet<u16>,
    axes: BTreeMap<u16, f32>,
}

impl VirtualState {
    pub fn is_button_down(&self, button: u16) -> bool {
        self.buttons.contains(&button)
    }

    /// Axis value (0 if never moved)
    pub fn axis(&self, axis: u16) -> f32 {
        self.axes.get(&axis).copied().unwrap_or(0.0)
    }
}

impl DeviceModel for VirtualState {
    type Raw = RawVirtualEvent;

    const KIND: DeviceKind = DeviceKind::Virtual;

    fn apply(&mut self, raw: RawVirtualEvent, out: &mut Vec<DeviceEvent>) {
        let event = match raw {
            RawVirtualEvent::ButtonPressed { button } => {
                self.buttons.insert(button);
                VirtualEvent::ButtonDown { button }
            }
            RawVirtualEvent::ButtonReleased { button } => {
                self.buttons.remove(&button);
                VirtualEvent::ButtonUp { button }
            }
            RawVirtualEvent::AxisMoved { axis, value } => {
                self.axes.insert(axis, value);
                VirtualEvent::AxisMoved { axis, value }
            }
        };
        out.push(DeviceEvent::Virtual(event));
    }

    fn is_input_active(&self, input: InputId) -> bool {
        match input {
            InputId::VirtualButton(button) => self.is_button_down(button),
            InputId::VirtualAxis(axis) => self.axis(axis) != 0.0,
            _ => false,
        }
    }

    fn axis_value(&self, input: InputId) -> f32 {
        match input {
            InputId::VirtualAxis(axis) => self.axis(axis),
            InputId::VirtualButton(button) => {
                if self.is_button_down(button) {
                    1.0
                } else {
                    0.0
                }
            }
            _ => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_virtual_buttons_and_axes() {
        let mut state = VirtualState::default();
        let mut out = Vec::new();

        state.apply(RawVirtualEvent::ButtonPressed { button: 4 }, &mut out);
        state.apply(RawVirtualEvent::AxisMoved { axis: 1, value: -0.25 }, &mut out);

        assert!(state.is_input_active(InputId::VirtualButton(4)));
        assert_eq!(state.axis_value(InputId::VirtualAxis(1)), -0.25);
        assert_eq!(state.axis_value(InputId::VirtualAxis(2)), 0.0);

        state.apply(RawVirtualEvent::ButtonReleased { button: 4 }, &mut out);
        assert!(!state.is_button_down(4));
        assert_eq!(out.len(), 3);
    }
}
