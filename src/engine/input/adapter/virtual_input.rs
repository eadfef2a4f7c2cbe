// Virtual device adapters

use super::InputAdapter;
use crate::engine::input::action::{ActionKind, ActionValue};
use crate::engine::input::device::{DeviceKind, DeviceState, InputId};
use crate::engine::input::event::{DeviceEvent, VirtualEvent};

/// Button action driven by a numbered virtual button
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VirtualButtonAdapter {
    pub button: u16,
}

impl VirtualButtonAdapter {
    pub fn new(button: u16) -> Self {
        Self { button }
    }
}

impl InputAdapter for VirtualButtonAdapter {
    fn device(&self) -> DeviceKind {
        DeviceKind::Virtual
    }

    fn output(&self) -> ActionKind {
        ActionKind::Button
    }

    fn matches(&self, event: &DeviceEvent) -> bool {
        matches!(
            event,
            DeviceEvent::Virtual(VirtualEvent::ButtonDown { button } | VirtualEvent::ButtonUp { button })
                if *button == self.button
        )
    }

    fn adapt(&self, _event: &DeviceEvent, device: &dyn DeviceState) -> ActionValue {
        ActionValue::Button(device.is_input_active(InputId::VirtualButton(self.button)))
    }
}

/// Axis action driven by a numbered virtual axis, passed through unchanged
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VirtualAxisAdapter {
    pub axis: u16,
}

impl VirtualAxisAdapter {
    pub fn new(axis: u16) -> Self {
        Self { axis }
    }
}

impl InputAdapter for VirtualAxisAdapter {
    fn device(&self) -> DeviceKind {
        DeviceKind::Virtual
    }

    fn output(&self) -> ActionKind {
        ActionKind::Axis
    }

    fn matches(&self, event: &DeviceEvent) -> bool {
        matches!(
            event,
            DeviceEvent::Virtual(VirtualEvent::AxisMoved { axis, .. }) if *axis == self.axis
        )
    }

    fn adapt(&self, _event: &DeviceEvent, device: &dyn DeviceState) -> ActionValue {
        ActionValue::Axis(device.axis_value(InputId::VirtualAxis(self.axis)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::input::device::{RawVirtualEvent, VirtualState};
    use crate::engine::input::testing::snapshot_with;

    #[test]
    fn test_virtual_button() {
        let adapter = VirtualButtonAdapter::new(2);
        let event = DeviceEvent::Virtual(VirtualEvent::ButtonDown { button: 2 });
        assert!(adapter.matches(&event));
        assert!(!adapter.matches(&DeviceEvent::Virtual(VirtualEvent::ButtonDown { button: 3 })));

        let device = snapshot_with::<VirtualState>(vec![RawVirtualEvent::ButtonPressed { button: 2 }]);
        assert_eq!(adapter.adapt(&event, &device), ActionValue::Button(true));
    }

    #[test]
    fn test_virtual_axis() {
        let adapter = VirtualAxisAdapter::new(0);
        let event = DeviceEvent::Virtual(VirtualEvent::AxisMoved { axis: 0, value: 0.75 });
        assert!(adapter.matches(&event));
        assert!(!adapter.matches(&DeviceEvent::Virtual(VirtualEvent::AxisMoved { axis: 1, value: 0.75 })));

        let device = snapshot_with::<VirtualState>(vec![RawVirtualEvent::AxisMoved { axis: 0, value: 0.75 }]);
        assert_eq!(adapter.adapt(&event, &device), ActionValue::Axis(0.75));
    }
}
