// Adapters: per-input matching and value conversion
//
// An adapter answers two questions about a normalized event: does it concern this
// binding (`matches`, which must not look at device state), and what value does the
// bound action take now (`adapt`, which reads durable device state but never mutates it).

pub mod gamepad;
pub mod keyboard;
pub mod mouse;
pub mod virtual_input;

pub use gamepad::{GamepadAxisAdapter, GamepadButtonAdapter, GamepadStickAdapter};
pub use keyboard::{KeyboardAxisAdapter, KeyboardButtonAdapter, KeyboardVectorAdapter};
pub use mouse::{MouseButtonAdapter, MousePositionAdapter, MouseWheelAdapter};
pub use virtual_input::{VirtualAxisAdapter, VirtualButtonAdapter};

use super::action::{ActionKind, ActionValue};
use super::device::{DeviceKind, DeviceState};
use super::event::DeviceEvent;
use std::fmt;

/// Converts device events into action values for one binding
pub trait InputAdapter: fmt::Debug {
    /// Device kind whose events and state this adapter reads
    fn device(&self) -> DeviceKind;

    /// Kind of value `adapt` produces
    fn output(&self) -> ActionKind;

    /// Whether `event` concerns this adapter
    fn matches(&self, event: &DeviceEvent) -> bool;

    /// Value of the bound action after `event` has been applied to `device`
    fn adapt(&self, event: &DeviceEvent, device: &dyn DeviceState) -> ActionValue;
}

type MatchFn = Box<dyn Fn(&DeviceEvent) -> bool>;
type AdaptFn = Box<dyn Fn(&DeviceEvent, &dyn DeviceState) -> ActionValue>;

/// Adapter assembled from two closures, for inputs the built-ins don't cover
pub struct FnAdapter {
    device: DeviceKind,
    output: ActionKind,
    matches: MatchFn,
    adapt: AdaptFn,
}

impl FnAdapter {
    pub fn new(
        device: DeviceKind,
        output: ActionKind,
        matches: impl Fn(&DeviceEvent) -> bool + 'static,
        adapt: impl Fn(&DeviceEvent, &dyn DeviceState) -> ActionValue + 'static,
    ) -> Self {
        Self {
            device,
            output,
            matches: Box::new(matches),
            adapt: Box::new(adapt),
        }
    }
}

impl fmt::Debug for FnAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnAdapter")
            .field("device", &self.device)
            .field("output", &self.output)
            .finish_non_exhaustive()
    }
}

impl InputAdapter for FnAdapter {
    fn device(&self) -> DeviceKind {
        self.device
    }

    fn output(&self) -> ActionKind {
        self.output
    }

    fn matches(&self, event: &DeviceEvent) -> bool {
        (self.matches)(event)
    }

    fn adapt(&self, event: &DeviceEvent, device: &dyn DeviceState) -> ActionValue {
        (self.adapt)(event, device)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::input::device::{InputId, KeyboardState};
    use crate::engine::input::event::KeyEvent;
    use crate::engine::input::testing::snapshot_with;
    use winit::keyboard::KeyCode;

    #[test]
    fn test_fn_adapter_delegates() {
        let adapter = FnAdapter::new(
            DeviceKind::Keyboard,
            ActionKind::Button,
            |event| matches!(event, DeviceEvent::Keyboard(KeyEvent::Down { .. })),
            |_, device| ActionValue::Button(device.is_input_active(InputId::Key(KeyCode::Enter))),
        );
        let device = snapshot_with::<KeyboardState>(Vec::new());

        let down = DeviceEvent::Keyboard(KeyEvent::Down {
            code: KeyCode::Enter,
            repeat: false,
        });
        assert!(adapter.matches(&down));
        assert!(!adapter.matches(&DeviceEvent::Keyboard(KeyEvent::Up { code: KeyCode::Enter })));
        assert_eq!(adapter.adapt(&down, &device), ActionValue::Button(false));
        assert_eq!(adapter.device(), DeviceKind::Keyboard);
        assert!(format!("{:?}", adapter).contains("FnAdapter"));
    }
}
