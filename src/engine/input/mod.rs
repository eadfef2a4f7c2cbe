// Input handling system
//
// Maps raw device events onto named actions (`fire`, `move`, ...) that game code reads
// without caring which device produced them.
//
// ## Architecture
//
// - `action`: Action definitions, values and the action catalog
// - `binding`: Binding table (action -> ordered inputs, each with an adapter)
// - `adapter`: Per-input matching and value conversion
// - `device`: Buffered, queryable device snapshots fed by backends
// - `backend`: Event sources (channels, winit, gilrs, virtual devices)
// - `buffer`: The synchronized queue between backends and snapshots
// - `subscriber`: Per-action callbacks and subscription handles
// - `config`: TOML binding profiles
// - `manager`: The resolution engine tying everything together
//
// ## Usage Example
//
// ```rust
// use rusted_input::engine::input::*;
// use winit::keyboard::KeyCode;
//
// let (router, keyboard, mouse) = WinitRouter::new();
// let table = BindingTable::new().with(
//     ActionBinding::new(ActionDefinition::button("fire"))
//         .with(InputBinding::key(KeyCode::Space))
//         .with(InputBinding::gamepad_button(0, GamepadButton::South)),
// );
// let backends = DeviceBackends::new().with_keyboard(keyboard).with_mouse(mouse);
// let mut input = InputManager::from_table(table, backends)?;
//
// // In the event loop, route window events
// router.handle_window_event(&window_event);
//
// // Once per frame
// input.tick();
// if input.just_pressed("fire") {
//     // Fire!
// }
// ```

pub mod action;
pub mod adapter;
pub mod backend;
pub mod binding;
pub mod buffer;
pub mod config;
pub mod device;
pub mod event;
pub mod manager;
pub mod state;
pub mod subscriber;

// Re-export commonly used types
pub use action::{ActionCatalog, ActionDefinition, ActionKind, ActionValue};
pub use adapter::{FnAdapter, InputAdapter};
#[cfg(feature = "gilrs")]
pub use backend::GilrsBackend;
pub use backend::{ChannelBackend, DeviceBackends, InputBackend, InputFeed, VirtualDevice, WinitRouter};
pub use binding::{ActionBinding, BindingTable, InputBinding};
pub use config::BindingProfile;
pub use device::{DeviceKind, DeviceState, GamepadAxis, GamepadButton, InputId, ListenerId};
pub use event::DeviceEvent;
pub use manager::InputManager;
pub use state::ActionState;
pub use subscriber::{ActionWatch, Subscription, Trigger};

use thiserror::Error;

/// Errors raised while configuring or using the input system
#[derive(Debug, Error)]
pub enum InputError {
    #[error("action '{0}' is declared more than once")]
    DuplicateAction(String),

    #[error("unknown action '{0}'")]
    UnknownAction(String),

    #[error("binding for action '{name}' disagrees with the catalog definition")]
    ActionMismatch { name: String },

    #[error("initial value of action '{name}' does not match its kind ({expected})")]
    InvalidInitialValue { name: String, expected: ActionKind },

    #[error("action '{action}' expects {expected} values but a binding produces {actual} values")]
    AdapterKindMismatch {
        action: String,
        expected: ActionKind,
        actual: ActionKind,
    },

    #[error("binding of action '{action}' is declared on {binding} but its adapter reads {adapter}")]
    DeviceMismatch {
        action: String,
        binding: DeviceKind,
        adapter: DeviceKind,
    },

    #[error("no {0} backend available")]
    MissingBackend(DeviceKind),

    #[error("input manager has been disposed")]
    Disposed,

    #[error("backend error: {0}")]
    Backend(String),

    #[error("failed to read binding profile: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid binding profile: {0}")]
    Profile(#[from] toml::de::Error),
}

#[cfg(test)]
pub(crate) mod testing {
    use super::backend::ChannelBackend;
    use super::device::{DeviceModel, DeviceSnapshot, DeviceState};

    /// Snapshot that has already drained `raw`
    pub fn snapshot_with<M: DeviceModel>(raw: Vec<M::Raw>) -> DeviceSnapshot<M> {
        let (backend, feed) = ChannelBackend::new();
        let mut snapshot = DeviceSnapshot::<M>::new(Box::new(backend));
        for event in raw {
            feed.send(event);
        }
        snapshot.poll_raw();
        snapshot.drain();
        snapshot
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let error = InputError::AdapterKindMismatch {
            action: "zoom".to_string(),
            expected: ActionKind::Axis,
            actual: ActionKind::Button,
        };
        assert_eq!(
            error.to_string(),
            "action 'zoom' expects axis values but a binding produces button values"
        );
        assert_eq!(
            InputError::MissingBackend(DeviceKind::Gamepad).to_string(),
            "no gamepad backend available"
        );
    }
}
