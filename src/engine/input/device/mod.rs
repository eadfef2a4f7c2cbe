// Device snapshots: buffered, queryable state per device kind
//
// A snapshot owns the receiving end of its backend's event queue. `poll_raw` moves
// whatever the backend delivered into a private pending list; `drain` applies that list
// to durable state in arrival order and returns the normalized events. Queries only ever
// read durable state.

pub mod gamepad;
pub mod keyboard;
pub mod mouse;
pub mod virtual_input;

pub use gamepad::{GamepadAxis, GamepadButton, GamepadReading, GamepadState, RawGamepadEvent};
pub use keyboard::{KeyboardState, RawKeyboardEvent};
pub use mouse::{MouseState, RawMouseEvent};
pub use virtual_input::{RawVirtualEvent, VirtualState};

use super::backend::InputBackend;
use super::buffer::EventQueue;
use super::event::DeviceEvent;
use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;
use winit::event::MouseButton;
use winit::keyboard::KeyCode;

/// Category of input device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceKind {
    Keyboard,
    Mouse,
    Gamepad,
    Virtual,
}

impl fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DeviceKind::Keyboard => "keyboard",
            DeviceKind::Mouse => "mouse",
            DeviceKind::Gamepad => "gamepad",
            DeviceKind::Virtual => "virtual",
        };
        f.write_str(name)
    }
}

/// Pointer channels exposed as axes by the mouse snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerAxis {
    X,
    Y,
    /// Wheel delta accumulated during the last drain
    Wheel,
}

/// Identifies one physical input for raw state queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputId {
    Key(KeyCode),
    MouseButton(MouseButton),
    Pointer(PointerAxis),
    GamepadButton { pad: usize, button: GamepadButton },
    GamepadAxis { pad: usize, axis: GamepadAxis },
    VirtualButton(u16),
    VirtualAxis(u16),
}

impl InputId {
    /// Device kind that can answer queries for this input
    pub fn device(&self) -> DeviceKind {
        match self {
            InputId::Key(_) => DeviceKind::Keyboard,
            InputId::MouseButton(_) | InputId::Pointer(_) => DeviceKind::Mouse,
            InputId::GamepadButton { .. } | InputId::GamepadAxis { .. } => DeviceKind::Gamepad,
            InputId::VirtualButton(_) | InputId::VirtualAxis(_) => DeviceKind::Virtual,
        }
    }
}

/// Identifies a listener registered on a device snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Callback invoked once per normalized event during a drain
pub type DeviceListener = Box<dyn FnMut(&DeviceEvent)>;

/// Capability set every device snapshot offers
pub trait DeviceState {
    /// Device kind this snapshot represents
    fn kind(&self) -> DeviceKind;

    /// Pull everything the backend delivered since the last call into the pending list
    fn poll_raw(&mut self);

    /// Apply pending raw events to durable state, oldest first, and return the normalized events
    fn drain(&mut self) -> Vec<DeviceEvent>;

    /// Number of raw events pulled but not yet drained
    fn pending(&self) -> usize;

    /// Whether a digital input is currently active
    fn is_input_active(&self, input: InputId) -> bool;

    /// Current value of an analog input (digital inputs report 0 or 1)
    fn axis_value(&self, input: InputId) -> f32;

    /// Last known pointer position, for devices that have one
    fn pointer_position(&self) -> Option<Vec2> {
        None
    }

    /// Register a listener; listeners run in registration order
    fn add_listener(&mut self, listener: DeviceListener) -> ListenerId;

    /// Remove a listener, returning whether it was registered
    fn remove_listener(&mut self, id: ListenerId) -> bool;

    /// Detach from the backend and drop all buffered state and listeners
    fn dispose(&mut self);

    fn is_disposed(&self) -> bool;
}

/// Durable state and raw-event interpretation for one device kind
pub trait DeviceModel: Default {
    /// Raw event type delivered by this kind's backends
    type Raw: Send + 'static;

    const KIND: DeviceKind;

    /// Called once at the start of every drain, before any raw event is applied
    fn begin_drain(&mut self, _out: &mut Vec<DeviceEvent>) {}

    /// Apply one raw event to durable state, pushing the resulting normalized events
    fn apply(&mut self, raw: Self::Raw, out: &mut Vec<DeviceEvent>);

    fn is_input_active(&self, input: InputId) -> bool;

    fn axis_value(&self, input: InputId) -> f32;

    fn pointer_position(&self) -> Option<Vec2> {
        None
    }
}

/// Ordered listener registry shared by all snapshot kinds
#[derive(Default)]
pub struct ListenerSet {
    next_id: u64,
    listeners: Vec<(ListenerId, DeviceListener)>,
}

impl ListenerSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, listener: DeviceListener) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, listener));
        id
    }

    pub fn remove(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(existing, _)| *existing != id);
        self.listeners.len() != before
    }

    /// Invoke every listener with one event
    pub fn notify(&mut self, event: &DeviceEvent) {
        for (_, listener) in self.listeners.iter_mut() {
            listener(event);
        }
    }

    pub fn clear(&mut self) {
        self.listeners.clear();
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

/// Generic snapshot: a device model fed by one backend through an event queue
pub struct DeviceSnapshot<M: DeviceModel> {
    model: M,
    backend: Option<Box<dyn InputBackend<Event = M::Raw>>>,
    queue: EventQueue<M::Raw>,
    pending: VecDeque<M::Raw>,
    listeners: ListenerSet,
    disposed: bool,
}

impl<M: DeviceModel> DeviceSnapshot<M> {
    /// Create a snapshot and start the backend delivering into it
    pub fn new(mut backend: Box<dyn InputBackend<Event = M::Raw>>) -> Self {
        let queue = EventQueue::new();
        backend.start_delivering(queue.sink());
        log::debug!("{} snapshot attached to backend", M::KIND);

        Self {
            model: M::default(),
            backend: Some(backend),
            queue,
            pending: VecDeque::new(),
            listeners: ListenerSet::new(),
            disposed: false,
        }
    }

    /// Durable state of this device
    pub fn model(&self) -> &M {
        &self.model
    }
}

impl<M: DeviceModel> DeviceState for DeviceSnapshot<M> {
    fn kind(&self) -> DeviceKind {
        M::KIND
    }

    fn poll_raw(&mut self) {
        if self.disposed {
            return;
        }
        if let Some(backend) = self.backend.as_mut() {
            backend.pump();
        }
        self.pending.extend(self.queue.take_all());
    }

    fn drain(&mut self) -> Vec<DeviceEvent> {
        if self.disposed {
            return Vec::new();
        }

        let mut events = Vec::with_capacity(self.pending.len());
        self.model.begin_drain(&mut events);
        for event in &events {
            self.listeners.notify(event);
        }

        while let Some(raw) = self.pending.pop_front() {
            let start = events.len();
            self.model.apply(raw, &mut events);
            for event in &events[start..] {
                self.listeners.notify(event);
            }
        }

        if !events.is_empty() {
            log::trace!("{} drained {} event(s)", M::KIND, events.len());
        }
        events
    }

    fn pending(&self) -> usize {
        self.pending.len()
    }

    fn is_input_active(&self, input: InputId) -> bool {
        self.model.is_input_active(input)
    }

    fn axis_value(&self, input: InputId) -> f32 {
        self.model.axis_value(input)
    }

    fn pointer_position(&self) -> Option<Vec2> {
        self.model.pointer_position()
    }

    fn add_listener(&mut self, listener: DeviceListener) -> ListenerId {
        self.listeners.add(listener)
    }

    fn remove_listener(&mut self, id: ListenerId) -> bool {
        self.listeners.remove(id)
    }

    fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;

        if let Some(mut backend) = self.backend.take() {
            backend.stop_delivering();
        }
        self.queue.close();
        self.pending.clear();
        self.listeners.clear();
        self.model = M::default();
        log::debug!("{} snapshot disposed", M::KIND);
    }

    fn is_disposed(&self) -> bool {
        self.disposed
    }
}

impl<M: DeviceModel> Drop for DeviceSnapshot<M> {
    fn drop(&mut self) {
        self.dispose();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::input::backend::ChannelBackend;
    use crate::engine::input::event::KeyEvent;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn keyboard() -> (
        DeviceSnapshot<KeyboardState>,
        crate::engine::input::backend::InputFeed<RawKeyboardEvent>,
    ) {
        let (backend, feed) = ChannelBackend::new();
        (DeviceSnapshot::new(Box::new(backend)), feed)
    }

    #[test]
    fn test_events_are_buffered_until_drain() {
        let (mut snapshot, feed) = keyboard();
        feed.send(RawKeyboardEvent::Pressed {
            code: KeyCode::Space,
            repeat: false,
        });

        // Delivered but not applied yet
        assert!(!snapshot.is_input_active(InputId::Key(KeyCode::Space)));

        snapshot.poll_raw();
        assert_eq!(snapshot.pending(), 1);
        assert!(!snapshot.is_input_active(InputId::Key(KeyCode::Space)));

        let events = snapshot.drain();
        assert_eq!(events.len(), 1);
        assert_eq!(snapshot.pending(), 0);
        assert!(snapshot.is_input_active(InputId::Key(KeyCode::Space)));
    }

    #[test]
    fn test_drain_is_single_pass() {
        let (mut snapshot, feed) = keyboard();
        feed.send(RawKeyboardEvent::Pressed {
            code: KeyCode::KeyA,
            repeat: false,
        });
        snapshot.poll_raw();
        assert_eq!(snapshot.drain().len(), 1);

        snapshot.poll_raw();
        assert!(snapshot.drain().is_empty(), "events must not be replayed");
    }

    #[test]
    fn test_listeners_see_events_in_arrival_order() {
        let (mut snapshot, feed) = keyboard();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        snapshot.add_listener(Box::new(move |event| sink.borrow_mut().push(*event)));

        feed.send(RawKeyboardEvent::Pressed {
            code: KeyCode::KeyA,
            repeat: false,
        });
        feed.send(RawKeyboardEvent::Released { code: KeyCode::KeyA });
        snapshot.poll_raw();
        snapshot.drain();

        let seen = seen.borrow();
        assert_eq!(
            *seen,
            vec![
                DeviceEvent::Keyboard(KeyEvent::Down {
                    code: KeyCode::KeyA,
                    repeat: false
                }),
                DeviceEvent::Keyboard(KeyEvent::Up { code: KeyCode::KeyA }),
            ]
        );
    }

    #[test]
    fn test_remove_listener() {
        let (mut snapshot, feed) = keyboard();
        let count = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&count);
        let id = snapshot.add_listener(Box::new(move |_| *counter.borrow_mut() += 1));

        assert!(snapshot.remove_listener(id));
        assert!(!snapshot.remove_listener(id));

        feed.send(RawKeyboardEvent::Released { code: KeyCode::KeyA });
        snapshot.poll_raw();
        snapshot.drain();
        assert_eq!(*count.borrow(), 0);
    }

    #[test]
    fn test_dispose_detaches_backend_and_drops_state() {
        let (mut snapshot, feed) = keyboard();
        feed.send(RawKeyboardEvent::Pressed {
            code: KeyCode::KeyA,
            repeat: false,
        });
        snapshot.poll_raw();
        snapshot.drain();
        assert!(feed.is_attached());

        snapshot.dispose();
        assert!(snapshot.is_disposed());
        assert!(!feed.is_attached());
        assert!(!feed.send(RawKeyboardEvent::Released { code: KeyCode::KeyA }));
        assert!(!snapshot.is_input_active(InputId::Key(KeyCode::KeyA)));

        snapshot.poll_raw();
        assert!(snapshot.drain().is_empty());

        // Idempotent
        snapshot.dispose();
    }

    #[test]
    fn test_input_id_device() {
        assert_eq!(InputId::Key(KeyCode::Space).device(), DeviceKind::Keyboard);
        assert_eq!(InputId::Pointer(PointerAxis::Wheel).device(), DeviceKind::Mouse);
        assert_eq!(
            InputId::GamepadAxis {
                pad: 0,
                axis: GamepadAxis::LeftStickX
            }
            .device(),
            DeviceKind::Gamepad
        );
        assert_eq!(InputId::VirtualButton(1).device(), DeviceKind::Virtual);
    }

    #[test]
    fn test_device_kind_ordering() {
        assert!(DeviceKind::Keyboard < DeviceKind::Mouse);
        assert!(DeviceKind::Mouse < DeviceKind::Gamepad);
        assert!(DeviceKind::Gamepad < DeviceKind::Virtual);
    }
}
