// Device backends
//
// A backend is whatever actually produces raw events for one device kind: a window's
// event loop, a gamepad library, a test script. The engine only needs it to deliver
// into the sink it is given and to stop when asked.

#[cfg(feature = "gilrs")]
pub mod gilrs_backend;
pub mod virtual_input;
pub mod winit_router;

#[cfg(feature = "gilrs")]
pub use gilrs_backend::GilrsBackend;
pub use virtual_input::VirtualDevice;
pub use winit_router::WinitRouter;

use super::buffer::EventSink;
use super::device::{
    DeviceKind, DeviceSnapshot, DeviceState, GamepadState, KeyboardState, MouseState,
    RawGamepadEvent, RawKeyboardEvent, RawMouseEvent, RawVirtualEvent, VirtualState,
};
use std::sync::{Arc, Mutex, PoisonError};

/// Source of raw events for one device kind
pub trait InputBackend {
    type Event: Send + 'static;

    /// Begin delivering raw events into `sink`
    fn start_delivering(&mut self, sink: EventSink<Self::Event>);

    /// Stop delivering; events produced afterwards are discarded
    fn stop_delivering(&mut self);

    /// Give pull-style backends a chance to push pending events before a poll
    fn pump(&mut self) {}
}

pub type KeyboardBackend = Box<dyn InputBackend<Event = RawKeyboardEvent>>;
pub type MouseBackend = Box<dyn InputBackend<Event = RawMouseEvent>>;
pub type GamepadBackend = Box<dyn InputBackend<Event = RawGamepadEvent>>;
pub type VirtualBackend = Box<dyn InputBackend<Event = RawVirtualEvent>>;

/// Push-style backend fed through an [`InputFeed`]
///
/// The feed can be cloned and moved to other threads; whatever it sends while the
/// backend is attached lands in the snapshot's queue.
pub struct ChannelBackend<E> {
    target: Arc<Mutex<Option<EventSink<E>>>>,
}

/// Sending handle paired with a [`ChannelBackend`]
pub struct InputFeed<E> {
    target: Arc<Mutex<Option<EventSink<E>>>>,
}

impl<E: Send + 'static> ChannelBackend<E> {
    /// Create a backend and the feed that drives it
    pub fn new() -> (Self, InputFeed<E>) {
        let target = Arc::new(Mutex::new(None));
        (
            Self {
                target: Arc::clone(&target),
            },
            InputFeed { target },
        )
    }
}

impl<E: Send + 'static> InputBackend for ChannelBackend<E> {
    type Event = E;

    fn start_delivering(&mut self, sink: EventSink<E>) {
        *self.target.lock().unwrap_or_else(PoisonError::into_inner) = Some(sink);
    }

    fn stop_delivering(&mut self) {
        *self.target.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

impl<E> InputFeed<E> {
    /// Send one raw event; returns `false` if no snapshot is attached
    pub fn send(&self, event: E) -> bool {
        let target = self.target.lock().unwrap_or_else(PoisonError::into_inner);
        match target.as_ref() {
            Some(sink) => sink.push(event),
            None => false,
        }
    }

    /// Whether a snapshot is currently receiving from this feed
    pub fn is_attached(&self) -> bool {
        let target = self.target.lock().unwrap_or_else(PoisonError::into_inner);
        target.as_ref().map_or(false, |sink| sink.is_open())
    }
}

impl<E> Clone for InputFeed<E> {
    fn clone(&self) -> Self {
        Self {
            target: Arc::clone(&self.target),
        }
    }
}

/// Backends offered to an engine at construction, at most one per device kind
///
/// Only kinds referenced by a binding get a snapshot; the rest are dropped.
#[derive(Default)]
pub struct DeviceBackends {
    keyboard: Option<KeyboardBackend>,
    mouse: Option<MouseBackend>,
    gamepad: Option<GamepadBackend>,
    virtual_input: Option<VirtualBackend>,
}

impl DeviceBackends {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_keyboard(mut self, backend: impl InputBackend<Event = RawKeyboardEvent> + 'static) -> Self {
        self.keyboard = Some(Box::new(backend));
        self
    }

    pub fn with_mouse(mut self, backend: impl InputBackend<Event = RawMouseEvent> + 'static) -> Self {
        self.mouse = Some(Box::new(backend));
        self
    }

    pub fn with_gamepad(mut self, backend: impl InputBackend<Event = RawGamepadEvent> + 'static) -> Self {
        self.gamepad = Some(Box::new(backend));
        self
    }

    pub fn with_virtual(mut self, backend: impl InputBackend<Event = RawVirtualEvent> + 'static) -> Self {
        self.virtual_input = Some(Box::new(backend));
        self
    }

    /// Whether a backend was supplied for a device kind
    pub fn has(&self, kind: DeviceKind) -> bool {
        match kind {
            DeviceKind::Keyboard => self.keyboard.is_some(),
            DeviceKind::Mouse => self.mouse.is_some(),
            DeviceKind::Gamepad => self.gamepad.is_some(),
            DeviceKind::Virtual => self.virtual_input.is_some(),
        }
    }

    /// Take the backend for `kind` and build the matching snapshot around it
    pub(crate) fn take_snapshot(&mut self, kind: DeviceKind) -> Option<Box<dyn DeviceState>> {
        let snapshot: Box<dyn DeviceState> = match kind {
            DeviceKind::Keyboard => Box::new(DeviceSnapshot::<KeyboardState>::new(self.keyboard.take()?)),
            DeviceKind::Mouse => Box::new(DeviceSnapshot::<MouseState>::new(self.mouse.take()?)),
            DeviceKind::Gamepad => Box::new(DeviceSnapshot::<GamepadState>::new(self.gamepad.take()?)),
            DeviceKind::Virtual => {
                Box::new(DeviceSnapshot::<VirtualState>::new(self.virtual_input.take()?))
            }
        };
        Some(snapshot)
    }

    /// Kinds that still hold an unused backend
    pub(crate) fn remaining(&self) -> Vec<DeviceKind> {
        [
            DeviceKind::Keyboard,
            DeviceKind::Mouse,
            DeviceKind::Gamepad,
            DeviceKind::Virtual,
        ]
        .into_iter()
        .filter(|kind| self.has(*kind))
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::input::buffer::EventQueue;
    use std::thread;

    #[test]
    fn test_feed_before_attach_is_dropped() {
        let (_backend, feed) = ChannelBackend::<u32>::new();
        assert!(!feed.is_attached());
        assert!(!feed.send(1));
    }

    #[test]
    fn test_feed_delivers_while_attached() {
        let (mut backend, feed) = ChannelBackend::new();
        let queue = EventQueue::new();
        backend.start_delivering(queue.sink());

        assert!(feed.is_attached());
        assert!(feed.send(7u32));

        backend.stop_delivering();
        assert!(!feed.send(8));

        let events: Vec<_> = queue.take_all().into_iter().collect();
        assert_eq!(events, vec![7]);
    }

    #[test]
    fn test_feed_from_another_thread() {
        let (mut backend, feed) = ChannelBackend::new();
        let queue = EventQueue::new();
        backend.start_delivering(queue.sink());

        let remote = feed.clone();
        thread::spawn(move || {
            remote.send(RawVirtualEvent::ButtonPressed { button: 1 });
        })
        .join()
        .unwrap();

        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn test_backends_take_snapshot() {
        let (keyboard, _feed) = ChannelBackend::<RawKeyboardEvent>::new();
        let mut backends = DeviceBackends::new().with_keyboard(keyboard);

        assert!(backends.has(DeviceKind::Keyboard));
        assert!(!backends.has(DeviceKind::Mouse));
        assert!(backends.take_snapshot(DeviceKind::Mouse).is_none());

        let snapshot = backends.take_snapshot(DeviceKind::Keyboard).unwrap();
        assert_eq!(snapshot.kind(), DeviceKind::Keyboard);
        assert!(!backends.has(DeviceKind::Keyboard));
        assert!(backends.remaining().is_empty());
    }
}
