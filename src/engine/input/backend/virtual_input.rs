use super::{ChannelBackend, InputFeed};
use crate::engine::input::device::RawVirtualEvent;

/// Scriptable input device
///
/// Injects raw events into the virtual device kind; handy for tests, replays driven by
/// the host, or synthetic controls. Clones share the same feed.
#[derive(Clone)]
pub struct VirtualDevice {
    id: String,
    name: String,
    feed: InputFeed<RawVirtualEvent>,
}

impl VirtualDevice {
    /// Create a device and the backend to hand to the engine
    pub fn new(id: &str, name: &str) -> (Self, ChannelBackend<RawVirtualEvent>) {
        let (backend, feed) = ChannelBackend::new();
        let device = Self {
            id: id.to_string(),
            name: name.to_string(),
            feed,
        };
        (device, backend)
    }

    /// Inject a raw input event into the virtual device
    pub fn feed(&self, event: RawVirtualEvent) -> bool {
        self.feed.send(event)
    }

    /// Convenience method to set an axis value
    pub fn set_axis(&self, axis: u16, value: f32) -> bool {
        self.feed(RawVirtualEvent::AxisMoved { axis, value })
    }

    pub fn press_button(&self, button: u16) -> bool {
        self.feed(RawVirtualEvent::ButtonPressed { button })
    }

    pub fn release_button(&self, button: u16) -> bool {
        self.feed(RawVirtualEvent::ButtonReleased { button })
    }

    pub fn is_attached(&self) -> bool {
        self.feed.is_attached()
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}
