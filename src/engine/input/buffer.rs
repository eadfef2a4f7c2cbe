// Raw event buffering between backends and device snapshots
//
// Backends may deliver from any thread or callback context. Events land in a shared,
// locked queue and are only applied when the owning snapshot drains it during a tick,
// which keeps resolution deterministic.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

/// Maximum number of raw events held between two polls
pub const MAX_PENDING_EVENTS: usize = 4096;

#[derive(Debug)]
struct QueueInner<E> {
    events: VecDeque<E>,
    open: bool,
}

/// Lock the shared queue, recovering it if a delivering thread panicked mid-push
///
/// The queue holds plain data, so a poisoned lock still guards a usable queue. The
/// poison flag is cleared after recovery so the warning is logged once per panic.
fn lock<E>(inner: &Mutex<QueueInner<E>>) -> MutexGuard<'_, QueueInner<E>> {
    match inner.lock() {
        Ok(guard) => guard,
        Err(poisoned) => {
            log::warn!("Raw event queue lock poisoned by a panicking backend; recovering");
            let guard = poisoned.into_inner();
            inner.clear_poison();
            guard
        }
    }
}

/// Receiving side of the boundary, owned by a device snapshot
#[derive(Debug)]
pub struct EventQueue<E> {
    inner: Arc<Mutex<QueueInner<E>>>,
}

/// Sending side of the boundary, handed to a backend
///
/// Cheap to clone and `Send` whenever the event type is.
#[derive(Debug)]
pub struct EventSink<E> {
    inner: Arc<Mutex<QueueInner<E>>>,
}

impl<E> EventQueue<E> {
    /// Create a new open queue
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(QueueInner {
                events: VecDeque::with_capacity(64),
                open: true,
            })),
        }
    }

    /// Create a sink feeding this queue
    pub fn sink(&self) -> EventSink<E> {
        EventSink {
            inner: Arc::clone(&self.inner),
        }
    }

    /// Take every queued event, oldest first
    pub fn take_all(&self) -> VecDeque<E> {
        std::mem::take(&mut lock(&self.inner).events)
    }

    /// Drop queued events and refuse any further deliveries
    pub fn close(&self) {
        let mut inner = lock(&self.inner);
        inner.open = false;
        inner.events.clear();
    }

    /// Number of events waiting to be taken
    pub fn len(&self) -> usize {
        lock(&self.inner).events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_open(&self) -> bool {
        lock(&self.inner).open
    }
}

impl<E> Default for EventQueue<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> EventSink<E> {
    /// Deliver one event
    ///
    /// Returns `false` if the queue has been closed. When the queue is full the oldest
    /// event is discarded.
    pub fn push(&self, event: E) -> bool {
        let mut inner = lock(&self.inner);
        if !inner.open {
            return false;
        }

        inner.events.push_back(event);
        if inner.events.len() > MAX_PENDING_EVENTS {
            inner.events.pop_front();
            log::warn!(
                "Raw event queue exceeded {} events; dropped the oldest",
                MAX_PENDING_EVENTS
            );
        }
        true
    }

    /// Whether the receiving snapshot still accepts events
    pub fn is_open(&self) -> bool {
        lock(&self.inner).open
    }
}

impl<E> Clone for EventSink<E> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}
