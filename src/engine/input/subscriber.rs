// Per-action subscriber lists and subscription handles

use super::state::ActionState;
use super::InputError;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::{Rc, Weak};

/// Identifies one subscription within its action's list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberId(u64);

type Callback = Rc<RefCell<dyn FnMut(ActionState)>>;

/// Subscriber lists, one per action, fixed at construction
///
/// Notification order is registration order.
pub struct SubscriberRegistry {
    next_id: u64,
    lists: HashMap<String, Vec<(SubscriberId, Callback)>>,
    closed: bool,
}

impl SubscriberRegistry {
    pub fn new<'a>(actions: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            next_id: 0,
            lists: actions
                .into_iter()
                .map(|name| (name.to_string(), Vec::new()))
                .collect(),
            closed: false,
        }
    }

    /// Append a callback to an action's list
    pub fn subscribe(
        &mut self,
        action: &str,
        callback: impl FnMut(ActionState) + 'static,
    ) -> Result<SubscriberId, InputError> {
        if self.closed {
            return Err(InputError::Disposed);
        }
        let list = self
            .lists
            .get_mut(action)
            .ok_or_else(|| InputError::UnknownAction(action.to_string()))?;

        let id = SubscriberId(self.next_id);
        self.next_id += 1;
        let callback: Callback = Rc::new(RefCell::new(callback));
        list.push((id, callback));
        Ok(id)
    }

    /// Remove one callback; returns whether it was registered
    pub fn unsubscribe(&mut self, action: &str, id: SubscriberId) -> bool {
        let Some(list) = self.lists.get_mut(action) else {
            return false;
        };
        let before = list.len();
        list.retain(|(existing, _)| *existing != id);
        list.len() != before
    }

    pub fn contains(&self, action: &str, id: SubscriberId) -> bool {
        self.lists
            .get(action)
            .map_or(false, |list| list.iter().any(|(existing, _)| *existing == id))
    }

    /// Number of callbacks registered for an action
    pub fn count(&self, action: &str) -> usize {
        self.lists.get(action).map_or(0, Vec::len)
    }

    /// Drop every callback and refuse new ones
    pub fn close(&mut self) {
        self.closed = true;
        for list in self.lists.values_mut() {
            list.clear();
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    fn callbacks(&self, action: &str) -> Vec<Callback> {
        self.lists
            .get(action)
            .map(|list| list.iter().map(|(_, callback)| Rc::clone(callback)).collect())
            .unwrap_or_default()
    }
}

/// Invoke every subscriber of `action` with `state`
///
/// Iterates over a copy of the list taken before the first call, so callbacks may
/// subscribe or unsubscribe (themselves or others) without disturbing this round.
pub(crate) fn notify(registry: &RefCell<SubscriberRegistry>, action: &str, state: ActionState) {
    let callbacks = match registry.try_borrow() {
        Ok(registry) => registry.callbacks(action),
        Err(_) => {
            log::warn!("Subscriber registry busy; skipping notification for '{}'", action);
            return;
        }
    };

    for callback in callbacks {
        match callback.try_borrow_mut() {
            Ok(mut callback) => (&mut *callback)(state),
            Err(_) => log::warn!("Subscriber for '{}' re-entered; skipping", action),
        }
    }
}

/// Handle returned by a subscription; dropping it does not unsubscribe
///
/// Holds the registry weakly, so it stays valid (and harmless) after the engine is gone.
#[derive(Debug, Clone)]
pub struct Subscription {
    registry: Weak<RefCell<SubscriberRegistry>>,
    action: String,
    id: SubscriberId,
}

impl Subscription {
    pub(crate) fn new(registry: &Rc<RefCell<SubscriberRegistry>>, action: &str, id: SubscriberId) -> Self {
        Self {
            registry: Rc::downgrade(registry),
            action: action.to_string(),
            id,
        }
    }

    /// Remove the callback; safe to call from inside any callback, returns whether it was still registered
    pub fn unsubscribe(&self) -> bool {
        let Some(registry) = self.registry.upgrade() else {
            return false;
        };
        let result = match registry.try_borrow_mut() {
            Ok(mut registry) => registry.unsubscribe(&self.action, self.id),
            Err(_) => false,
        };
        result
    }

    pub fn is_active(&self) -> bool {
        self.registry.upgrade().map_or(false, |registry| {
            registry
                .try_borrow()
                .map_or(false, |registry| registry.contains(&self.action, self.id))
        })
    }

    pub fn action(&self) -> &str {
        &self.action
    }

    pub fn id(&self) -> SubscriberId {
        self.id
    }
}

/// Which edge an `on_performed` callback fires on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    JustPressed,
    JustReleased,
}

impl Trigger {
    pub fn fires(self, state: &ActionState) -> bool {
        match self {
            Trigger::JustPressed => state.just_pressed,
            Trigger::JustReleased => state.just_released,
        }
    }
}

/// Latest state of one action, kept current by a subscription
#[derive(Debug, Clone)]
pub struct ActionWatch {
    latest: Rc<Cell<ActionState>>,
    subscription: Subscription,
}

impl ActionWatch {
    pub(crate) fn new(latest: Rc<Cell<ActionState>>, subscription: Subscription) -> Self {
        Self {
            latest,
            subscription,
        }
    }

    /// State as of the last notification (or the state when the watch was created)
    pub fn get(&self) -> ActionState {
        self.latest.get()
    }

    /// Stop tracking; `get` keeps returning the last state seen
    pub fn unsubscribe(&self) -> bool {
        self.subscription.unsubscribe()
    }

    pub fn is_active(&self) -> bool {
        self.subscription.is_active()
    }
}
