// Input manager - resolves device events into action state, one tick at a time

use super::action::{ActionCatalog, ActionValue};
use super::backend::DeviceBackends;
use super::binding::{ActionBinding, BindingTable};
use super::device::{DeviceKind, DeviceState, ListenerId};
use super::event::DeviceEvent;
use super::state::ActionState;
use super::subscriber::{self, ActionWatch, SubscriberRegistry, Subscription, Trigger};
use super::InputError;
use std::cell::{Cell, RefCell};
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_MANAGER_ID: AtomicU64 = AtomicU64::new(1);

/// An action's state plus what the current tick has done to it
#[derive(Debug, Clone, Copy)]
struct ActionSlot {
    state: ActionState,
    /// `is_down` before the first update of the current tick, if it was updated
    down_before_tick: Option<bool>,
}

impl ActionSlot {
    fn new(initial: ActionValue) -> Self {
        Self {
            state: ActionState::new(initial),
            down_before_tick: None,
        }
    }

    /// Apply one adapted value, returning the state subscribers are notified with
    fn update(&mut self, value: ActionValue) -> ActionState {
        self.down_before_tick.get_or_insert(self.state.is_down);
        self.state.apply(value);
        self.state
    }

    /// End-of-tick edge bookkeeping
    ///
    /// Untouched actions lose their edges. Updated actions keep the edge of the whole
    /// tick, so a press made by two bindings at once is still a press, and the edge stays
    /// queryable until the next tick settles.
    fn settle(&mut self) {
        match self.down_before_tick.take() {
            Some(was_down) => {
                self.state.just_pressed = self.state.is_down && !was_down;
                self.state.just_released = !self.state.is_down && was_down;
            }
            None => self.state.clear_edges(),
        }
    }
}

/// Main input manager: owns the device snapshots and the state of every action
///
/// Call [`InputManager::tick`] once per frame. Between ticks, action state is read with
/// [`InputManager::action_state`] or observed through subscriptions.
pub struct InputManager {
    /// Instance id used in log messages
    id: u64,

    /// Binding table, in evaluation order
    actions: Vec<ActionBinding>,

    /// Resolved state for every catalog action
    states: HashMap<String, ActionSlot>,

    /// One snapshot per device kind in use, in drain order
    devices: Vec<Box<dyn DeviceState>>,

    subscribers: Rc<RefCell<SubscriberRegistry>>,

    /// Normalized events collected during the current tick
    intake: VecDeque<DeviceEvent>,

    tick_count: u64,
    disposed: bool,
}

impl InputManager {
    /// Create a manager for a catalog and a binding table
    ///
    /// Fails without side effects if the table doesn't validate against the catalog or a
    /// referenced device kind has no backend. Backends for kinds nothing binds are dropped.
    pub fn new(
        catalog: &ActionCatalog,
        table: BindingTable,
        mut backends: DeviceBackends,
    ) -> Result<Self, InputError> {
        table.validate(catalog)?;

        let order = table.device_order();
        if let Some(kind) = order.iter().find(|kind| !backends.has(**kind)) {
            return Err(InputError::MissingBackend(*kind));
        }

        let id = NEXT_MANAGER_ID.fetch_add(1, Ordering::Relaxed);

        let mut devices = Vec::with_capacity(order.len());
        for kind in &order {
            match backends.take_snapshot(*kind) {
                Some(snapshot) => devices.push(snapshot),
                None => return Err(InputError::MissingBackend(*kind)),
            }
        }
        let unused = backends.remaining();
        if !unused.is_empty() {
            log::debug!("InputManager#{}: no bindings for {:?}; dropping their backends", id, unused);
        }

        let states = catalog
            .iter()
            .map(|action| (action.name().to_string(), ActionSlot::new(action.initial_value())))
            .collect();
        let subscribers = SubscriberRegistry::new(catalog.iter().map(|action| action.name()));

        log::info!(
            "InputManager#{} created: {} action(s), devices {:?}",
            id,
            catalog.len(),
            order
        );

        Ok(Self {
            id,
            actions: table.iter().cloned().collect(),
            states,
            devices,
            subscribers: Rc::new(RefCell::new(subscribers)),
            intake: VecDeque::new(),
            tick_count: 0,
            disposed: false,
        })
    }

    /// Create a manager whose catalog is the actions embedded in the table
    pub fn from_table(table: BindingTable, backends: DeviceBackends) -> Result<Self, InputError> {
        let catalog = table.derive_catalog()?;
        Self::new(&catalog, table, backends)
    }

    /// Run one resolution pass
    ///
    /// Drains every device, feeds the resulting events through the binding table in
    /// arrival order, then settles the edge flags of every action. No-op once disposed.
    pub fn tick(&mut self) {
        if self.disposed {
            log::trace!("InputManager#{}: tick after dispose ignored", self.id);
            return;
        }

        for device in self.devices.iter_mut() {
            device.poll_raw();
            self.intake.extend(device.drain());
        }

        while let Some(event) = self.intake.pop_front() {
            self.process_event(&event);
        }

        for slot in self.states.values_mut() {
            slot.settle();
        }
        self.tick_count += 1;
    }

    fn process_event(&mut self, event: &DeviceEvent) {
        let source = event.kind();

        for entry in &self.actions {
            let action = &entry.action;

            for binding in &entry.bindings {
                if binding.device != source || !binding.adapter.matches(event) {
                    continue;
                }
                log::trace!(
                    "InputManager#{}: {:?} matched '{}' via {}",
                    self.id,
                    event,
                    action.name(),
                    binding.input_id
                );

                let Some(device) = self.devices.iter().find(|device| device.kind() == binding.device) else {
                    log::warn!(
                        "InputManager#{}: no {} snapshot for binding '{}' of '{}'; skipped",
                        self.id,
                        binding.device,
                        binding.input_id,
                        action.name()
                    );
                    continue;
                };

                let value = binding.adapter.adapt(event, device.as_ref());
                if value.kind() != action.kind() {
                    log::warn!(
                        "InputManager#{}: binding '{}' produced a {} value for {} action '{}'; skipped",
                        self.id,
                        binding.input_id,
                        value.kind(),
                        action.kind(),
                        action.name()
                    );
                    continue;
                }

                let Some(slot) = self.states.get_mut(action.name()) else {
                    continue;
                };
                let snapshot = slot.update(value);
                subscriber::notify(&self.subscribers, action.name(), snapshot);
            }
        }
    }

    /// Current state of an action (the last known state once disposed)
    pub fn action_state(&self, name: &str) -> Option<ActionState> {
        self.states.get(name).map(|slot| slot.state)
    }

    /// Check if an action is held/deflected
    pub fn is_down(&self, name: &str) -> bool {
        self.states.get(name).map_or(false, |slot| slot.state.is_down)
    }

    /// Check if an action went down during the last tick
    pub fn just_pressed(&self, name: &str) -> bool {
        self.states.get(name).map_or(false, |slot| slot.state.just_pressed)
    }

    /// Check if an action was released during the last tick
    pub fn just_released(&self, name: &str) -> bool {
        self.states.get(name).map_or(false, |slot| slot.state.just_released)
    }

    pub fn value(&self, name: &str) -> Option<ActionValue> {
        self.states.get(name).map(|slot| slot.state.value)
    }

    /// Names of every action this manager resolves
    pub fn action_names(&self) -> impl Iterator<Item = &str> {
        self.states.keys().map(String::as_str)
    }

    /// Register a callback invoked with the new state every time the action is updated
    pub fn subscribe(
        &self,
        name: &str,
        callback: impl FnMut(ActionState) + 'static,
    ) -> Result<Subscription, InputError> {
        if self.disposed {
            return Err(InputError::Disposed);
        }
        let id = self.subscribers.borrow_mut().subscribe(name, callback)?;
        log::trace!("InputManager#{}: subscribed to '{}'", self.id, name);
        Ok(Subscription::new(&self.subscribers, name, id))
    }

    /// Register a callback invoked only on one edge of the action
    pub fn on_performed(
        &self,
        name: &str,
        trigger: Trigger,
        mut callback: impl FnMut() + 'static,
    ) -> Result<Subscription, InputError> {
        self.subscribe(name, move |state| {
            if trigger.fires(&state) {
                callback();
            }
        })
    }

    /// Track the latest state of an action in a shared cell
    pub fn watch(&self, name: &str) -> Result<ActionWatch, InputError> {
        let initial = self
            .action_state(name)
            .ok_or_else(|| InputError::UnknownAction(name.to_string()))?;
        let latest = Rc::new(Cell::new(initial));
        let cell = Rc::clone(&latest);
        let subscription = self.subscribe(name, move |state| cell.set(state))?;
        Ok(ActionWatch::new(latest, subscription))
    }

    pub fn subscriber_count(&self, name: &str) -> usize {
        self.subscribers.borrow().count(name)
    }

    /// Snapshot for a device kind, for raw state queries
    pub fn device(&self, kind: DeviceKind) -> Option<&dyn DeviceState> {
        self.devices
            .iter()
            .find(|device| device.kind() == kind)
            .map(|device| device.as_ref())
    }

    /// Device kinds in use, in drain order
    pub fn device_kinds(&self) -> Vec<DeviceKind> {
        self.devices.iter().map(|device| device.kind()).collect()
    }

    /// Listen to the normalized events of one device, bound or not
    pub fn add_device_listener(
        &mut self,
        kind: DeviceKind,
        listener: impl FnMut(&DeviceEvent) + 'static,
    ) -> Result<ListenerId, InputError> {
        if self.disposed {
            return Err(InputError::Disposed);
        }
        let device = self
            .devices
            .iter_mut()
            .find(|device| device.kind() == kind)
            .ok_or(InputError::MissingBackend(kind))?;
        Ok(device.add_listener(Box::new(listener)))
    }

    pub fn remove_device_listener(&mut self, kind: DeviceKind, id: ListenerId) -> bool {
        self.devices
            .iter_mut()
            .find(|device| device.kind() == kind)
            .map_or(false, |device| device.remove_listener(id))
    }

    /// Number of completed ticks
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    /// Detach every device and drop all callbacks
    ///
    /// Action state is kept as it was; later ticks do nothing. Idempotent.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;

        for device in self.devices.iter_mut() {
            device.dispose();
        }
        self.devices.clear();
        self.intake.clear();
        if let Ok(mut subscribers) = self.subscribers.try_borrow_mut() {
            subscribers.close();
        }
        log::info!(
            "InputManager#{} disposed after {} tick(s)",
            self.id,
            self.tick_count
        );
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }
}

impl Drop for InputManager {
    fn drop(&mut self) {
        self.dispose();
    }
}
