// ============================================================================
// tracker.rs — KeyIntent
// Keeps a boolean intent vector in sync with key presses on a surface.
// ============================================================================

use std::cell::RefCell;
use std::collections::VecDeque;
use std::mem;
use std::rc::{Rc, Weak};

use crate::binding::{BindingTable, KeyBinding};
use crate::error::ConfigurationError;
use crate::intent::IntentState;
use crate::surface::{KeyEvent, KeyEventKind, KeyboardSurface, ListenerId};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrackerStatus {
    Stopped,
    Observing,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

type Observer = Box<dyn FnMut(&IntentState)>;

// ======================== Shared State ========================

/// One `start`..`stop` span. Dropped as a whole when observation ends.
struct Observation {
    generation: u64,
    table: BindingTable,
    state: IntentState,
    listeners: [ListenerId; 2],
}

struct Shared {
    surface: KeyboardSurface,
    next_generation: u64,
    observation: Option<Observation>,
    next_observer: u64,
    observers: Vec<(ObserverId, Observer)>,
    delivery: Delivery,
}

/// Observer bookkeeping while callbacks run with `observers` moved out.
#[derive(Default)]
struct Delivery {
    running: bool,
    /// Snapshots still to deliver, oldest first. Flips made from inside a
    /// callback queue here and are delivered after the current one.
    pending: VecDeque<IntentState>,
    /// Ids of the observers currently moved out for delivery.
    in_flight: Vec<ObserverId>,
    /// In-flight observers removed during delivery.
    removed: Vec<ObserverId>,
}

impl Shared {
    /// Ends observation `generation` if it is still the live one.
    fn end(cell: &RefCell<Shared>, generation: u64) -> bool {
        let mut shared = cell.borrow_mut();
        if shared.observation.as_ref().map(|o| o.generation) != Some(generation) {
            return false;
        }
        if let Some(observation) = shared.observation.take() {
            for id in observation.listeners {
                shared.surface.remove_listener(id);
            }
            log::info!("Stopped observing keys (generation {})", generation);
        }
        true
    }

    fn live_generation(&self) -> Option<u64> {
        self.observation.as_ref().map(|o| o.generation)
    }
}

/// Listener body shared by the key-down and key-up registrations.
fn apply_key(cell: &Weak<RefCell<Shared>>, generation: u64, event: &KeyEvent, active: bool) {
    let Some(cell) = cell.upgrade() else {
        return;
    };

    {
        let mut shared = cell.borrow_mut();
        let Some(observation) = shared
            .observation
            .as_mut()
            .filter(|o| o.generation == generation)
        else {
            return;
        };
        let Some(slot) = observation.table.slot_for(&event.code) else {
            log::trace!("Ignoring unbound key {}", event.code);
            return;
        };
        if !observation.state.set(slot, active) {
            return;
        }
        log::debug!(
            "{} -> {} = {}",
            event.code,
            observation.state.name(slot),
            active
        );
        let snapshot = observation.state.clone();
        shared.delivery.pending.push_back(snapshot);
        if shared.delivery.running {
            return;
        }
        shared.delivery.running = true;
    }

    notify(&cell);
}

/// Delivers queued snapshots until none remain.
fn notify(cell: &RefCell<Shared>) {
    loop {
        let (snapshot, mut observers) = {
            let mut shared = cell.borrow_mut();
            let Some(snapshot) = shared.delivery.pending.pop_front() else {
                shared.delivery.running = false;
                return;
            };
            let observers = mem::take(&mut shared.observers);
            shared.delivery.in_flight = observers.iter().map(|(id, _)| *id).collect();
            (snapshot, observers)
        };

        for (id, observer) in observers.iter_mut() {
            if cell.borrow().delivery.removed.contains(id) {
                continue;
            }
            observer(&snapshot);
        }

        // Observers added from inside a callback landed in the emptied vector.
        let mut shared = cell.borrow_mut();
        let removed = mem::take(&mut shared.delivery.removed);
        shared.delivery.in_flight.clear();
        observers.retain(|(id, _)| !removed.contains(id));
        let added = mem::replace(&mut shared.observers, observers);
        shared.observers.extend(added);
    }
}

// ======================== Tracker ========================

/// Translates key presses on a [`KeyboardSurface`] into an intent vector.
///
/// Stopped until [`start`](Self::start) is called with a binding table.
/// While observing, every recognised key-down sets its intent, every
/// recognised key-up clears it, and unbound keys are ignored. Consumers poll
/// [`current_state`](Self::current_state) or register change observers.
pub struct InputIntentTracker {
    shared: Rc<RefCell<Shared>>,
}

impl InputIntentTracker {
    pub fn new(surface: KeyboardSurface) -> Self {
        Self {
            shared: Rc::new(RefCell::new(Shared {
                surface,
                next_generation: 0,
                observation: None,
                next_observer: 0,
                observers: Vec::new(),
                delivery: Delivery::default(),
            })),
        }
    }

    /// Validates `binding` and begins observing the surface with every
    /// intent inactive. Nothing is registered if validation fails.
    ///
    /// A live observation is ended first; its handle becomes inert.
    pub fn start(&mut self, binding: &KeyBinding) -> Result<Handle, ConfigurationError> {
        let table = binding.compile()?;

        let live = self.shared.borrow().live_generation();
        if let Some(generation) = live {
            log::info!("Restarting key observation");
            Shared::end(&self.shared, generation);
        }

        let mut shared = self.shared.borrow_mut();
        let generation = shared.next_generation;
        shared.next_generation += 1;

        let weak = Rc::downgrade(&self.shared);
        let down = {
            let weak = weak.clone();
            shared.surface.add_listener(KeyEventKind::Down, move |event| {
                apply_key(&weak, generation, event, true)
            })
        };
        let up = shared.surface.add_listener(KeyEventKind::Up, move |event| {
            apply_key(&weak, generation, event, false)
        });

        log::info!(
            "Observing {} keys bound to {} intents (generation {})",
            table.key_count(),
            table.intent_count(),
            generation
        );

        shared.observation = Some(Observation {
            generation,
            state: table.initial_state(),
            table,
            listeners: [down, up],
        });

        Ok(Handle {
            generation,
            shared: Rc::downgrade(&self.shared),
            released: false,
        })
    }

    /// Snapshot of the intent vector. Empty while stopped.
    pub fn current_state(&self) -> IntentState {
        self.shared
            .borrow()
            .observation
            .as_ref()
            .map(|o| o.state.clone())
            .unwrap_or_else(IntentState::empty)
    }

    /// Same as [`Handle::stop`].
    pub fn stop(&mut self, handle: &mut Handle) {
        handle.stop();
    }

    pub fn status(&self) -> TrackerStatus {
        match self.shared.borrow().observation {
            Some(_) => TrackerStatus::Observing,
            None => TrackerStatus::Stopped,
        }
    }

    pub fn is_observing(&self) -> bool {
        self.status() == TrackerStatus::Observing
    }

    /// Calls `observer` with a fresh snapshot after every event that flips
    /// an intent. Observers persist across restarts.
    pub fn on_change<F>(&mut self, observer: F) -> ObserverId
    where
        F: FnMut(&IntentState) + 'static,
    {
        let mut shared = self.shared.borrow_mut();
        let id = ObserverId(shared.next_observer);
        shared.next_observer += 1;
        shared.observers.push((id, Box::new(observer)));
        id
    }

    /// Returns `false` if `id` is unknown. May be called from inside an
    /// observer, including for itself; a removed observer is not called
    /// again, even for the snapshot currently being delivered.
    pub fn remove_observer(&mut self, id: ObserverId) -> bool {
        let mut shared = self.shared.borrow_mut();
        let before = shared.observers.len();
        shared.observers.retain(|(oid, _)| *oid != id);
        if shared.observers.len() != before {
            return true;
        }
        let delivery = &mut shared.delivery;
        if delivery.in_flight.contains(&id) && !delivery.removed.contains(&id) {
            delivery.removed.push(id);
            return true;
        }
        false
    }
}

impl Drop for InputIntentTracker {
    fn drop(&mut self) {
        let live = self.shared.borrow().live_generation();
        if let Some(generation) = live {
            Shared::end(&self.shared, generation);
        }
    }
}

// ======================== Handle ========================

/// Proof of one observation. Stopping it, explicitly or by dropping it,
/// deregisters both key listeners.
#[must_use = "dropping the handle stops observation immediately"]
pub struct Handle {
    generation: u64,
    shared: Weak<RefCell<Shared>>,
    released: bool,
}

impl Handle {
    /// Ends the observation this handle was issued for. Idempotent, and a
    /// no-op if the tracker has since restarted or been dropped.
    pub fn stop(&mut self) {
        if mem::replace(&mut self.released, true) {
            return;
        }
        if let Some(shared) = self.shared.upgrade() {
            Shared::end(&shared, self.generation);
        }
    }

    /// Whether this handle's observation is still the live one.
    pub fn is_active(&self) -> bool {
        !self.released
            && self
                .shared
                .upgrade()
                .is_some_and(|s| s.borrow().live_generation() == Some(self.generation))
    }
}

impl Drop for Handle {
    fn drop(&mut self) {
        self.stop();
    }
}
