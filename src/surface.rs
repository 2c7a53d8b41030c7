// ============================================================================
// surface.rs — KeyIntent
// The ambient input surface: a single-threaded key listener registry.
// ============================================================================

use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

// ======================== Key Events ========================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyEventKind {
    Down,
    Up,
}

/// A physical key press or release as delivered by the host.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyEvent {
    pub kind: KeyEventKind,
    pub code: String,
}

impl KeyEvent {
    pub fn down(code: impl Into<String>) -> Self {
        Self {
            kind: KeyEventKind::Down,
            code: code.into(),
        }
    }

    pub fn up(code: impl Into<String>) -> Self {
        Self {
            kind: KeyEventKind::Up,
            code: code.into(),
        }
    }
}

// ======================== Keyboard Surface ========================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener = Rc<RefCell<dyn FnMut(&KeyEvent)>>;

struct Registration {
    id: ListenerId,
    kind: KeyEventKind,
    listener: Listener,
}

#[derive(Default)]
struct Registry {
    next_id: u64,
    registrations: Vec<Registration>,
}

impl Registry {
    fn contains(&self, id: ListenerId) -> bool {
        self.registrations.iter().any(|r| r.id == id)
    }
}

/// Clonable handle to a key listener registry, the stand-in for a browser
/// `document`. Hosts feed it events; trackers subscribe to it.
///
/// Everything happens on the calling thread. Listeners run in registration
/// order and the registry is not borrowed while they run, so a listener may
/// add or remove listeners (including itself).
#[derive(Clone, Default)]
pub struct KeyboardSurface {
    registry: Rc<RefCell<Registry>>,
}

impl KeyboardSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_listener<F>(&self, kind: KeyEventKind, listener: F) -> ListenerId
    where
        F: FnMut(&KeyEvent) + 'static,
    {
        let mut registry = self.registry.borrow_mut();
        let id = ListenerId(registry.next_id);
        registry.next_id += 1;
        registry.registrations.push(Registration {
            id,
            kind,
            listener: Rc::new(RefCell::new(listener)),
        });
        id
    }

    /// Returns `false` if `id` was not registered.
    pub fn remove_listener(&self, id: ListenerId) -> bool {
        let mut registry = self.registry.borrow_mut();
        let before = registry.registrations.len();
        registry.registrations.retain(|r| r.id != id);
        registry.registrations.len() != before
    }

    pub fn listener_count(&self) -> usize {
        self.registry.borrow().registrations.len()
    }

    /// Delivers `event` to every listener registered for its kind.
    /// Returns how many listeners ran.
    pub fn dispatch(&self, event: &KeyEvent) -> usize {
        let targets: Vec<(ListenerId, Listener)> = self
            .registry
            .borrow()
            .registrations
            .iter()
            .filter(|r| r.kind == event.kind)
            .map(|r| (r.id, Rc::clone(&r.listener)))
            .collect();

        let mut invoked = 0;
        for (id, listener) in targets {
            // Removed by an earlier listener during this dispatch.
            if !self.registry.borrow().contains(id) {
                continue;
            }
            let Ok(mut listener) = listener.try_borrow_mut() else {
                log::warn!("Skipping re-entrant dispatch of {:?} {}", event.kind, event.code);
                continue;
            };
            (&mut *listener)(event);
            invoked += 1;
        }
        invoked
    }

    pub fn key_down(&self, code: &str) -> usize {
        self.dispatch(&KeyEvent::down(code))
    }

    pub fn key_up(&self, code: &str) -> usize {
        self.dispatch(&KeyEvent::up(code))
    }
}
