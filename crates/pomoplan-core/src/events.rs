//! Event stream and a single-threaded publish/subscribe bus.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::task::ArchiveEntry;
use crate::timer::ActivePhase;

/// Every observable state change in the core produces an Event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// At least one whole tick period elapsed while a phase was active.
    Tick { rest_ms: u64 },
    /// A phase ran out or was completed by the user.
    PhaseCompleted {
        phase: ActivePhase,
        at: DateTime<Utc>,
    },
    /// A new phase was installed.
    PhaseActivated { phase: ActivePhase },
    /// No work left: the active phase is back to the idle placeholder.
    Idle { at: DateTime<Utc> },
    /// A work interval was recorded in the archive.
    TaskArchived { entry: ArchiveEntry },
}

type Listener<E> = Rc<RefCell<dyn FnMut(&E)>>;
type Listeners<E> = RefCell<Vec<(u64, Listener<E>)>>;

/// Listener registry owned by whoever publishes.
pub struct EventBus<E> {
    listeners: Rc<Listeners<E>>,
    next_id: u64,
}

impl<E: 'static> EventBus<E> {
    pub fn new() -> Self {
        Self {
            listeners: Rc::new(RefCell::new(Vec::new())),
            next_id: 0,
        }
    }

    /// Register a listener. It stays registered until the returned
    /// [`Subscription`] is dropped.
    pub fn subscribe(&mut self, listener: impl FnMut(&E) + 'static) -> Subscription {
        let id = self.next_id;
        self.next_id += 1;
        let listener: Listener<E> = Rc::new(RefCell::new(listener));
        self.listeners.borrow_mut().push((id, listener));

        let weak: Weak<Listeners<E>> = Rc::downgrade(&self.listeners);
        Subscription {
            cancel: Some(Box::new(move || {
                if let Some(listeners) = weak.upgrade() {
                    listeners.borrow_mut().retain(|(lid, _)| *lid != id);
                }
            })),
        }
    }

    /// Deliver an event to every listener registered at call time.
    pub fn emit(&self, event: &E) {
        let snapshot: Vec<Listener<E>> = self
            .listeners
            .borrow()
            .iter()
            .map(|(_, l)| Rc::clone(l))
            .collect();
        for listener in snapshot {
            // A listener that re-enters the bus while running is skipped.
            if let Ok(mut f) = listener.try_borrow_mut() {
                f(event);
            }
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }
}

impl<E: 'static> Default for EventBus<E> {
    fn default() -> Self {
        Self::new()
    }
}

/// Handle tying a listener's lifetime to its owner.
#[must_use = "dropping a Subscription unsubscribes the listener"]
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    pub fn unsubscribe(mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}
