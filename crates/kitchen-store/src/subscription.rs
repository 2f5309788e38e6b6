//! Listener registry
//!
//! Listeners are plain callbacks kept in subscription order. A notification
//! pass works on a snapshot of the registry taken when the pass starts:
//! listeners subscribed during the pass wait for the next dispatch, and
//! listeners unsubscribed during the pass are skipped if they have not run yet.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use crate::error::ListenerFailure;

/// Identifies one registered listener
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "listener#{}", self.0)
    }
}

type Callback = Rc<dyn Fn() -> anyhow::Result<()>>;

#[derive(Clone)]
struct Entry {
    id: ListenerId,
    active: Rc<Cell<bool>>,
    callback: Callback,
}

#[derive(Default)]
pub(crate) struct Listeners {
    next_id: u64,
    entries: Vec<Entry>,
}

impl Listeners {
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    fn insert(&mut self, callback: Callback) -> (ListenerId, Rc<Cell<bool>>) {
        let id = ListenerId(self.next_id);
        self.next_id += 1;

        let active = Rc::new(Cell::new(true));
        self.entries.push(Entry {
            id,
            active: Rc::clone(&active),
            callback,
        });
        (id, active)
    }

    fn remove(&mut self, id: ListenerId) {
        self.entries.retain(|entry| entry.id != id);
    }
}

/// Register `callback` and hand back its unsubscribe capability
pub(crate) fn subscribe(
    registry: &Rc<RefCell<Listeners>>,
    callback: impl Fn() -> anyhow::Result<()> + 'static,
) -> Subscription {
    let (id, active) = registry.borrow_mut().insert(Rc::new(callback));
    log::trace!("Subscribed {}", id);

    Subscription {
        id,
        active,
        registry: Rc::downgrade(registry),
    }
}

/// Run one notification pass.
///
/// The registry is not borrowed while callbacks run, so they are free to
/// subscribe, unsubscribe or read the store. A failing callback does not stop
/// the pass; every failure is returned once all listeners have been called.
pub(crate) fn notify(registry: &RefCell<Listeners>) -> Vec<ListenerFailure> {
    let snapshot = registry.borrow().entries.clone();
    let mut failures = Vec::new();

    for entry in snapshot {
        if !entry.active.get() {
            continue;
        }
        if let Err(error) = (entry.callback)() {
            log::warn!("{} failed: {:#}", entry.id, error);
            failures.push(ListenerFailure {
                listener: entry.id,
                error,
            });
        }
    }

    failures
}

/// Capability to stop a listener from being notified.
///
/// Returned by [`Store::subscribe`](crate::Store::subscribe). Dropping it
/// leaves the listener registered; call [`unsubscribe`](Self::unsubscribe).
#[must_use = "dropping a Subscription keeps the listener registered with no way to remove it"]
pub struct Subscription {
    id: ListenerId,
    active: Rc<Cell<bool>>,
    registry: Weak<RefCell<Listeners>>,
}

impl Subscription {
    pub fn id(&self) -> ListenerId {
        self.id
    }

    /// Whether the listener is still registered
    pub fn is_active(&self) -> bool {
        self.active.get()
    }

    /// Remove the listener. Calling this again is a no-op.
    ///
    /// Takes effect immediately, including for a notification pass that is
    /// currently running and has not reached this listener yet.
    pub fn unsubscribe(&self) {
        if !self.active.replace(false) {
            return;
        }
        if let Some(registry) = self.registry.upgrade() {
            registry.borrow_mut().remove(self.id);
            log::trace!("Unsubscribed {}", self.id);
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("active", &self.active.get())
            .finish()
    }
}
