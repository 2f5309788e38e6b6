//! Dispatcher for follow-up actions
//!
//! Listeners and middleware run while a dispatch is in flight, so they cannot
//! call [`Store::dispatch`](crate::Store::dispatch) themselves. When they need
//! to trigger another action they queue it through a Dispatcher instead. The
//! store dispatches queued actions in FIFO order once the current dispatch has
//! finished notifying, each one as a complete dispatch of its own.
//!
//! This enables patterns like:
//! - a listener noticing the kitchen is empty and queueing "power off"
//! - a middleware translating one coarse action into several fine ones

use std::sync::mpsc::Sender;

use crate::action::Action;

/// Cloneable handle for queueing follow-up actions
pub struct Dispatcher<A> {
    action_tx: Sender<A>,
}

impl<A> Clone for Dispatcher<A> {
    fn clone(&self) -> Self {
        Self {
            action_tx: self.action_tx.clone(),
        }
    }
}

impl<A: Action> Dispatcher<A> {
    /// The receiving end is owned by the store that drains it.
    pub(crate) fn new(action_tx: Sender<A>) -> Self {
        Self { action_tx }
    }

    /// Queue an action to be dispatched after the current dispatch completes
    ///
    /// If the store has already been dropped the action is discarded and the
    /// failure logged.
    pub fn dispatch(&self, action: A) {
        log::trace!("Dispatcher: queueing {}", action.action_type());
        if let Err(e) = self.action_tx.send(action) {
            log::error!("Dispatcher: failed to queue action: {}", e);
        }
    }
}
