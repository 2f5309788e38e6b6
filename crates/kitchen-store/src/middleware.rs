//! Middleware system
//!
//! Middleware sits between `dispatch` and the root reducer:
//!
//! ```text
//! Action → Middleware Chain → Root Reducer → Commit → Listeners
//! ```
//!
//! Each middleware can:
//! - Inspect the action and the committed state
//! - Queue follow-up actions through the [`Dispatcher`]
//! - Block the action from reaching the reducer
//!
//! Middleware is fixed when the store is built and runs in registration order.

use crate::action::Action;
use crate::dispatcher::Dispatcher;
use crate::reducer::Shared;

/// Middleware trait - handles actions before they reach the reducer
pub trait Middleware<S, A> {
    /// Handle an action before it reaches the reducer
    ///
    /// # Returns
    /// - `true`: Continue to next middleware/reducer
    /// - `false`: Drop the action; nothing is reduced, committed or notified
    fn handle(&mut self, action: &A, state: &Shared<S>, dispatcher: &Dispatcher<A>) -> bool;
}

/// LoggingMiddleware - logs every action that passes through the store
pub struct LoggingMiddleware;

impl LoggingMiddleware {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LoggingMiddleware {
    fn default() -> Self {
        Self::new()
    }
}

impl<S, A: Action> Middleware<S, A> for LoggingMiddleware {
    fn handle(&mut self, action: &A, _state: &Shared<S>, _dispatcher: &Dispatcher<A>) -> bool {
        log::debug!("Action: {:?}", action);
        true
    }
}
