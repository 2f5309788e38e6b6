//! Error types surfaced by reducers and the store
//!
//! Every failure reaches the caller of [`Store::dispatch`](crate::Store::dispatch);
//! the store never swallows an error and never retries.

use crate::store::DispatchPhase;
use crate::subscription::ListenerId;

/// A reducer could not produce a new state for an action.
///
/// Returning this from [`Reducer::reduce`](crate::Reducer::reduce) aborts the
/// in-flight dispatch before anything is committed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("reducer failed on `{action_type}`: {message}")]
pub struct ReducerFault {
    /// Type tag of the action being reduced
    pub action_type: &'static str,
    pub message: String,
}

impl ReducerFault {
    pub fn new(action_type: &'static str, message: impl Into<String>) -> Self {
        Self {
            action_type,
            message: message.into(),
        }
    }
}

/// One listener that returned an error during a notification pass
#[derive(Debug)]
pub struct ListenerFailure {
    pub listener: ListenerId,
    pub error: anyhow::Error,
}

/// Errors returned by [`Store`](crate::Store) operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// `dispatch` was called while another dispatch was still in progress.
    /// The store keeps its last committed state.
    #[error("cannot dispatch `{action_type}` while {phase}")]
    ReentrantDispatch {
        action_type: &'static str,
        phase: DispatchPhase,
    },

    /// The root reducer failed; the prior state is still current.
    #[error(transparent)]
    ReducerFault(#[from] ReducerFault),

    /// One or more listeners failed. The new state is committed and every
    /// listener of the pass was still called.
    #[error("{} listener(s) failed during notification", .failures.len())]
    ListenerFault { failures: Vec<ListenerFailure> },

    /// A bound action creator outlived its store
    #[error("cannot dispatch `{action_type}`, the store has been dropped")]
    StoreDropped { action_type: &'static str },
}
