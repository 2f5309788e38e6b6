//! Immutable state tree store
//!
//! A single-threaded, Redux-style store:
//! - [`Action`]s describe intents as closed enums
//! - [`Reducer`]s are pure functions over one slice of the tree
//! - [`combine_reducers!`] and [`CombineReducers`] compose slice reducers into
//!   composite nodes, mirroring the shape of the tree
//! - [`Store`] owns the committed tree and exposes `dispatch`, `state` and
//!   `subscribe`
//!
//! ```text
//! dispatch(action) → Middleware Chain → Root Reducer → Commit → Listeners → Follow-ups
//! ```
//!
//! State nodes live behind [`Shared`] pointers and are never mutated. A
//! subtree an action did not touch keeps its pointer, so "did this change?" is
//! answered with [`Shared::ptr_eq`].

mod action;
mod combine;
mod dispatcher;
mod error;
mod middleware;
mod reducer;
mod store;
mod subscription;

pub use action::{Action, INIT_ACTION};
pub use combine::{CombineReducers, Slices};
pub use dispatcher::Dispatcher;
pub use error::{ListenerFailure, ReducerFault, StoreError};
pub use middleware::{LoggingMiddleware, Middleware};
pub use reducer::{leaf, try_leaf, BoxedReducer, Leaf, Reduced, Reducer, Shared, TryLeaf};
pub use store::{DispatchPhase, Store, StoreBuilder, WeakStore};
pub use subscription::{ListenerId, Subscription};
