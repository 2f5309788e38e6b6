//! Reducer contract and leaf reducer adapters
//!
//! A reducer owns one slice of the state tree. It is handed the current value of
//! that slice and an action and answers with either the very same pointer
//! (nothing changed) or a freshly allocated value. It never mutates what it is
//! given, which is what lets consumers compare subtrees with
//! [`Shared::ptr_eq`] to learn whether anything changed.

use std::marker::PhantomData;
use std::rc::Rc;
use std::sync::Arc;

use crate::error::ReducerFault;

/// Pointer type every state node lives behind.
///
/// Pointer identity is meaningful: two states are "the same subtree" exactly
/// when `Shared::ptr_eq` says so.
pub type Shared<T> = Arc<T>;

/// Result of a reduction
pub type Reduced<S> = Result<Shared<S>, ReducerFault>;

/// A pure, deterministic state transition for one slice of the tree.
///
/// Implementations must be total: an action the reducer does not care about
/// returns `Ok(Shared::clone(state))`.
pub trait Reducer<A> {
    /// The slice of state this reducer owns
    type State;

    /// Default value of the slice, used only when a store builds its initial
    /// tree without a seed.
    fn initial(&self) -> Reduced<Self::State>;

    /// Apply `action` to `state`
    fn reduce(&self, state: &Shared<Self::State>, action: &A) -> Reduced<Self::State>;
}

/// Type-erased reducer for slice `S`
pub type BoxedReducer<A, S> = Box<dyn Reducer<A, State = S>>;

impl<A, R> Reducer<A> for Box<R>
where
    R: Reducer<A> + ?Sized,
{
    type State = R::State;

    fn initial(&self) -> Reduced<Self::State> {
        (**self).initial()
    }

    fn reduce(&self, state: &Shared<Self::State>, action: &A) -> Reduced<Self::State> {
        (**self).reduce(state, action)
    }
}

/// Lets one reducer be shared by several composites
impl<A, R> Reducer<A> for Rc<R>
where
    R: Reducer<A> + ?Sized,
{
    type State = R::State;

    fn initial(&self) -> Reduced<Self::State> {
        (**self).initial()
    }

    fn reduce(&self, state: &Shared<Self::State>, action: &A) -> Reduced<Self::State> {
        (**self).reduce(state, action)
    }
}

/// Reducer for a leaf value, built from a default and an infallible step.
///
/// See [`leaf`].
pub struct Leaf<S, D, F> {
    default: D,
    step: F,
    _slice: PhantomData<fn() -> S>,
}

/// Build a leaf reducer.
///
/// `step` borrows the current value and returns `None` to keep it, or
/// `Some(next)` to replace it. Returning `None` is what keeps the slice's
/// pointer stable across unrelated actions.
///
/// ```rust
/// use kitchen_store::{leaf, Action, Reducer};
///
/// #[derive(Debug)]
/// enum Toggle { Flip, Other }
///
/// impl Action for Toggle {
///     fn action_type(&self) -> &'static str {
///         match self { Toggle::Flip => "Flip", Toggle::Other => "Other" }
///     }
/// }
///
/// fn flag() -> impl Reducer<Toggle, State = bool> {
///     leaf(|| false, |on: &bool, action: &Toggle| match action {
///         Toggle::Flip => Some(!on),
///         Toggle::Other => None,
///     })
/// }
///
/// let flag = flag();
/// let off = flag.initial().unwrap();
/// let on = flag.reduce(&off, &Toggle::Flip).unwrap();
/// assert!(*on);
/// ```
pub fn leaf<A, S, D, F>(default: D, step: F) -> Leaf<S, D, F>
where
    D: Fn() -> S,
    F: Fn(&S, &A) -> Option<S>,
{
    Leaf {
        default,
        step,
        _slice: PhantomData,
    }
}

impl<A, S, D, F> Reducer<A> for Leaf<S, D, F>
where
    D: Fn() -> S,
    F: Fn(&S, &A) -> Option<S>,
{
    type State = S;

    fn initial(&self) -> Reduced<S> {
        Ok(Shared::new((self.default)()))
    }

    fn reduce(&self, state: &Shared<S>, action: &A) -> Reduced<S> {
        Ok(match (self.step)(state, action) {
            Some(next) => Shared::new(next),
            None => Shared::clone(state),
        })
    }
}

/// Leaf reducer whose step may fail. See [`try_leaf`].
pub struct TryLeaf<S, D, F> {
    default: D,
    step: F,
    _slice: PhantomData<fn() -> S>,
}

/// Build a leaf reducer whose step can reject an action with a [`ReducerFault`].
pub fn try_leaf<A, S, D, F>(default: D, step: F) -> TryLeaf<S, D, F>
where
    D: Fn() -> S,
    F: Fn(&S, &A) -> Result<Option<S>, ReducerFault>,
{
    TryLeaf {
        default,
        step,
        _slice: PhantomData,
    }
}

impl<A, S, D, F> Reducer<A> for TryLeaf<S, D, F>
where
    D: Fn() -> S,
    F: Fn(&S, &A) -> Result<Option<S>, ReducerFault>,
{
    type State = S;

    fn initial(&self) -> Reduced<S> {
        Ok(Shared::new((self.default)()))
    }

    fn reduce(&self, state: &Shared<S>, action: &A) -> Reduced<S> {
        Ok(match (self.step)(state, action)? {
            Some(next) => Shared::new(next),
            None => Shared::clone(state),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[derive(Debug)]
    enum CounterAction {
        Inc,
        Add(u32),
        Reset,
        Boom,
    }

    fn counter() -> impl Reducer<CounterAction, State = u32> {
        leaf(
            || 0,
            |count: &u32, action: &CounterAction| match action {
                CounterAction::Inc => Some(count + 1),
                CounterAction::Add(n) => Some(count + n),
                CounterAction::Reset | CounterAction::Boom => None,
            },
        )
    }

    #[test]
    fn test_leaf_initial_uses_default() {
        let reducer = counter();
        assert_eq!(*reducer.initial().unwrap(), 0);
    }

    #[test]
    fn test_leaf_unhandled_action_keeps_pointer() {
        let reducer = counter();
        let state = Shared::new(7);

        let next = reducer.reduce(&state, &CounterAction::Reset).unwrap();

        assert!(Shared::ptr_eq(&state, &next));
    }

    #[test]
    fn test_leaf_change_allocates_and_leaves_input_alone() {
        let reducer = counter();
        let state = Shared::new(7);

        let next = reducer.reduce(&state, &CounterAction::Add(3)).unwrap();

        assert!(!Shared::ptr_eq(&state, &next));
        assert_eq!(*next, 10);
        assert_eq!(*state, 7);
    }

    #[test]
    fn test_leaf_is_deterministic() {
        let reducer = counter();
        let state = Shared::new(1);

        let a = reducer.reduce(&state, &CounterAction::Inc).unwrap();
        let b = reducer.reduce(&state, &CounterAction::Inc).unwrap();

        assert_eq!(a, b);
    }

    fn fragile_counter() -> impl Reducer<CounterAction, State = u32> {
        try_leaf(
            || 0,
            |count: &u32, action: &CounterAction| match action {
                CounterAction::Boom => Err(ReducerFault::new("Boom", "counter exploded")),
                CounterAction::Inc => Ok(Some(count + 1)),
                _ => Ok(None),
            },
        )
    }

    #[test]
    fn test_try_leaf_reports_fault() {
        let reducer = fragile_counter();
        let state = reducer.initial().unwrap();

        let fault = reducer.reduce(&state, &CounterAction::Boom).unwrap_err();
        assert_eq!(fault, ReducerFault::new("Boom", "counter exploded"));

        let next = reducer.reduce(&state, &CounterAction::Inc).unwrap();
        assert_eq!(*next, 1);
    }

    #[test]
    fn test_boxed_reducer_delegates() {
        let boxed: BoxedReducer<CounterAction, u32> = Box::new(counter());
        let state = boxed.initial().unwrap();

        let next = boxed.reduce(&state, &CounterAction::Inc).unwrap();

        assert_eq!(*next, 1);
    }

    #[test]
    fn test_shared_reducer_delegates() {
        let shared: Rc<dyn Reducer<CounterAction, State = u32>> = Rc::new(counter());
        let other = Rc::clone(&shared);
        let state = shared.initial().unwrap();

        let next = other.reduce(&state, &CounterAction::Add(2)).unwrap();

        assert_eq!(*next, 2);
    }
}
