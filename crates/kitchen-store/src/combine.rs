//! Reducer composition
//!
//! A composite node of the state tree is reduced by running one child reducer
//! per key, each over its own slice only. When every child hands back the
//! pointer it was given, the composite hands back its own pointer too; if any
//! child changed, a new composite holding all current children is allocated.
//! Changes therefore propagate upwards while untouched siblings keep their
//! identity.
//!
//! Two flavours exist:
//! - [`combine_reducers!`](crate::combine_reducers) declares a typed composite
//!   struct together with its reducer. Keys are struct fields.
//! - [`CombineReducers`] composes same-typed children under string keys into
//!   a [`Slices`] map.

use std::collections::BTreeMap;

use crate::reducer::{BoxedReducer, Reduced, Reducer, Shared};

/// Declare a composite state node and the reducer that maintains it.
///
/// Every field of the state struct is stored as `Shared<FieldType>` and is
/// owned by exactly one child reducer, passed to the generated `new` in
/// declaration order. The generated reducer is itself a [`Reducer`], so
/// composites nest to any depth.
///
/// ```rust
/// use kitchen_store::{combine_reducers, leaf, Action, Reducer, Shared};
///
/// #[derive(Debug)]
/// enum Act { Inc, Flip }
///
/// impl Action for Act {
///     fn action_type(&self) -> &'static str {
///         match self { Act::Inc => "Inc", Act::Flip => "Flip" }
///     }
/// }
///
/// combine_reducers! {
///     #[derive(Debug, PartialEq)]
///     pub struct Root => pub struct RootReducer(Act) {
///         pub counter: u32,
///         pub flag: bool,
///     }
/// }
///
/// let root = RootReducer::new(
///     leaf(|| 0, |n: &u32, a: &Act| matches!(a, Act::Inc).then(|| n + 1)),
///     leaf(|| false, |f: &bool, a: &Act| matches!(a, Act::Flip).then(|| !f)),
/// );
///
/// let before = root.initial().unwrap();
/// let after = root.reduce(&before, &Act::Flip).unwrap();
/// assert!(Shared::ptr_eq(&before.counter, &after.counter));
/// assert!(*after.flag);
/// ```
#[macro_export]
macro_rules! combine_reducers {
    (
        $(#[$state_meta:meta])*
        $state_vis:vis struct $state:ident => $reducer_vis:vis struct $reducer:ident ($action:ty) {
            $(
                $(#[$field_meta:meta])*
                $field_vis:vis $field:ident : $field_ty:ty
            ),* $(,)?
        }
    ) => {
        $(#[$state_meta])*
        $state_vis struct $state {
            $(
                $(#[$field_meta])*
                $field_vis $field: $crate::Shared<$field_ty>,
            )*
        }

        #[doc = concat!("Composite reducer maintaining [`", stringify!($state), "`].")]
        $reducer_vis struct $reducer {
            $( $field: $crate::BoxedReducer<$action, $field_ty>, )*
        }

        impl $reducer {
            /// Build the composite from one child reducer per field, in
            /// declaration order.
            #[allow(clippy::new_without_default)]
            $reducer_vis fn new(
                $( $field: impl $crate::Reducer<$action, State = $field_ty> + 'static, )*
            ) -> Self {
                Self {
                    $( $field: ::std::boxed::Box::new($field), )*
                }
            }
        }

        impl $crate::Reducer<$action> for $reducer {
            type State = $state;

            fn initial(&self) -> ::std::result::Result<$crate::Shared<$state>, $crate::ReducerFault> {
                ::std::result::Result::Ok($crate::Shared::new($state {
                    $(
                        $field: <$crate::BoxedReducer<$action, $field_ty> as $crate::Reducer<$action>>::initial(
                            &self.$field,
                        )?,
                    )*
                }))
            }

            #[allow(unused_variables)]
            fn reduce(
                &self,
                state: &$crate::Shared<$state>,
                action: &$action,
            ) -> ::std::result::Result<$crate::Shared<$state>, $crate::ReducerFault> {
                $(
                    let $field = <$crate::BoxedReducer<$action, $field_ty> as $crate::Reducer<$action>>::reduce(
                        &self.$field,
                        &state.$field,
                        action,
                    )?;
                )*

                let unchanged = true $( && $crate::Shared::ptr_eq(&$field, &state.$field) )*;
                if unchanged {
                    return ::std::result::Result::Ok($crate::Shared::clone(state));
                }

                ::std::result::Result::Ok($crate::Shared::new($state {
                    $( $field, )*
                }))
            }
        }
    };
}

/// Composite node produced by [`CombineReducers`]: key → child slice
pub type Slices<S> = BTreeMap<String, Shared<S>>;

/// Composes same-typed child reducers under explicit string keys.
///
/// The key set is fixed once the composer is built. Reducing a state that
/// lacks one of the keys starts that slice from its reducer's default; keys in
/// the state that the composer does not know are dropped. Both cases yield a
/// new composite.
pub struct CombineReducers<A, S> {
    reducers: Vec<(String, BoxedReducer<A, S>)>,
}

impl<A, S> CombineReducers<A, S> {
    pub fn new() -> Self {
        Self {
            reducers: Vec::new(),
        }
    }

    /// Register the reducer owning `key`. Registering a key twice replaces
    /// the earlier reducer.
    pub fn with(
        mut self,
        key: impl Into<String>,
        reducer: impl Reducer<A, State = S> + 'static,
    ) -> Self {
        let key = key.into();
        let reducer: BoxedReducer<A, S> = Box::new(reducer);

        match self.reducers.iter_mut().find(|(existing, _)| *existing == key) {
            Some(slot) => {
                log::warn!("Replacing reducer already registered for key '{}'", key);
                slot.1 = reducer;
            }
            None => self.reducers.push((key, reducer)),
        }
        self
    }

    /// Keys in registration order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.reducers.iter().map(|(key, _)| key.as_str())
    }

    pub fn len(&self) -> usize {
        self.reducers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reducers.is_empty()
    }
}

impl<A, S> Default for CombineReducers<A, S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A, S> Reducer<A> for CombineReducers<A, S> {
    type State = Slices<S>;

    fn initial(&self) -> Reduced<Slices<S>> {
        let mut slices = Slices::new();
        for (key, reducer) in &self.reducers {
            slices.insert(key.clone(), reducer.initial()?);
        }
        Ok(Shared::new(slices))
    }

    fn reduce(&self, state: &Shared<Slices<S>>, action: &A) -> Reduced<Slices<S>> {
        let mut changed = state.len() != self.reducers.len();
        let mut next = Slices::new();

        for (key, reducer) in &self.reducers {
            let slice = match state.get(key) {
                Some(prior) => {
                    let slice = reducer.reduce(prior, action)?;
                    changed |= !Shared::ptr_eq(prior, &slice);
                    slice
                }
                None => {
                    changed = true;
                    reducer.reduce(&reducer.initial()?, action)?
                }
            };
            next.insert(key.clone(), slice);
        }

        if changed {
            Ok(Shared::new(next))
        } else {
            Ok(Shared::clone(state))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ReducerFault;
    use crate::reducer::{leaf, try_leaf};
    use pretty_assertions::assert_eq;

    #[derive(Debug)]
    enum TestAction {
        Inc,
        Flip,
        Unknown,
        Boom,
    }

    fn counter() -> impl Reducer<TestAction, State = u32> {
        leaf(
            || 0,
            |count: &u32, action: &TestAction| match action {
                TestAction::Inc => Some(count + 1),
                _ => None,
            },
        )
    }

    fn flag() -> impl Reducer<TestAction, State = bool> {
        leaf(
            || false,
            |on: &bool, action: &TestAction| match action {
                TestAction::Flip => Some(!on),
                _ => None,
            },
        )
    }

    fn explosive() -> impl Reducer<TestAction, State = u32> {
        try_leaf(
            || 0,
            |_: &u32, action: &TestAction| match action {
                TestAction::Boom => Err(ReducerFault::new("Boom", "boom")),
                _ => Ok(None),
            },
        )
    }

    combine_reducers! {
        #[derive(Debug, PartialEq)]
        struct Panel => struct PanelReducer(TestAction) {
            counter: u32,
            flag: bool,
        }
    }

    combine_reducers! {
        #[derive(Debug, PartialEq)]
        struct Dashboard => struct DashboardReducer(TestAction) {
            panel: Panel,
            total: u32,
        }
    }

    combine_reducers! {
        #[derive(Debug, PartialEq)]
        struct Nothing => struct NothingReducer(TestAction) {}
    }

    combine_reducers! {
        #[derive(Debug)]
        struct Fragile => struct FragileReducer(TestAction) {
            counter: u32,
            bomb: u32,
        }
    }

    fn dashboard() -> DashboardReducer {
        DashboardReducer::new(PanelReducer::new(counter(), flag()), counter())
    }

    #[test]
    fn test_initial_builds_every_slice() {
        let state = PanelReducer::new(counter(), flag()).initial().unwrap();

        assert_eq!(*state.counter, 0);
        assert!(!*state.flag);
    }

    #[test]
    fn test_unknown_action_returns_same_composite() {
        let reducer = dashboard();
        let state = reducer.initial().unwrap();

        let next = reducer.reduce(&state, &TestAction::Unknown).unwrap();

        assert!(Shared::ptr_eq(&state, &next));
    }

    #[test]
    fn test_change_propagates_up_and_siblings_keep_identity() {
        let reducer = PanelReducer::new(counter(), flag());
        let before = reducer.initial().unwrap();

        let after = reducer.reduce(&before, &TestAction::Flip).unwrap();

        assert!(!Shared::ptr_eq(&before, &after));
        assert!(!Shared::ptr_eq(&before.flag, &after.flag));
        assert!(Shared::ptr_eq(&before.counter, &after.counter));
        assert!(*after.flag);
        // input untouched
        assert!(!*before.flag);
    }

    #[test]
    fn test_nested_composites_rebuild_every_ancestor() {
        let reducer = dashboard();
        let before = reducer.initial().unwrap();

        let after = reducer.reduce(&before, &TestAction::Flip).unwrap();

        assert!(!Shared::ptr_eq(&before, &after));
        assert!(!Shared::ptr_eq(&before.panel, &after.panel));
        assert!(Shared::ptr_eq(&before.total, &after.total));
        assert!(Shared::ptr_eq(&before.panel.counter, &after.panel.counter));
    }

    #[test]
    fn test_children_only_see_their_own_slice() {
        let reducer = dashboard();
        let before = reducer.initial().unwrap();

        let after = reducer.reduce(&before, &TestAction::Inc).unwrap();

        // both counters react independently to the same action
        assert_eq!(*after.total, 1);
        assert_eq!(*after.panel.counter, 1);
        assert!(Shared::ptr_eq(&before.panel.flag, &after.panel.flag));
    }

    #[test]
    fn test_empty_composite_is_stable() {
        let reducer = NothingReducer::new();
        let state = reducer.initial().unwrap();

        let next = reducer.reduce(&state, &TestAction::Inc).unwrap();

        assert_eq!(*next, Nothing {});
        assert!(Shared::ptr_eq(&state, &next));
    }

    #[test]
    fn test_child_fault_aborts_composite() {
        let reducer = FragileReducer::new(counter(), explosive());
        let state = reducer.initial().unwrap();

        let fault = reducer.reduce(&state, &TestAction::Boom).unwrap_err();

        assert_eq!(fault.action_type, "Boom");
        assert_eq!(*state.counter, 0);
    }

    fn switches() -> CombineReducers<TestAction, bool> {
        CombineReducers::new()
            .with("kettle", flag())
            .with("toaster", leaf(|| true, |_: &bool, _: &TestAction| None))
    }

    #[test]
    fn test_keyed_initial_and_keys() {
        let reducer = switches();
        let state = reducer.initial().unwrap();

        assert_eq!(reducer.keys().collect::<Vec<_>>(), vec!["kettle", "toaster"]);
        assert!(!*state["kettle"]);
        assert!(*state["toaster"]);
    }

    #[test]
    fn test_keyed_unchanged_returns_same_map() {
        let reducer = switches();
        let state = reducer.initial().unwrap();

        let next = reducer.reduce(&state, &TestAction::Unknown).unwrap();

        assert!(Shared::ptr_eq(&state, &next));
    }

    #[test]
    fn test_keyed_change_keeps_sibling_identity() {
        let reducer = switches();
        let state = reducer.initial().unwrap();

        let next = reducer.reduce(&state, &TestAction::Flip).unwrap();

        assert!(!Shared::ptr_eq(&state, &next));
        assert!(*next["kettle"]);
        assert!(Shared::ptr_eq(&state["toaster"], &next["toaster"]));
    }

    #[test]
    fn test_keyed_fills_missing_and_drops_unknown_keys() {
        let reducer = switches();
        let mut seeded = Slices::new();
        seeded.insert("kettle".to_string(), Shared::new(true));
        seeded.insert("fridge".to_string(), Shared::new(true));
        let state = Shared::new(seeded);

        let next = reducer.reduce(&state, &TestAction::Unknown).unwrap();

        assert!(!Shared::ptr_eq(&state, &next));
        assert_eq!(next.keys().collect::<Vec<_>>(), vec!["kettle", "toaster"]);
        assert!(Shared::ptr_eq(&state["kettle"], &next["kettle"]));
    }

    #[test]
    fn test_keyed_duplicate_key_replaces() {
        let reducer = CombineReducers::new()
            .with("n", counter())
            .with("n", leaf(|| 42, |_: &u32, _: &TestAction| None));

        assert_eq!(reducer.len(), 1);
        assert_eq!(*reducer.initial().unwrap()["n"], 42);
    }

    #[test]
    fn test_keyed_empty_composer() {
        let reducer: CombineReducers<TestAction, u32> = CombineReducers::default();
        let state = reducer.initial().unwrap();

        let next = reducer.reduce(&state, &TestAction::Inc).unwrap();

        assert!(reducer.is_empty());
        assert!(next.is_empty());
        assert!(Shared::ptr_eq(&state, &next));
    }
}
