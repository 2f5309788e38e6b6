use std::fmt;

/// Type tag of the synthetic action the root reducer is initialised with.
///
/// It never reaches a reducer as a value: initialisation goes through
/// [`Reducer::initial`](crate::Reducer::initial) instead. The tag only shows up
/// in logs and in faults raised while building the initial tree.
pub const INIT_ACTION: &str = "@@kitchen-store/INIT";

/// Actions describe an intended state transition.
///
/// Implement this on a closed enum, one variant per action type, with the
/// payload carried in the variant. The type tag is what logs and errors report.
///
/// ```rust
/// use kitchen_store::Action;
///
/// #[derive(Debug)]
/// enum CounterAction {
///     Increment,
///     Add(u32),
/// }
///
/// impl Action for CounterAction {
///     fn action_type(&self) -> &'static str {
///         match self {
///             CounterAction::Increment => "Increment",
///             CounterAction::Add(_) => "Add",
///         }
///     }
/// }
/// ```
pub trait Action: fmt::Debug {
    /// The tag naming this action's variant
    fn action_type(&self) -> &'static str;
}
