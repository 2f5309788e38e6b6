use kitchen_store::{leaf, Reducer};

use super::switch_to;
use crate::actions::KitchenAction;
use crate::state::DishesReducer;

/// Reducer for `dishes.in_sink`
pub fn in_sink_reducer() -> impl Reducer<KitchenAction, State = bool> {
    leaf(
        || false,
        |in_sink: &bool, action: &KitchenAction| match action {
            KitchenAction::DishesUsed => switch_to(in_sink, true),
            KitchenAction::DishesWashed => switch_to(in_sink, false),
            _ => None,
        },
    )
}

/// Reducer for `dishes.available`
pub fn available_reducer() -> impl Reducer<KitchenAction, State = bool> {
    leaf(
        || true,
        |available: &bool, action: &KitchenAction| match action {
            KitchenAction::DishesUsed => switch_to(available, false),
            KitchenAction::DishesWashed => switch_to(available, true),
            _ => None,
        },
    )
}

pub fn reducer() -> DishesReducer {
    DishesReducer::new(in_sink_reducer(), available_reducer())
}

#[cfg(test)]
mod tests {
    use super::*;
    use kitchen_store::Shared;

    #[test]
    fn test_defaults_are_clean() {
        let state = reducer().initial().unwrap();

        assert!(!*state.in_sink);
        assert!(*state.available);
    }

    #[test]
    fn test_used_then_washed() {
        let reducer = reducer();
        let clean = reducer.initial().unwrap();

        let dirty = reducer.reduce(&clean, &KitchenAction::DishesUsed).unwrap();
        assert!(*dirty.in_sink);
        assert!(!*dirty.available);

        let washed = reducer.reduce(&dirty, &KitchenAction::DishesWashed).unwrap();
        assert_eq!(*washed, *clean);
        assert!(!Shared::ptr_eq(&washed, &clean));
    }

    #[test]
    fn test_washing_clean_dishes_is_noop() {
        let reducer = reducer();
        let clean = reducer.initial().unwrap();

        let next = reducer.reduce(&clean, &KitchenAction::DishesWashed).unwrap();

        assert!(Shared::ptr_eq(&clean, &next));
    }
}
