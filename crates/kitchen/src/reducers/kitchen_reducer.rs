//! Root reducer - wires every slice reducer into the kitchen tree

use super::{dishes_reducer, electrical_reducer, occupancy_reducer};
use crate::state::KitchenReducer;

/// Build the root reducer for a kitchen that holds at most `capacity` people
pub fn reducer(capacity: usize) -> KitchenReducer {
    KitchenReducer::new(
        electrical_reducer::reducer(),
        dishes_reducer::reducer(),
        occupancy_reducer::reducer(capacity),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::{someone_enters_the_kitchen, KitchenAction};
    use kitchen_store::{Reducer, Shared};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_initial_tree() {
        let kitchen = reducer(4).initial().unwrap();

        assert_eq!(
            kitchen.to_string(),
            "kettle off | toaster off | dishes put away, available | occupied by nobody"
        );
    }

    #[test]
    fn test_siblings_keep_their_pointers() {
        let reducer = reducer(4);
        let before = reducer.initial().unwrap();

        let after = reducer
            .reduce(&before, &KitchenAction::TurnedToasterOn)
            .unwrap();

        assert!(!Shared::ptr_eq(&before, &after));
        assert!(!Shared::ptr_eq(&before.electrical, &after.electrical));
        assert!(Shared::ptr_eq(
            &before.electrical.kettle_on,
            &after.electrical.kettle_on
        ));
        assert!(Shared::ptr_eq(&before.dishes, &after.dishes));
        assert!(Shared::ptr_eq(&before.occupied_by, &after.occupied_by));
    }

    #[test]
    fn test_noop_keeps_root() {
        let reducer = reducer(4);
        let before = reducer.initial().unwrap();

        let after = reducer
            .reduce(&before, &KitchenAction::TurnedKettleOff)
            .unwrap();

        assert!(Shared::ptr_eq(&before, &after));
    }

    #[test]
    fn test_fault_in_one_slice_fails_the_whole_tree() {
        let reducer = reducer(0);
        let before = reducer.initial().unwrap();

        let fault = reducer
            .reduce(&before, &someone_enters_the_kitchen("peter"))
            .unwrap_err();

        assert_eq!(fault.action_type, "SomeoneEnteredTheKitchen");
    }
}
