use kitchen_store::{leaf, Reducer};

use super::switch_to;
use crate::actions::KitchenAction;
use crate::state::ElectricalReducer;

/// Reducer for `electrical.kettle_on`
pub fn kettle_reducer() -> impl Reducer<KitchenAction, State = bool> {
    leaf(
        || false,
        |on: &bool, action: &KitchenAction| match action {
            KitchenAction::TurnedKettleOn => switch_to(on, true),
            KitchenAction::TurnedKettleOff | KitchenAction::TurnedAllElectricalOff => {
                switch_to(on, false)
            }
            _ => None,
        },
    )
}

/// Reducer for `electrical.toaster_on`
pub fn toaster_reducer() -> impl Reducer<KitchenAction, State = bool> {
    leaf(
        || false,
        |on: &bool, action: &KitchenAction| match action {
            KitchenAction::TurnedToasterOn => switch_to(on, true),
            KitchenAction::TurnedToasterOff | KitchenAction::TurnedAllElectricalOff => {
                switch_to(on, false)
            }
            _ => None,
        },
    )
}

pub fn reducer() -> ElectricalReducer {
    ElectricalReducer::new(kettle_reducer(), toaster_reducer())
}
