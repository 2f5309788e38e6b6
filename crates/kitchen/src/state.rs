//! Kitchen state tree
//!
//! ```text
//! Kitchen
//! ├── electrical
//! │   ├── kettle_on
//! │   └── toaster_on
//! ├── dishes
//! │   ├── in_sink
//! │   └── available
//! └── occupied_by
//! ```
//!
//! Composite nodes are declared together with the reducers that maintain
//! them; the leaf reducers live in `crate::reducers`.

use std::fmt;

use kitchen_store::combine_reducers;
use serde::{Deserialize, Serialize};

use crate::actions::KitchenAction;

combine_reducers! {
    /// Appliances plugged in around the kitchen
    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    pub struct Electrical => pub struct ElectricalReducer(KitchenAction) {
        pub kettle_on: bool,
        pub toaster_on: bool,
    }
}

combine_reducers! {
    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    pub struct Dishes => pub struct DishesReducer(KitchenAction) {
        pub in_sink: bool,
        pub available: bool,
    }
}

combine_reducers! {
    /// The whole kitchen - root of the state tree
    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    pub struct Kitchen => pub struct KitchenReducer(KitchenAction) {
        pub electrical: Electrical,
        pub dishes: Dishes,
        /// Names of the people currently in the kitchen, in arrival order
        pub occupied_by: Vec<String>,
    }
}

fn on_off(on: bool) -> &'static str {
    if on {
        "on"
    } else {
        "off"
    }
}

impl fmt::Display for Kitchen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let occupants = if self.occupied_by.is_empty() {
            "nobody".to_string()
        } else {
            self.occupied_by.join(", ")
        };

        write!(
            f,
            "kettle {} | toaster {} | dishes {}, {} | occupied by {}",
            on_off(*self.electrical.kettle_on),
            on_off(*self.electrical.toaster_on),
            if *self.dishes.in_sink { "in sink" } else { "put away" },
            if *self.dishes.available {
                "available"
            } else {
                "unavailable"
            },
            occupants,
        )
    }
}
