//! Kitchen actions
//!
//! Things that can happen in the kitchen, named in the past tense. Payloads
//! live in the variants; use the creator functions below to build the ones
//! that carry data.

use kitchen_store::Action;

/// Every state change the kitchen knows about
#[derive(Debug, Clone, PartialEq, Eq, strum::IntoStaticStr)]
pub enum KitchenAction {
    /// ## Electrical
    TurnedKettleOn,
    TurnedKettleOff,
    TurnedToasterOn,
    TurnedToasterOff,
    /// Every appliance switched off at once
    TurnedAllElectricalOff,

    /// ## Dishes
    DishesUsed,
    DishesWashed,

    /// ## Occupancy
    SomeoneEnteredTheKitchen { who: String },
    SomeoneLeftTheKitchen { who: String },
}

impl Action for KitchenAction {
    fn action_type(&self) -> &'static str {
        self.into()
    }
}

pub fn someone_enters_the_kitchen(who: impl Into<String>) -> KitchenAction {
    KitchenAction::SomeoneEnteredTheKitchen { who: who.into() }
}

pub fn someone_leaves_the_kitchen(who: impl Into<String>) -> KitchenAction {
    KitchenAction::SomeoneLeftTheKitchen { who: who.into() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_action_type_is_variant_name() {
        assert_eq!(KitchenAction::TurnedKettleOff.action_type(), "TurnedKettleOff");
        assert_eq!(
            someone_leaves_the_kitchen("peter").action_type(),
            "SomeoneLeftTheKitchen"
        );
    }

    #[test]
    fn test_creators_carry_payload() {
        assert_eq!(
            someone_leaves_the_kitchen("fred"),
            KitchenAction::SomeoneLeftTheKitchen {
                who: "fred".to_string()
            }
        );
        assert_eq!(
            someone_enters_the_kitchen(String::from("ali")),
            KitchenAction::SomeoneEnteredTheKitchen {
                who: "ali".to_string()
            }
        );
    }
}
