use kitchen_store::{try_leaf, Action, Reducer, ReducerFault};

use crate::actions::KitchenAction;

/// Reducer for `occupied_by`
///
/// Arrivals are appended in order and a name appears at most once. Entering
/// with an empty name, or when `capacity` people are already inside, fails the
/// dispatch and leaves the committed state alone.
pub fn reducer(capacity: usize) -> impl Reducer<KitchenAction, State = Vec<String>> {
    try_leaf(Vec::new, move |occupants: &Vec<String>, action: &KitchenAction| {
        match action {
            KitchenAction::SomeoneEnteredTheKitchen { who } => enter(occupants, who, capacity)
                .map_err(|message| ReducerFault::new(action.action_type(), message)),
            KitchenAction::SomeoneLeftTheKitchen { who } => Ok(leave(occupants, who)),
            _ => Ok(None),
        }
    })
}

/// Check an `occupied_by` list that did not come through `reducer`, such as
/// a configured seed, against the rules `reducer` keeps
pub fn validate(occupants: &[String], capacity: usize) -> Result<(), String> {
    if occupants.len() > capacity {
        return Err(format!(
            "{} occupants do not fit a kitchen for {}",
            occupants.len(),
            capacity
        ));
    }
    for (i, name) in occupants.iter().enumerate() {
        if name.trim().is_empty() {
            return Err("occupant without a name".to_string());
        }
        if name.trim() != name.as_str() {
            return Err(format!("occupant `{}` has surrounding whitespace", name));
        }
        if occupants[..i].contains(name) {
            return Err(format!("`{}` is listed more than once", name));
        }
    }
    Ok(())
}

fn enter(occupants: &[String], who: &str, capacity: usize) -> Result<Option<Vec<String>>, String> {
    let who = who.trim();
    if who.is_empty() {
        return Err("nobody can enter without a name".to_string());
    }
    if occupants.iter().any(|name| name == who) {
        log::debug!("{} is already in the kitchen", who);
        return Ok(None);
    }
    if occupants.len() >= capacity {
        return Err(format!(
            "kitchen is full ({} of {}), {} has to wait",
            occupants.len(),
            capacity,
            who
        ));
    }

    let mut next = occupants.to_vec();
    next.push(who.to_string());
    Ok(Some(next))
}

fn leave(occupants: &[String], who: &str) -> Option<Vec<String>> {
    let who = who.trim();
    if !occupants.iter().any(|name| name == who) {
        log::debug!("{} is not in the kitchen", who);
        return None;
    }

    Some(
        occupants
            .iter()
            .filter(|name| *name != who)
            .cloned()
            .collect(),
    )
}
