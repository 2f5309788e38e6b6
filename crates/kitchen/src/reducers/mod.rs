//! Reducers for every slice of the kitchen state tree
//!
//! Leaf reducers only return a new value when the value actually changes, so
//! unrelated actions leave every pointer in the tree as it was.

pub mod dishes_reducer;
pub mod electrical_reducer;
pub mod kitchen_reducer;
pub mod occupancy_reducer;

/// Move a boolean slice to `target`, keeping the current value if it is there already
fn switch_to(current: &bool, target: bool) -> Option<bool> {
    (*current != target).then_some(target)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_switch_to() {
        assert_eq!(switch_to(&false, true), Some(true));
        assert_eq!(switch_to(&true, true), None);
        assert_eq!(switch_to(&true, false), Some(false));
    }
}
