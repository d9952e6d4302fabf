//! Selection propagation.
//!
//! Pinning legs restricts the combinations still on offer; every shown leg
//! is then re-flagged as selected, hidden, or neither. Hidden legs stay in
//! the result so that unpinning restores them without another fetch.

use crate::domain::{Combination, Leg, Selection};

/// A shown leg with its selection flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegVisibility {
    pub leg: Leg,
    pub is_selected: bool,
    pub hidden: bool,
}

/// Outcome of a toggle: the new selection and recomputed visibility.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionUpdate {
    pub selection: Selection,
    pub legs: Vec<LegVisibility>,
    /// Combinations consistent with `selection`.
    pub consistent_combinations: usize,
}

/// Returns true if `combination` agrees with every pinned segment.
///
/// A combination that does not cover a pinned segment is not consistent.
pub fn is_consistent(combination: &Combination, selection: &Selection) -> bool {
    selection.iter().all(|(segment_index, pinned)| {
        combination
            .leg_at(segment_index)
            .is_some_and(|leg| pinned.iter().any(|p| p.same_flight(leg)))
    })
}

/// Flag every leg in `shown` against `selection`.
///
/// A leg is selected if pinned in its own segment. It is hidden if something
/// is pinned, it is not, and no consistent combination uses it anywhere.
pub fn apply_selection(
    shown: &[Leg],
    combinations: &[Combination],
    selection: &Selection,
) -> Vec<LegVisibility> {
    let consistent: Vec<&Combination> = combinations
        .iter()
        .filter(|c| is_consistent(c, selection))
        .collect();

    shown
        .iter()
        .map(|leg| {
            let is_selected = selection.is_pinned(leg);
            let hidden = !selection.is_empty()
                && !is_selected
                && !consistent.iter().any(|c| c.contains(leg));
            LegVisibility {
                leg: leg.clone(),
                is_selected,
                hidden,
            }
        })
        .collect()
}

/// Pin or unpin `leg` in `segment_index` and recompute visibility of the
/// `shown` legs.
///
/// `shown` is the displayed leg set: the legs used by `combinations`, or
/// every leg when there are none.
pub fn toggle_selection(
    shown: &[Leg],
    combinations: &[Combination],
    selection: &Selection,
    leg: &Leg,
    segment_index: usize,
) -> SelectionUpdate {
    let mut selection = selection.clone();
    selection.toggle(leg, segment_index);

    let legs = apply_selection(shown, combinations, &selection);
    let consistent_combinations = combinations
        .iter()
        .filter(|c| is_consistent(c, &selection))
        .count();

    SelectionUpdate {
        selection,
        legs,
        consistent_combinations,
    }
}
