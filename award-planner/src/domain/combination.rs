//! End-to-end leg combinations and user selections.

use std::collections::BTreeMap;

use super::{DomainError, Leg};

/// One leg per segment across a contiguous run of segments.
///
/// `legs[i]` serves segment `first_segment + i`. Feasibility of adjacent
/// connections is established by the search that builds combinations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Combination {
    first_segment: usize,
    legs: Vec<Leg>,
}

impl Combination {
    /// Build a combination, checking the legs cover consecutive segment indices.
    pub fn new(legs: Vec<Leg>) -> Result<Self, DomainError> {
        let first_segment = legs
            .first()
            .map(|l| l.segment_index)
            .ok_or(DomainError::EmptyCombination)?;

        for (offset, leg) in legs.iter().enumerate() {
            if leg.segment_index != first_segment + offset {
                return Err(DomainError::NonContiguousCombination {
                    expected: first_segment + offset,
                    found: leg.segment_index,
                });
            }
        }

        Ok(Self {
            first_segment,
            legs,
        })
    }

    pub fn legs(&self) -> &[Leg] {
        &self.legs
    }

    pub fn first_segment(&self) -> usize {
        self.first_segment
    }

    pub fn last_segment(&self) -> usize {
        self.first_segment + self.legs.len() - 1
    }

    /// The leg serving `segment_index`, if this combination covers it.
    pub fn leg_at(&self, segment_index: usize) -> Option<&Leg> {
        segment_index
            .checked_sub(self.first_segment)
            .and_then(|offset| self.legs.get(offset))
    }

    /// Returns true if `leg` (by flight and departure) appears at any position.
    pub fn contains(&self, leg: &Leg) -> bool {
        self.legs.iter().any(|l| l.same_flight(leg))
    }

    /// Connection time in minutes at each change, in order.
    pub fn connection_minutes(&self) -> Vec<i64> {
        self.legs
            .windows(2)
            .map(|pair| pair[0].connection_minutes_to(&pair[1]))
            .collect()
    }
}

/// User-pinned legs, keyed by segment index.
///
/// Several legs may be pinned in one segment at once; an empty segment entry
/// is never stored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection(BTreeMap<usize, Vec<Leg>>);

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pin `leg` in `segment_index`, or unpin it if already pinned there.
    ///
    /// Returns true if the leg is pinned after the call.
    pub fn toggle(&mut self, leg: &Leg, segment_index: usize) -> bool {
        let pinned = self.0.entry(segment_index).or_default();

        if let Some(pos) = pinned.iter().position(|p| p.same_flight(leg)) {
            pinned.remove(pos);
            if pinned.is_empty() {
                self.0.remove(&segment_index);
            }
            false
        } else {
            pinned.push(leg.clone());
            true
        }
    }

    /// Pinned legs for `segment_index` (empty if none).
    pub fn pinned(&self, segment_index: usize) -> &[Leg] {
        self.0.get(&segment_index).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Returns true if `leg` is pinned in its own segment.
    pub fn is_pinned(&self, leg: &Leg) -> bool {
        self.pinned(leg.segment_index)
            .iter()
            .any(|p| p.same_flight(leg))
    }

    /// `(segment_index, pinned legs)` pairs, ascending by segment.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &[Leg])> + '_ {
        self.0.iter().map(|(idx, legs)| (*idx, legs.as_slice()))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::leg::test_support::leg;

    fn ab(dep: &str, arr: &str) -> Leg {
        leg(0, "AC1", "YYZ", "YVR", dep, arr)
    }

    fn bc(flight: &str, dep: &str, arr: &str) -> Leg {
        leg(1, flight, "YVR", "NRT", dep, arr)
    }

    #[test]
    fn combination_requires_consecutive_segments() {
        let first = ab("2025-03-15 09:00", "2025-03-15 12:00");
        let second = bc("AC3", "2025-03-15 13:00", "2025-03-16 15:00");

        let combo = Combination::new(vec![first.clone(), second.clone()]).unwrap();
        assert_eq!(combo.first_segment(), 0);
        assert_eq!(combo.last_segment(), 1);

        assert!(matches!(
            Combination::new(vec![]),
            Err(DomainError::EmptyCombination)
        ));
        assert!(matches!(
            Combination::new(vec![second.clone(), first.clone()]),
            Err(DomainError::NonContiguousCombination { .. })
        ));
        assert!(matches!(
            Combination::new(vec![first.clone(), first]),
            Err(DomainError::NonContiguousCombination { expected: 1, found: 0 })
        ));
    }

    #[test]
    fn combination_lookup() {
        let first = ab("2025-03-15 09:00", "2025-03-15 12:00");
        let second = bc("AC3", "2025-03-15 13:00", "2025-03-16 15:00");
        let combo = Combination::new(vec![first.clone(), second.clone()]).unwrap();

        assert_eq!(combo.leg_at(0), Some(&first));
        assert_eq!(combo.leg_at(1), Some(&second));
        assert_eq!(combo.leg_at(2), None);
        assert!(combo.contains(&second));
        assert_eq!(combo.connection_minutes(), vec![60]);
    }

    #[test]
    fn combination_starting_mid_route() {
        let second = bc("AC3", "2025-03-15 13:00", "2025-03-16 15:00");
        let combo = Combination::new(vec![second.clone()]).unwrap();
        assert_eq!(combo.first_segment(), 1);
        assert_eq!(combo.leg_at(0), None);
        assert_eq!(combo.leg_at(1), Some(&second));
        assert!(combo.connection_minutes().is_empty());
    }

    #[test]
    fn toggle_adds_then_removes() {
        let mut selection = Selection::new();
        let l = ab("2025-03-15 09:00", "2025-03-15 12:00");

        assert!(selection.toggle(&l, 0));
        assert!(selection.is_pinned(&l));
        assert_eq!(selection.pinned(0).len(), 1);

        assert!(!selection.toggle(&l, 0));
        assert!(!selection.is_pinned(&l));
        assert!(selection.is_empty());
        assert_eq!(selection.iter().count(), 0);
    }

    #[test]
    fn toggle_allows_several_legs_per_segment() {
        let mut selection = Selection::new();
        let early = bc("AC3", "2025-03-15 13:00", "2025-03-16 15:00");
        let late = bc("AC5", "2025-03-15 18:30", "2025-03-16 20:30");

        selection.toggle(&early, 1);
        selection.toggle(&late, 1);
        assert_eq!(selection.pinned(1).len(), 2);

        selection.toggle(&early, 1);
        assert_eq!(selection.pinned(1), std::slice::from_ref(&late));
    }

    #[test]
    fn toggle_matches_by_flight_and_departure() {
        let mut selection = Selection::new();
        let l = ab("2025-03-15 09:00", "2025-03-15 12:00");
        selection.toggle(&l, 0);

        let mut business_copy = l.clone();
        business_copy.cabins.business = true;
        assert!(selection.is_pinned(&business_copy));
        assert!(!selection.toggle(&business_copy, 0));
        assert!(selection.is_empty());
    }
}
