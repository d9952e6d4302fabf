//! Flight leg type.
//!
//! A `Leg` is one nonstop flight candidate on one route segment, after
//! normalization. Legs are identified by flight number plus local departure
//! timestamp; two legs with the same key are the same flight on the same day,
//! whatever their cabin flags say.

use chrono::{NaiveDate, NaiveDateTime};

use super::{Airport, CabinFlags, FlightId, format_with_day_offset};

/// Identity of a leg within a segment: flight id plus local departure.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LegKey {
    pub flight_id: FlightId,
    pub departs_at: NaiveDateTime,
}

/// One normalized nonstop flight on one route segment.
///
/// Departure and arrival are naive local times at the respective airports,
/// so `arrives_at` may legitimately be earlier than `departs_at` on
/// westbound flights. Use `duration_minutes` for the block time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Leg {
    /// Canonical flight identifier (aliases already rewritten).
    pub flight_id: FlightId,
    pub origin: Airport,
    pub destination: Airport,
    pub departs_at: NaiveDateTime,
    pub arrives_at: NaiveDateTime,
    pub duration_minutes: i64,
    pub distance_miles: u32,
    pub cabins: CabinFlags,
    /// Position of the segment this leg serves, 0-based.
    pub segment_index: usize,
    /// Equipment description, when reported.
    pub aircraft: Option<String>,
}

impl Leg {
    /// Returns the identity key of this leg.
    pub fn key(&self) -> LegKey {
        LegKey {
            flight_id: self.flight_id.clone(),
            departs_at: self.departs_at,
        }
    }

    /// Returns true if `other` is the same flight departing at the same local time.
    ///
    /// Cabin flags, aircraft and segment index are not compared.
    pub fn same_flight(&self, other: &Leg) -> bool {
        self.flight_id == other.flight_id && self.departs_at == other.departs_at
    }

    /// Merge the cabin availability of a duplicate record into this leg.
    ///
    /// Returns false (and changes nothing) if `other` is a different flight.
    pub fn absorb(&mut self, other: &Leg) -> bool {
        if !self.same_flight(other) {
            return false;
        }
        self.cabins = self.cabins | other.cabins;
        if self.aircraft.is_none() {
            self.aircraft.clone_from(&other.aircraft);
        }
        true
    }

    /// Minutes from this leg's arrival to `next`'s departure (negative if `next` leaves first).
    pub fn connection_minutes_to(&self, next: &Leg) -> i64 {
        next.departs_at
            .signed_duration_since(self.arrives_at)
            .num_minutes()
    }

    /// Departure clock time, annotated `(+N)` when N days after `base`.
    pub fn departs_label(&self, base: NaiveDate) -> String {
        format_with_day_offset(self.departs_at, base)
    }

    /// Arrival clock time, annotated `(+N)` when N days after `base`.
    pub fn arrives_label(&self, base: NaiveDate) -> String {
        format_with_day_offset(self.arrives_at, base)
    }
}
