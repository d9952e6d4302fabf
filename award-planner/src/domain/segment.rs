//! Route segments, their search windows and arrival bounds.

use chrono::{NaiveDate, NaiveDateTime};

use super::{Airport, Leg, dates_between};

/// Admissible departure interval for a segment's legs.
///
/// `start` is inclusive and `end` exclusive when filtering legs; the
/// calendar dates to fetch are those touched by `[start, end]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchWindow {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl SearchWindow {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self { start, end }
    }

    /// Returns true if a departure at `ts` falls inside `[start, end)`.
    pub fn contains(&self, ts: NaiveDateTime) -> bool {
        self.start <= ts && ts < self.end
    }

    /// Calendar dates spanned by the window, inclusive, one per day.
    pub fn dates(&self) -> Vec<NaiveDate> {
        dates_between(self.start, self.end)
    }
}

/// Earliest and latest arrival among a segment's legs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArrivalBounds {
    pub earliest: NaiveDateTime,
    pub latest: NaiveDateTime,
}

impl ArrivalBounds {
    /// Bounds over `legs`, or `None` when there are no legs.
    pub fn of(legs: &[Leg]) -> Option<Self> {
        let earliest = legs.iter().map(|l| l.arrives_at).min()?;
        let latest = legs.iter().map(|l| l.arrives_at).max()?;
        Some(Self { earliest, latest })
    }
}

/// One origin-destination hop of the route with its accepted legs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub index: usize,
    pub origin: Airport,
    pub destination: Airport,
    pub window: SearchWindow,
    legs: Vec<Leg>,
    arrivals: Option<ArrivalBounds>,
}

impl Segment {
    /// Create a segment; arrival bounds are derived from `legs`.
    pub fn new(
        index: usize,
        origin: Airport,
        destination: Airport,
        window: SearchWindow,
        legs: Vec<Leg>,
    ) -> Self {
        let arrivals = ArrivalBounds::of(&legs);
        Self {
            index,
            origin,
            destination,
            window,
            legs,
            arrivals,
        }
    }

    /// Accepted legs, in the order they were fetched.
    pub fn legs(&self) -> &[Leg] {
        &self.legs
    }

    pub fn is_empty(&self) -> bool {
        self.legs.is_empty()
    }

    pub fn arrivals(&self) -> Option<ArrivalBounds> {
        self.arrivals
    }

    pub fn earliest_arrival(&self) -> Option<NaiveDateTime> {
        self.arrivals.map(|a| a.earliest)
    }

    pub fn latest_arrival(&self) -> Option<NaiveDateTime> {
        self.arrivals.map(|a| a.latest)
    }

    /// Route label such as `"YYZ-YVR"`.
    pub fn label(&self) -> String {
        format!("{}-{}", self.origin, self.destination)
    }
}
