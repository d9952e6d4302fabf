//! Per-date availability calendar for a route.
//!
//! The calendar answers two questions: which cabins are open on each hop on
//! a given day (for the date picker), and which upstream segment ID to fetch
//! seat detail for when the planner needs hop `i` on date `d`.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use tracing::debug;

use crate::domain::{Airport, Route};

use super::types::{AvailabilityEntry, ClassOpen};

/// Availability of one route hop on one date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HopAvailability {
    pub hop_index: usize,
    pub origin: Airport,
    pub destination: Airport,
    /// Upstream ID for the seat detail; `None` when the API had no row.
    pub segment_id: Option<String>,
    pub distance: Option<u32>,
    pub classes: ClassOpen,
}

/// Availability rows grouped by date, one row per route hop.
#[derive(Debug, Clone, Default)]
pub struct AvailabilityCalendar {
    days: BTreeMap<NaiveDate, Vec<HopAvailability>>,
}

impl AvailabilityCalendar {
    /// Group `entries` by date against the hops of `route`.
    ///
    /// Rows for airport pairs not on the route, or with unparseable dates,
    /// are dropped. Every date that has any row gets a full set of hops;
    /// hops without a row are filled in with all classes closed.
    pub fn from_entries(route: &Route, entries: &[AvailabilityEntry]) -> Self {
        let mut days: BTreeMap<NaiveDate, Vec<HopAvailability>> = BTreeMap::new();

        for entry in entries {
            let Ok(date) = NaiveDate::parse_from_str(&entry.date, "%Y-%m-%d") else {
                debug!(date = %entry.date, id = %entry.segment_id, "skipping row with bad date");
                continue;
            };

            let matching: Vec<(usize, Airport, Airport)> = route
                .hops()
                .filter(|(_, from, to)| {
                    from.as_str() == entry.origin_airport && to.as_str() == entry.destination_airport
                })
                .collect();

            if matching.is_empty() {
                continue;
            }

            let day = days.entry(date).or_insert_with(|| closed_day(route));
            for (idx, _, _) in matching {
                let hop = &mut day[idx];
                hop.segment_id = Some(entry.segment_id.clone());
                hop.distance = entry.distance;
                hop.classes = entry.class_open;
            }
        }

        Self { days }
    }

    /// Dates with at least one row, ascending.
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.days.keys().copied()
    }

    /// All hop rows for `date`.
    pub fn day(&self, date: NaiveDate) -> Option<&[HopAvailability]> {
        self.days.get(&date).map(Vec::as_slice)
    }

    /// Returns true if any hop has any class open on `date`.
    pub fn has_any_availability(&self, date: NaiveDate) -> bool {
        self.day(date)
            .is_some_and(|hops| hops.iter().any(|h| h.classes.any()))
    }

    /// Upstream segment ID for hop `hop_index` on `date`.
    pub fn segment_id(&self, hop_index: usize, date: NaiveDate) -> Option<&str> {
        self.day(date)?
            .get(hop_index)?
            .segment_id
            .as_deref()
    }

    /// First known distance for hop `hop_index` on any date.
    pub fn distance(&self, hop_index: usize) -> Option<u32> {
        self.days
            .values()
            .find_map(|hops| hops.get(hop_index).and_then(|h| h.distance))
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}

fn closed_day(route: &Route) -> Vec<HopAvailability> {
    route
        .hops()
        .map(|(hop_index, origin, destination)| HopAvailability {
            hop_index,
            origin,
            destination,
            segment_id: None,
            distance: None,
            classes: ClassOpen::default(),
        })
        .collect()
}
