//! Raw flight record normalization.
//!
//! Turns one seat-detail batch (one segment, one date) into canonical legs:
//! only nonstop flights on permitted carriers survive, carrier aliases are
//! rewritten to the operating carrier, schedule revisions keep the later
//! departure, and per-cabin duplicates collapse into one leg with the union
//! of their cabin flags.

use std::collections::HashMap;

use tracing::debug;

use crate::availability::RawFlightRecord;
use crate::domain::{
    Airport, ArrivalBounds, Cabin, CabinFlags, CarrierCode, FlightId, InvalidFlightId, Leg,
    SearchWindow, TimeError, parse_local_timestamp,
};

use super::config::PlannerConfig;

/// Distance used when neither the record nor the calendar reports one.
pub const DEFAULT_DISTANCE_MILES: u32 = 1000;

/// Equipment label the API reports for the 787-10, and its display form.
const AIRCRAFT_787_RAW: &str = "787  All";
const AIRCRAFT_787_NAME: &str = "Boeing 787-10";

/// Why a raw record did not become a leg.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecordRejected {
    #[error("not a direct flight ({0} stops)")]
    NotDirect(u32),

    #[error("excluded carrier {0}")]
    ExcludedCarrier(CarrierCode),

    #[error(transparent)]
    FlightNumber(#[from] InvalidFlightId),

    #[error(transparent)]
    Timestamp(#[from] TimeError),

    #[error("serves {origin}-{destination}, not this segment")]
    WrongHop {
        origin: String,
        destination: String,
    },

    #[error("departs outside the search window")]
    OutsideWindow,
}

/// The segment a batch belongs to.
#[derive(Debug, Clone, Copy)]
pub struct HopContext {
    pub segment_index: usize,
    pub origin: Airport,
    pub destination: Airport,
    /// Hop distance from the availability calendar, if known.
    pub distance_miles: Option<u32>,
}

/// Legs produced from one batch, with their arrival bounds.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedBatch {
    pub legs: Vec<Leg>,
    pub arrivals: Option<ArrivalBounds>,
}

/// Normalize one batch of raw records for `hop`.
///
/// When `window` is given, records departing outside `[start, end)` are
/// dropped. Output order follows the first appearance of each flight id.
pub fn normalize_batch(
    records: &[RawFlightRecord],
    hop: &HopContext,
    window: Option<&SearchWindow>,
    config: &PlannerConfig,
) -> NormalizedBatch {
    let mut legs: Vec<Leg> = Vec::new();
    let mut by_flight: HashMap<FlightId, usize> = HashMap::new();

    for record in records {
        let leg = match convert_record(record, hop, window, config) {
            Ok(leg) => leg,
            Err(reason) => {
                debug!(
                    flight = %record.flight_numbers,
                    departs = %record.departs_at,
                    %reason,
                    "skipping flight record"
                );
                continue;
            }
        };

        match by_flight.get(&leg.flight_id) {
            None => {
                by_flight.insert(leg.flight_id.clone(), legs.len());
                legs.push(leg);
            }
            Some(&idx) => {
                let existing = &mut legs[idx];
                if leg.departs_at > existing.departs_at {
                    debug!(
                        flight = %leg.flight_id,
                        old = %existing.departs_at,
                        new = %leg.departs_at,
                        "schedule revision, keeping later departure"
                    );
                    *existing = leg;
                } else if leg.departs_at == existing.departs_at {
                    existing.absorb(&leg);
                }
            }
        }
    }

    let arrivals = ArrivalBounds::of(&legs);
    NormalizedBatch { legs, arrivals }
}

/// Append `batch` to a segment's legs, merging cabins of same-key legs.
///
/// Batches from different dates are concatenated this way so that flight id
/// plus departure stays unique across the whole segment.
pub fn merge_into(target: &mut Vec<Leg>, batch: Vec<Leg>) {
    for leg in batch {
        match target.iter_mut().find(|l| l.same_flight(&leg)) {
            Some(existing) => {
                existing.absorb(&leg);
            }
            None => target.push(leg),
        }
    }
}

fn convert_record(
    record: &RawFlightRecord,
    hop: &HopContext,
    window: Option<&SearchWindow>,
    config: &PlannerConfig,
) -> Result<Leg, RecordRejected> {
    if record.stops != 0 {
        return Err(RecordRejected::NotDirect(record.stops));
    }

    let flight_id = FlightId::parse(first_token(&record.flight_numbers))?;
    let carrier = CarrierCode::parse(first_token(&record.carriers)).unwrap_or(flight_id.carrier());

    if config.is_excluded(carrier) || config.is_excluded(flight_id.carrier()) {
        return Err(RecordRejected::ExcludedCarrier(carrier));
    }

    let operating = config.canonical_carrier(flight_id.carrier());
    let flight_id = if operating == flight_id.carrier() {
        flight_id
    } else {
        flight_id.with_carrier(operating)
    };

    let departs_at = parse_local_timestamp(&record.departs_at)?;
    if let Some(window) = window {
        if !window.contains(departs_at) {
            return Err(RecordRejected::OutsideWindow);
        }
    }
    let arrives_at = parse_local_timestamp(&record.arrives_at)?;

    let origin = record_airport(record.origin_airport.as_deref(), hop.origin);
    let destination = record_airport(record.destination_airport.as_deref(), hop.destination);
    if origin != hop.origin || destination != hop.destination {
        return Err(RecordRejected::WrongHop {
            origin: origin.to_string(),
            destination: destination.to_string(),
        });
    }

    let mut cabins = CabinFlags::default();
    match Cabin::parse(&record.cabin) {
        Ok(cabin) => cabins.set(cabin),
        Err(e) => debug!(flight = %flight_id, error = %e, "unrecognized cabin"),
    }

    let duration_minutes = record
        .total_duration
        .unwrap_or_else(|| arrives_at.signed_duration_since(departs_at).num_minutes());

    Ok(Leg {
        flight_id,
        origin,
        destination,
        departs_at,
        arrives_at,
        duration_minutes,
        distance_miles: record
            .distance
            .or(hop.distance_miles)
            .unwrap_or(DEFAULT_DISTANCE_MILES),
        cabins,
        segment_index: hop.segment_index,
        aircraft: aircraft_name(&record.aircraft),
    })
}

/// First entry of a comma-separated API field.
fn first_token(field: &str) -> &str {
    field.split(',').next().unwrap_or("").trim()
}

/// The record's airport if it reports a valid one, else the hop's.
fn record_airport(reported: Option<&str>, fallback: Airport) -> Airport {
    reported
        .and_then(|s| Airport::parse_normalized(s).ok())
        .unwrap_or(fallback)
}

fn aircraft_name(aircraft: &[String]) -> Option<String> {
    let name = aircraft.first()?;
    if name == AIRCRAFT_787_RAW {
        return Some(AIRCRAFT_787_NAME.to_string());
    }
    let name = name.trim();
    (!name.is_empty()).then(|| name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::leg::test_support::{airport, ts};

    fn record(flight: &str, departs: &str, arrives: &str, cabin: &str) -> RawFlightRecord {
        RawFlightRecord {
            carriers: flight[..2].to_string(),
            flight_numbers: flight.to_string(),
            stops: 0,
            aircraft: vec![],
            departs_at: departs.to_string(),
            arrives_at: arrives.to_string(),
            cabin: cabin.to_string(),
            distance: None,
            total_duration: None,
            origin_airport: Some("YYZ".to_string()),
            destination_airport: Some("YVR".to_string()),
        }
    }

    fn hop() -> HopContext {
        HopContext {
            segment_index: 0,
            origin: airport("YYZ"),
            destination: airport("YVR"),
            distance_miles: Some(2086),
        }
    }

    fn normalize(records: &[RawFlightRecord]) -> NormalizedBatch {
        normalize_batch(records, &hop(), None, &PlannerConfig::default())
    }

    #[test]
    fn cabin_records_merge_into_one_leg() {
        let records = vec![
            record("XY123", "2025-03-15T10:00:00Z", "2025-03-15T12:00:00Z", "economy"),
            record("XY123", "2025-03-15T10:00:00Z", "2025-03-15T12:00:00Z", "Business"),
        ];
        let batch = normalize(&records);

        assert_eq!(batch.legs.len(), 1);
        let leg = &batch.legs[0];
        assert!(leg.cabins.economy);
        assert!(leg.cabins.business);
        assert!(!leg.cabins.first);
    }

    #[test]
    fn schedule_revision_keeps_later_departure() {
        let records = vec![
            record("XY123", "2025-03-15T10:00:00", "2025-03-15T12:00:00", "economy"),
            record("XY123", "2025-03-15T10:00:00", "2025-03-15T12:00:00", "business"),
            record("XY123", "2025-03-15T11:00:00", "2025-03-15T13:00:00", "first"),
        ];
        let batch = normalize(&records);

        assert_eq!(batch.legs.len(), 1);
        let leg = &batch.legs[0];
        assert_eq!(leg.departs_at, ts("2025-03-15 11:00"));
        assert_eq!(leg.cabins, CabinFlags::only(Cabin::First));

        // Order of arrival does not matter.
        let reversed: Vec<_> = records.into_iter().rev().collect();
        assert_eq!(normalize(&reversed).legs, batch.legs);
    }

    #[test]
    fn rejects_connecting_and_excluded_flights() {
        let mut one_stop = record("AC100", "2025-03-15T10:00", "2025-03-15T14:00", "economy");
        one_stop.stops = 1;
        let excluded = record("EK241", "2025-03-15T10:00", "2025-03-15T14:00", "economy");
        let kept = record("AC102", "2025-03-15T10:00", "2025-03-15T14:00", "economy");

        let batch = normalize(&[one_stop, excluded, kept]);
        assert_eq!(batch.legs.len(), 1);
        assert_eq!(batch.legs[0].flight_id.to_string(), "AC102");
    }

    #[test]
    fn rewrites_carrier_alias() {
        let rouge = record("RV1850", "2025-03-15T09:00", "2025-03-15T11:10", "economy");
        let batch = normalize(&[rouge]);
        assert_eq!(batch.legs[0].flight_id.to_string(), "AC1850");
    }

    #[test]
    fn alias_and_operating_records_merge() {
        let records = vec![
            record("RV1850", "2025-03-15T09:00", "2025-03-15T11:10", "economy"),
            record("AC1850", "2025-03-15T09:00", "2025-03-15T11:10", "business"),
        ];
        let batch = normalize(&records);
        assert_eq!(batch.legs.len(), 1);
        assert!(batch.legs[0].cabins.economy && batch.legs[0].cabins.business);
    }

    #[test]
    fn window_is_half_open() {
        let window = SearchWindow::new(ts("2025-03-15 12:00"), ts("2025-03-16 17:00"));
        let records = vec![
            record("AC1", "2025-03-15T12:00", "2025-03-15T14:00", "economy"),
            record("AC2", "2025-03-15T11:59", "2025-03-15T14:00", "economy"),
            record("AC3", "2025-03-16T17:00", "2025-03-16T19:00", "economy"),
            record("AC4", "2025-03-16T16:59", "2025-03-16T19:00", "economy"),
        ];
        let batch = normalize_batch(&records, &hop(), Some(&window), &PlannerConfig::default());
        let ids: Vec<String> = batch.legs.iter().map(|l| l.flight_id.to_string()).collect();
        assert_eq!(ids, vec!["AC1", "AC4"]);
    }

    #[test]
    fn trailing_z_is_local_time() {
        let batch = normalize(&[record(
            "AC1",
            "2025-03-15T23:30:00Z",
            "2025-03-16T01:00:00Z",
            "economy",
        )]);
        assert_eq!(batch.legs[0].departs_at, ts("2025-03-15 23:30"));
        assert_eq!(batch.legs[0].duration_minutes, 90);
    }

    #[test]
    fn fills_optional_fields() {
        let mut r = record("AC1", "2025-03-15T09:00", "2025-03-15T11:00", "economy");
        r.aircraft = vec!["787  All".to_string()];
        r.total_duration = Some(310);
        r.origin_airport = None;
        let batch = normalize(&[r]);
        let leg = &batch.legs[0];

        assert_eq!(leg.aircraft.as_deref(), Some("Boeing 787-10"));
        assert_eq!(leg.duration_minutes, 310);
        assert_eq!(leg.distance_miles, 2086);
        assert_eq!(leg.origin, airport("YYZ"));
        assert_eq!(leg.segment_index, 0);
    }

    #[test]
    fn distance_defaults_without_calendar() {
        let hop = HopContext {
            distance_miles: None,
            ..hop()
        };
        let r = record("AC1", "2025-03-15T09:00", "2025-03-15T11:00", "economy");
        let batch = normalize_batch(&[r], &hop, None, &PlannerConfig::default());
        assert_eq!(batch.legs[0].distance_miles, DEFAULT_DISTANCE_MILES);
    }

    #[test]
    fn wrong_hop_and_bad_timestamps_are_skipped() {
        let mut other = record("AC1", "2025-03-15T09:00", "2025-03-15T11:00", "economy");
        other.destination_airport = Some("YUL".to_string());
        let bad_time = record("AC2", "tomorrow", "2025-03-15T11:00", "economy");
        let bad_number = record("ACXYZ", "2025-03-15T09:00", "2025-03-15T11:00", "economy");

        assert!(normalize(&[other, bad_time, bad_number]).legs.is_empty());
    }

    #[test]
    fn arrival_bounds_reported() {
        let records = vec![
            record("AC2", "2025-03-15T14:00", "2025-03-15T17:00", "economy"),
            record("AC1", "2025-03-15T09:00", "2025-03-15T12:00", "economy"),
        ];
        let batch = normalize(&records);
        let bounds = batch.arrivals.unwrap();
        assert_eq!(bounds.earliest, ts("2025-03-15 12:00"));
        assert_eq!(bounds.latest, ts("2025-03-15 17:00"));

        assert_eq!(normalize(&[]).arrivals, None);
    }

    #[test]
    fn merge_into_keeps_distinct_days() {
        let day1 = normalize(&[record("AC1", "2025-03-15T09:00", "2025-03-15T11:00", "economy")]);
        let day2 = normalize(&[
            record("AC1", "2025-03-16T09:00", "2025-03-16T11:00", "economy"),
            record("AC1", "2025-03-15T09:00", "2025-03-15T11:00", "first"),
        ]);

        let mut legs = day1.legs;
        merge_into(&mut legs, day2.legs);

        assert_eq!(legs.len(), 2);
        assert!(legs[0].cabins.economy && legs[0].cabins.first);
        assert_eq!(legs[1].departs_at, ts("2025-03-16 09:00"));
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn arb_record() -> impl Strategy<Value = RawFlightRecord> {
            (
                prop::sample::select(vec!["AC1", "AC2", "RV3", "LH4", "EK5"]),
                0u32..2,
                0u32..3,
                0u32..4,
                prop::sample::select(vec!["economy", "business", "first", "premium"]),
            )
                .prop_map(|(flight, stops, day, hour, cabin)| {
                    let departs = format!("2025-03-{:02}T{:02}:00", 15 + day, 8 + hour);
                    let arrives = format!("2025-03-{:02}T{:02}:30", 15 + day, 10 + hour);
                    RawFlightRecord {
                        stops,
                        ..record(flight, &departs, &arrives, cabin)
                    }
                })
        }

        proptest! {
            #[test]
            fn batch_twice_is_batch_once(records in prop::collection::vec(arb_record(), 0..20)) {
                let once = normalize(&records);
                let doubled: Vec<_> = records.iter().chain(records.iter()).cloned().collect();
                prop_assert_eq!(normalize(&doubled), once);
            }

            #[test]
            fn flight_ids_unique_within_batch(records in prop::collection::vec(arb_record(), 0..20)) {
                let batch = normalize(&records);
                for (i, a) in batch.legs.iter().enumerate() {
                    for b in &batch.legs[i + 1..] {
                        prop_assert_ne!(&a.flight_id, &b.flight_id);
                    }
                }
            }

            #[test]
            fn cabins_are_union_of_surviving_records(records in prop::collection::vec(arb_record(), 0..20)) {
                let config = PlannerConfig::default();
                let batch = normalize(&records);
                for leg in &batch.legs {
                    let mut expected = CabinFlags::default();
                    for r in &records {
                        let Ok(candidate) = convert_record(r, &hop(), None, &config) else {
                            continue;
                        };
                        if candidate.same_flight(leg) {
                            expected = expected | candidate.cabins;
                        }
                    }
                    prop_assert_eq!(leg.cabins, expected);
                }
            }

            #[test]
            fn merge_into_is_idempotent(records in prop::collection::vec(arb_record(), 0..20)) {
                let legs = normalize(&records).legs;
                let mut merged = legs.clone();
                merge_into(&mut merged, legs.clone());
                prop_assert_eq!(merged, legs);
            }
        }
    }
}
