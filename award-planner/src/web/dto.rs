//! Data transfer objects for web requests and responses.
//!
//! Timestamps travel as naive local `YYYY-MM-DDTHH:MM:SS` strings. Legs carry
//! display labels (`HH:MM (+N)`) relative to the search start date; labels
//! are ignored when legs are sent back in.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::availability::{AvailabilityCalendar, HopAvailability};
use crate::domain::{
    Airport, CabinFlags, Combination, DateRange, FlightId, Leg, Route, SearchWindow, Segment,
    Selection, StopoverSpec, parse_local_timestamp,
};
use crate::planner::SelectionUpdate;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// A request field that failed validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {field}: {message}")]
pub struct InvalidInput {
    pub field: &'static str,
    pub message: String,
}

impl InvalidInput {
    fn new(field: &'static str, message: impl ToString) -> Self {
        Self {
            field,
            message: message.to_string(),
        }
    }
}

fn format_timestamp(ts: NaiveDateTime) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

fn parse_timestamp(field: &'static str, s: &str) -> Result<NaiveDateTime, InvalidInput> {
    parse_local_timestamp(s).map_err(|e| InvalidInput::new(field, e))
}

fn parse_date(field: &'static str, s: &str) -> Result<NaiveDate, InvalidInput> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| InvalidInput::new(field, e))
}

fn parse_airport(field: &'static str, s: &str) -> Result<Airport, InvalidInput> {
    Airport::parse_normalized(s).map_err(|e| InvalidInput::new(field, e))
}

/// Parse a route such as `"YYZ-YVR-NRT"`.
pub fn parse_route(s: &str) -> Result<Route, InvalidInput> {
    Route::parse(s).map_err(|e| InvalidInput::new("route", e))
}

/// Query for the availability calendar.
#[derive(Debug, Deserialize)]
pub struct CalendarQuery {
    /// Route such as "YYZ-YVR-NRT"
    pub route: String,

    /// Only dates on or after this one (YYYY-MM-DD)
    pub from: Option<String>,
}

impl CalendarQuery {
    pub fn from_date(&self) -> Result<Option<NaiveDate>, InvalidInput> {
        self.from.as_deref().map(|d| parse_date("from", d)).transpose()
    }
}

/// Availability calendar response.
#[derive(Debug, Serialize)]
pub struct CalendarResponse {
    pub route: String,
    pub days: Vec<CalendarDay>,
}

/// One calendar date with per-hop availability.
#[derive(Debug, Serialize)]
pub struct CalendarDay {
    pub date: String,
    pub has_availability: bool,
    pub hops: Vec<HopResult>,
}

/// Availability of one hop on one date.
#[derive(Debug, Serialize)]
pub struct HopResult {
    pub origin: String,
    pub destination: String,
    pub segment_id: Option<String>,
    pub distance: Option<u32>,
    pub economy: bool,
    pub business: bool,
    pub first: bool,
}

impl CalendarResponse {
    pub fn from_calendar(route: &Route, calendar: &AvailabilityCalendar) -> Self {
        let days = calendar
            .dates()
            .map(|date| CalendarDay {
                date: date.format("%Y-%m-%d").to_string(),
                has_availability: calendar.has_any_availability(date),
                hops: calendar
                    .day(date)
                    .unwrap_or_default()
                    .iter()
                    .map(HopResult::from_hop)
                    .collect(),
            })
            .collect();

        Self {
            route: route.to_string(),
            days,
        }
    }
}

impl HopResult {
    fn from_hop(hop: &HopAvailability) -> Self {
        Self {
            origin: hop.origin.to_string(),
            destination: hop.destination.to_string(),
            segment_id: hop.segment_id.clone(),
            distance: hop.distance,
            economy: hop.classes.economy,
            business: hop.classes.business,
            first: hop.classes.first,
        }
    }
}

/// A stopover at one intermediate airport.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StopoverRequest {
    pub airport: String,
    pub days: u32,
}

impl StopoverRequest {
    pub fn to_spec(&self) -> Result<StopoverSpec, InvalidInput> {
        Ok(StopoverSpec::new(
            parse_airport("stopover.airport", &self.airport)?,
            self.days,
        ))
    }
}

fn stopover_spec(stopover: Option<&StopoverRequest>) -> Result<Option<StopoverSpec>, InvalidInput> {
    stopover.map(StopoverRequest::to_spec).transpose()
}

/// A leg as sent to and received from clients.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LegResult {
    pub flight_id: String,
    pub origin: String,
    pub destination: String,
    pub departs_at: String,
    pub arrives_at: String,

    /// Departure clock time with day offset, e.g. "09:00" or "01:10 (+1)"
    #[serde(default, skip_deserializing)]
    pub departs: String,

    /// Arrival clock time with day offset
    #[serde(default, skip_deserializing)]
    pub arrives: String,

    pub duration_minutes: i64,
    pub distance_miles: u32,
    pub economy: bool,
    pub business: bool,
    pub first: bool,
    pub segment_index: usize,

    #[serde(default)]
    pub aircraft: Option<String>,
}

impl LegResult {
    /// Convert a leg, labelling times relative to `base`.
    pub fn from_leg(leg: &Leg, base: NaiveDate) -> Self {
        Self {
            flight_id: leg.flight_id.to_string(),
            origin: leg.origin.to_string(),
            destination: leg.destination.to_string(),
            departs_at: format_timestamp(leg.departs_at),
            arrives_at: format_timestamp(leg.arrives_at),
            departs: leg.departs_label(base),
            arrives: leg.arrives_label(base),
            duration_minutes: leg.duration_minutes,
            distance_miles: leg.distance_miles,
            economy: leg.cabins.economy,
            business: leg.cabins.business,
            first: leg.cabins.first,
            segment_index: leg.segment_index,
            aircraft: leg.aircraft.clone(),
        }
    }

    pub fn to_leg(&self) -> Result<Leg, InvalidInput> {
        Ok(Leg {
            flight_id: FlightId::parse(&self.flight_id)
                .map_err(|e| InvalidInput::new("flight_id", e))?,
            origin: parse_airport("origin", &self.origin)?,
            destination: parse_airport("destination", &self.destination)?,
            departs_at: parse_timestamp("departs_at", &self.departs_at)?,
            arrives_at: parse_timestamp("arrives_at", &self.arrives_at)?,
            duration_minutes: self.duration_minutes,
            distance_miles: self.distance_miles,
            cabins: CabinFlags {
                economy: self.economy,
                business: self.business,
                first: self.first,
            },
            segment_index: self.segment_index,
            aircraft: self.aircraft.clone(),
        })
    }
}

fn to_legs(legs: &[LegResult]) -> Result<Vec<Leg>, InvalidInput> {
    legs.iter().map(LegResult::to_leg).collect()
}

/// Earliest departure date among `legs`, used as the label base.
fn base_date<'a>(legs: impl IntoIterator<Item = &'a Leg>) -> Option<NaiveDate> {
    legs.into_iter().map(|l| l.departs_at.date()).min()
}

/// A route segment with its accepted legs.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SegmentResult {
    pub index: usize,
    pub origin: String,
    pub destination: String,
    pub window_start: String,
    pub window_end: String,

    #[serde(default, skip_deserializing)]
    pub earliest_arrival: Option<String>,

    #[serde(default, skip_deserializing)]
    pub latest_arrival: Option<String>,

    pub legs: Vec<LegResult>,
}

impl SegmentResult {
    pub fn from_segment(segment: &Segment, base: NaiveDate) -> Self {
        Self {
            index: segment.index,
            origin: segment.origin.to_string(),
            destination: segment.destination.to_string(),
            window_start: format_timestamp(segment.window.start),
            window_end: format_timestamp(segment.window.end),
            earliest_arrival: segment.earliest_arrival().map(format_timestamp),
            latest_arrival: segment.latest_arrival().map(format_timestamp),
            legs: segment
                .legs()
                .iter()
                .map(|l| LegResult::from_leg(l, base))
                .collect(),
        }
    }

    /// Rebuild the segment; legs are re-indexed to this segment.
    pub fn to_segment(&self) -> Result<Segment, InvalidInput> {
        let window = SearchWindow::new(
            parse_timestamp("window_start", &self.window_start)?,
            parse_timestamp("window_end", &self.window_end)?,
        );
        let mut legs = to_legs(&self.legs)?;
        for leg in &mut legs {
            leg.segment_index = self.index;
        }
        Ok(Segment::new(
            self.index,
            parse_airport("origin", &self.origin)?,
            parse_airport("destination", &self.destination)?,
            window,
            legs,
        ))
    }
}

/// Request to build a route's segments.
#[derive(Debug, Deserialize)]
pub struct SegmentsRequest {
    /// Route such as "YYZ-YVR-NRT"
    pub route: String,

    /// First travel date (YYYY-MM-DD)
    pub start_date: String,

    /// Last travel date, defaults to `start_date`
    pub end_date: Option<String>,

    pub stopover: Option<StopoverRequest>,
}

impl SegmentsRequest {
    pub fn route(&self) -> Result<Route, InvalidInput> {
        parse_route(&self.route)
    }

    pub fn range(&self) -> Result<DateRange, InvalidInput> {
        let start = parse_date("start_date", &self.start_date)?;
        let end = match &self.end_date {
            Some(end) => parse_date("end_date", end)?,
            None => start,
        };
        DateRange::new(start, end).map_err(|e| InvalidInput::new("end_date", e))
    }

    pub fn stopover(&self) -> Result<Option<StopoverSpec>, InvalidInput> {
        stopover_spec(self.stopover.as_ref())
    }
}

/// Built segments.
#[derive(Debug, Serialize)]
pub struct SegmentsResponse {
    pub segments: Vec<SegmentResult>,
}

impl SegmentsResponse {
    pub fn from_segments(segments: &[Segment], base: NaiveDate) -> Self {
        Self {
            segments: segments
                .iter()
                .map(|s| SegmentResult::from_segment(s, base))
                .collect(),
        }
    }
}

/// Request to enumerate combinations over segments.
#[derive(Debug, Deserialize)]
pub struct CombinationsRequest {
    pub segments: Vec<SegmentResult>,
    pub stopover: Option<StopoverRequest>,
}

impl CombinationsRequest {
    pub fn segments(&self) -> Result<Vec<Segment>, InvalidInput> {
        self.segments.iter().map(SegmentResult::to_segment).collect()
    }

    pub fn stopover(&self) -> Result<Option<StopoverSpec>, InvalidInput> {
        stopover_spec(self.stopover.as_ref())
    }
}

/// One feasible itinerary.
#[derive(Debug, Serialize)]
pub struct CombinationResult {
    pub legs: Vec<LegResult>,
    pub connection_minutes: Vec<i64>,
}

impl CombinationResult {
    pub fn from_combination(combination: &Combination, base: NaiveDate) -> Self {
        Self {
            legs: combination
                .legs()
                .iter()
                .map(|l| LegResult::from_leg(l, base))
                .collect(),
            connection_minutes: combination.connection_minutes(),
        }
    }
}

/// Combinations and the legs to display.
#[derive(Debug, Serialize)]
pub struct CombinationsResponse {
    pub combinations: Vec<CombinationResult>,

    /// Legs used by any combination, or every leg when there are none
    pub legs: Vec<LegResult>,

    /// True when no combination exists and `legs` is unfiltered
    pub unfiltered: bool,
}

impl CombinationsResponse {
    /// Build the response, labelling times relative to `base` or, failing
    /// that, the earliest departure shown.
    pub fn new(combinations: &[Combination], shown: &[Leg], base: Option<NaiveDate>) -> Self {
        let base = base.or_else(|| base_date(shown)).unwrap_or_default();
        Self {
            combinations: combinations
                .iter()
                .map(|c| CombinationResult::from_combination(c, base))
                .collect(),
            legs: shown.iter().map(|l| LegResult::from_leg(l, base)).collect(),
            unfiltered: combinations.is_empty(),
        }
    }
}

/// Request to pin or unpin one leg.
#[derive(Debug, Deserialize)]
pub struct ToggleRequest {
    /// Current combinations, each as its legs in segment order
    pub combinations: Vec<Vec<LegResult>>,

    /// Legs on display, as returned with the combinations
    pub legs: Vec<LegResult>,

    /// Currently pinned legs; each is pinned in its own `segment_index`
    #[serde(default)]
    pub selection: Vec<LegResult>,

    pub leg: LegResult,
    pub segment_index: usize,
}

impl ToggleRequest {
    pub fn combinations(&self) -> Result<Vec<Combination>, InvalidInput> {
        self.combinations
            .iter()
            .map(|legs| {
                Combination::new(to_legs(legs)?).map_err(|e| InvalidInput::new("combinations", e))
            })
            .collect()
    }

    pub fn shown(&self) -> Result<Vec<Leg>, InvalidInput> {
        to_legs(&self.legs)
    }

    pub fn selection(&self) -> Result<Selection, InvalidInput> {
        let mut selection = Selection::new();
        for leg in to_legs(&self.selection)? {
            if !selection.is_pinned(&leg) {
                selection.toggle(&leg, leg.segment_index);
            }
        }
        Ok(selection)
    }

    pub fn leg(&self) -> Result<Leg, InvalidInput> {
        self.leg.to_leg()
    }
}

/// A shown leg with its selection flags.
#[derive(Debug, Serialize)]
pub struct LegVisibilityResult {
    #[serde(flatten)]
    pub leg: LegResult,
    pub is_selected: bool,
    pub hidden: bool,
}

/// Selection after a toggle.
#[derive(Debug, Serialize)]
pub struct ToggleResponse {
    pub selection: Vec<LegResult>,
    pub legs: Vec<LegVisibilityResult>,
    pub consistent_combinations: usize,
}

impl ToggleResponse {
    pub fn from_update(update: &SelectionUpdate) -> Self {
        let base = base_date(update.legs.iter().map(|v| &v.leg))
            .or_else(|| base_date(update.selection.iter().flat_map(|(_, legs)| legs)))
            .unwrap_or_default();

        Self {
            selection: update
                .selection
                .iter()
                .flat_map(|(_, legs)| legs)
                .map(|l| LegResult::from_leg(l, base))
                .collect(),
            legs: update
                .legs
                .iter()
                .map(|v| LegVisibilityResult {
                    leg: LegResult::from_leg(&v.leg, base),
                    is_selected: v.is_selected,
                    hidden: v.hidden,
                })
                .collect(),
            consistent_combinations: update.consistent_combinations,
        }
    }
}

/// Error body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::leg::test_support::leg;

    #[test]
    fn leg_labels_and_timestamps() {
        let l = leg(1, "AC7", "YVR", "NRT", "2025-03-15 13:00", "2025-03-16 15:20");
        let base = NaiveDate::from_ymd_opt(2025, 3, 15).unwrap();
        let dto = LegResult::from_leg(&l, base);

        assert_eq!(dto.departs_at, "2025-03-15T13:00:00");
        assert_eq!(dto.departs, "13:00");
        assert_eq!(dto.arrives, "15:20 (+1)");
        assert_eq!(dto.to_leg().unwrap(), l);
    }

    #[test]
    fn labels_are_not_read_back() {
        let json = r#"{
            "flight_id": "AC7", "origin": "YVR", "destination": "NRT",
            "departs_at": "2025-03-15T13:00:00", "arrives_at": "2025-03-16T15:20:00",
            "departs": "bogus", "duration_minutes": 620, "distance_miles": 4700,
            "economy": true, "business": false, "first": false, "segment_index": 1
        }"#;
        let dto: LegResult = serde_json::from_str(json).unwrap();
        assert_eq!(dto.departs, "");
        assert!(dto.to_leg().is_ok());
    }

    #[test]
    fn invalid_leg_names_the_field() {
        let l = leg(0, "AC7", "YVR", "NRT", "2025-03-15 13:00", "2025-03-16 15:20");
        let mut dto = LegResult::from_leg(&l, l.departs_at.date());
        dto.departs_at = "soon".to_string();
        assert_eq!(dto.to_leg().unwrap_err().field, "departs_at");
    }

    #[test]
    fn segments_request_defaults_end_date() {
        let req: SegmentsRequest =
            serde_json::from_str(r#"{"route": "yyz-yvr", "start_date": "2025-03-15"}"#).unwrap();
        let range = req.range().unwrap();
        assert_eq!(range.start(), range.end());
        assert_eq!(req.route().unwrap().to_string(), "YYZ-YVR");
        assert_eq!(req.stopover().unwrap(), None);

        let backwards: SegmentsRequest = serde_json::from_str(
            r#"{"route": "YYZ-YVR", "start_date": "2025-03-15", "end_date": "2025-03-14"}"#,
        )
        .unwrap();
        assert_eq!(backwards.range().unwrap_err().field, "end_date");
    }

    #[test]
    fn segment_round_trip_reindexes_legs() {
        let window = SearchWindow::new(
            parse_local_timestamp("2025-03-15T00:00").unwrap(),
            parse_local_timestamp("2025-03-15T23:59:59").unwrap(),
        );
        let l = leg(0, "AC1", "YYZ", "YVR", "2025-03-15 09:00", "2025-03-15 11:00");
        let segment = Segment::new(0, l.origin, l.destination, window, vec![l.clone()]);
        let mut dto = SegmentResult::from_segment(&segment, l.departs_at.date());
        assert_eq!(dto.earliest_arrival.as_deref(), Some("2025-03-15T11:00:00"));

        dto.legs[0].segment_index = 7;
        assert_eq!(dto.to_segment().unwrap(), segment);
    }

    #[test]
    fn toggle_request_builds_selection() {
        let a = leg(0, "AC1", "AAA", "BBB", "2025-03-15 09:00", "2025-03-15 12:00");
        let b = leg(1, "AC10", "BBB", "CCC", "2025-03-15 13:00", "2025-03-15 15:00");
        let base = a.departs_at.date();
        let req = ToggleRequest {
            combinations: vec![vec![LegResult::from_leg(&a, base), LegResult::from_leg(&b, base)]],
            legs: vec![LegResult::from_leg(&a, base), LegResult::from_leg(&b, base)],
            selection: vec![LegResult::from_leg(&a, base), LegResult::from_leg(&a, base)],
            leg: LegResult::from_leg(&b, base),
            segment_index: 1,
        };

        assert_eq!(req.combinations().unwrap().len(), 1);
        assert_eq!(req.shown().unwrap(), vec![a.clone(), b.clone()]);
        let selection = req.selection().unwrap();
        assert_eq!(selection.pinned(0).len(), 1);
        assert_eq!(req.leg().unwrap(), b);
    }
}
