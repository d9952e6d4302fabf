//! Availability API response DTOs.
//!
//! These types map directly to the seat-availability JSON API. Field names
//! follow the API's PascalCase; `Option` and `#[serde(default)]` are used
//! wherever the API has been seen to omit a field.

use serde::{Deserialize, Serialize};

/// Per-class award availability flags on a calendar entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ClassOpen {
    #[serde(rename = "Y", default)]
    pub economy: bool,
    #[serde(rename = "J", default)]
    pub business: bool,
    #[serde(rename = "F", default)]
    pub first: bool,
}

impl ClassOpen {
    /// Returns true if any class is open.
    pub fn any(&self) -> bool {
        self.economy || self.business || self.first
    }
}

/// One (origin, destination, date) row from the availability calendar.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct AvailabilityEntry {
    /// Travel date, "YYYY-MM-DD".
    pub date: String,

    pub origin_airport: String,

    pub destination_airport: String,

    /// Opaque identifier used to fetch the seat detail for this row.
    #[serde(rename = "ID")]
    pub segment_id: String,

    /// Great-circle distance in miles.
    #[serde(default)]
    pub distance: Option<u32>,

    #[serde(default)]
    pub class_open: ClassOpen,
}

/// Envelope returned by the seats endpoint: `results[0].data.data[]`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SeatsResponse {
    #[serde(default)]
    pub results: Vec<SeatsResult>,
}

impl SeatsResponse {
    /// Flight records from the first result, or none.
    pub fn into_records(self) -> Vec<RawFlightRecord> {
        self.results
            .into_iter()
            .next()
            .and_then(|r| r.data)
            .map(|d| d.data)
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SeatsResult {
    #[serde(default)]
    pub data: Option<SeatsData>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SeatsData {
    #[serde(default)]
    pub data: Vec<RawFlightRecord>,
}

/// One raw trip record from the seats endpoint, before normalization.
///
/// A record describes one cabin of one itinerary; the same flight appears
/// once per cabin with space.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawFlightRecord {
    /// Marketing carrier code(s), e.g. "AC".
    pub carriers: String,

    /// Flight number(s), e.g. "AC1850".
    pub flight_numbers: String,

    /// Number of intermediate stops.
    pub stops: u32,

    #[serde(default)]
    pub aircraft: Vec<String>,

    /// Local departure, ISO 8601, sometimes with a spurious `Z`.
    pub departs_at: String,

    /// Local arrival, same format as `departs_at`.
    pub arrives_at: String,

    /// Cabin name ("economy", "business", "first"; case varies).
    pub cabin: String,

    #[serde(default)]
    pub distance: Option<u32>,

    /// Block time in minutes.
    #[serde(default)]
    pub total_duration: Option<i64>,

    #[serde(default)]
    pub origin_airport: Option<String>,

    #[serde(default)]
    pub destination_airport: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_availability_entry() {
        let json = r#"{
            "Date": "2025-03-15",
            "OriginAirport": "YYZ",
            "DestinationAirport": "YVR",
            "ID": "2pLk9",
            "Distance": 2086,
            "ClassOpen": {"Y": true, "J": false, "F": false}
        }"#;
        let entry: AvailabilityEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.segment_id, "2pLk9");
        assert_eq!(entry.distance, Some(2086));
        assert!(entry.class_open.economy);
        assert!(!entry.class_open.business);
        assert!(entry.class_open.any());
    }

    #[test]
    fn availability_entry_defaults_missing_classes() {
        let json = r#"{
            "Date": "2025-03-15",
            "OriginAirport": "YYZ",
            "DestinationAirport": "YVR",
            "ID": "x"
        }"#;
        let entry: AvailabilityEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.class_open, ClassOpen::default());
        assert!(!entry.class_open.any());
    }

    #[test]
    fn deserialize_seats_envelope() {
        let json = r#"{
            "results": [{
                "data": {
                    "data": [{
                        "Carriers": "AC",
                        "FlightNumbers": "AC1850",
                        "Stops": 0,
                        "Aircraft": ["787  All"],
                        "DepartsAt": "2025-03-15T09:00:00Z",
                        "ArrivesAt": "2025-03-15T11:10:00Z",
                        "Cabin": "Business",
                        "Distance": 2086,
                        "TotalDuration": 310,
                        "OriginAirport": "YYZ",
                        "DestinationAirport": "YVR"
                    }]
                }
            }]
        }"#;
        let response: SeatsResponse = serde_json::from_str(json).unwrap();
        let records = response.into_records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].flight_numbers, "AC1850");
        assert_eq!(records[0].total_duration, Some(310));
        assert_eq!(records[0].aircraft, vec!["787  All".to_string()]);
    }

    #[test]
    fn empty_envelope_yields_no_records() {
        let response: SeatsResponse = serde_json::from_str("{}").unwrap();
        assert!(response.into_records().is_empty());

        let response: SeatsResponse = serde_json::from_str(r#"{"results": [{}]}"#).unwrap();
        assert!(response.into_records().is_empty());
    }
}
