//! Mock availability client for development without API access.
//!
//! Loads a calendar and seat payloads from JSON files and serves them as if
//! they were live API responses.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use chrono::NaiveDate;

use crate::domain::Route;

use super::error::AvailabilityError;
use super::types::{AvailabilityEntry, RawFlightRecord, SeatsResponse};

/// Mock availability client that serves data from JSON files.
///
/// Expects `availability.json` (an array of calendar rows) and a `seats/`
/// directory holding one `{ID}.json` seats envelope per calendar row.
#[derive(Debug, Clone)]
pub struct MockAvailabilityClient {
    entries: Arc<Vec<AvailabilityEntry>>,
    seats: Arc<HashMap<String, Vec<RawFlightRecord>>>,
}

fn fixture_error(path: &Path, e: impl ToString) -> AvailabilityError {
    AvailabilityError::Fixture {
        path: path.to_path_buf(),
        message: e.to_string(),
    }
}

impl MockAvailabilityClient {
    /// Create a mock client by loading JSON files from `data_dir`.
    pub fn new(data_dir: impl AsRef<Path>) -> Result<Self, AvailabilityError> {
        let data_dir = data_dir.as_ref();

        let calendar_path = data_dir.join("availability.json");
        let json = std::fs::read_to_string(&calendar_path)
            .map_err(|e| fixture_error(&calendar_path, e))?;
        let entries: Vec<AvailabilityEntry> = serde_json::from_str(&json)
            .map_err(|e| fixture_error(&calendar_path, e))?;

        let mut seats = HashMap::new();
        let seats_dir = data_dir.join("seats");

        if seats_dir.is_dir() {
            let dir = std::fs::read_dir(&seats_dir).map_err(|e| fixture_error(&seats_dir, e))?;

            for entry in dir {
                let entry = entry
                    .map_err(|e| fixture_error(&seats_dir, e))?;

                let path = entry.path();
                if !path.is_file() || path.extension().and_then(|s| s.to_str()) != Some("json") {
                    continue;
                }

                let id = path
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .ok_or_else(|| fixture_error(&path, "file name is not valid UTF-8"))?
                    .to_string();

                let json = std::fs::read_to_string(&path)
                    .map_err(|e| fixture_error(&path, e))?;
                let response: SeatsResponse = serde_json::from_str(&json)
                    .map_err(|e| fixture_error(&path, e))?;

                seats.insert(id, response.into_records());
            }
        }

        Ok(Self::from_parts(entries, seats))
    }

    /// Create a mock client from in-memory data.
    pub fn from_parts(
        entries: Vec<AvailabilityEntry>,
        seats: HashMap<String, Vec<RawFlightRecord>>,
    ) -> Self {
        Self {
            entries: Arc::new(entries),
            seats: Arc::new(seats),
        }
    }

    /// Calendar rows for the hops of `route`, on or after `from_date`.
    ///
    /// Mimics the real `AvailabilityClient::fetch_availability` interface.
    pub async fn fetch_availability(
        &self,
        route: &Route,
        from_date: Option<NaiveDate>,
    ) -> Result<Vec<AvailabilityEntry>, AvailabilityError> {
        let hops: Vec<(String, String)> = route
            .hops()
            .map(|(_, from, to)| (from.to_string(), to.to_string()))
            .collect();

        Ok(self
            .entries
            .iter()
            .filter(|e| {
                hops.iter()
                    .any(|(from, to)| &e.origin_airport == from && &e.destination_airport == to)
            })
            .filter(|e| match from_date {
                Some(from) => NaiveDate::parse_from_str(&e.date, "%Y-%m-%d")
                    .map(|d| d >= from)
                    .unwrap_or(false),
                None => true,
            })
            .cloned()
            .collect())
    }

    /// Seat records for `segment_id`.
    pub async fn fetch_legs(
        &self,
        segment_id: &str,
    ) -> Result<Vec<RawFlightRecord>, AvailabilityError> {
        self.seats
            .get(segment_id)
            .cloned()
            .ok_or_else(|| AvailabilityError::SegmentNotFound(segment_id.to_string()))
    }
}
