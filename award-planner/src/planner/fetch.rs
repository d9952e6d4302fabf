//! Segment fetch driver.
//!
//! Builds the route's segments in order. Each segment's window comes from the
//! previous segment's accepted legs, so segments are strictly sequential; the
//! dates inside one window are fetched concurrently.

use std::future::Future;

use chrono::NaiveDate;
use futures::future::join_all;
use tracing::{debug, info, warn};

use crate::availability::{
    AvailabilityCalendar, AvailabilityClient, AvailabilityEntry, AvailabilityError,
    MockAvailabilityClient, RawFlightRecord,
};
use crate::domain::{DateRange, Leg, Route, SearchWindow, Segment, StopoverSpec};

use super::config::PlannerConfig;
use super::epoch::Generation;
use super::normalize::{HopContext, merge_into, normalize_batch};
use super::window::compute_window;

/// Error from building segments.
#[derive(Debug, thiserror::Error)]
pub enum PlanError {
    /// The first segment has no flights at all
    #[error("no flights found for {0}")]
    NoFlights(String),

    /// A newer search started before this one finished
    #[error("search superseded by a newer one")]
    Superseded,

    /// Invalid search request
    #[error("invalid search request: {0}")]
    InvalidRequest(String),

    /// The availability calendar could not be fetched
    #[error("failed to fetch availability: {0}")]
    Availability(#[from] AvailabilityError),
}

/// Source of availability calendars and seat detail.
///
/// This abstraction allows the planner to be tested without the network.
pub trait FlightSource: Send + Sync {
    /// Calendar rows for every hop of `route`, on or after `from_date`.
    fn fetch_availability(
        &self,
        route: &Route,
        from_date: Option<NaiveDate>,
    ) -> impl Future<Output = Result<Vec<AvailabilityEntry>, AvailabilityError>> + Send;

    /// Raw flight records behind one calendar row.
    fn fetch_legs(
        &self,
        segment_id: &str,
    ) -> impl Future<Output = Result<Vec<RawFlightRecord>, AvailabilityError>> + Send;
}

impl FlightSource for AvailabilityClient {
    async fn fetch_availability(
        &self,
        route: &Route,
        from_date: Option<NaiveDate>,
    ) -> Result<Vec<AvailabilityEntry>, AvailabilityError> {
        AvailabilityClient::fetch_availability(self, route, from_date).await
    }

    async fn fetch_legs(&self, segment_id: &str) -> Result<Vec<RawFlightRecord>, AvailabilityError> {
        AvailabilityClient::fetch_legs(self, segment_id).await
    }
}

impl FlightSource for MockAvailabilityClient {
    async fn fetch_availability(
        &self,
        route: &Route,
        from_date: Option<NaiveDate>,
    ) -> Result<Vec<AvailabilityEntry>, AvailabilityError> {
        MockAvailabilityClient::fetch_availability(self, route, from_date).await
    }

    async fn fetch_legs(&self, segment_id: &str) -> Result<Vec<RawFlightRecord>, AvailabilityError> {
        MockAvailabilityClient::fetch_legs(self, segment_id).await
    }
}

/// Request to build a route's segments.
#[derive(Debug, Clone)]
pub struct SegmentRequest {
    pub route: Route,
    pub range: DateRange,
    pub stopover: Option<StopoverSpec>,
}

impl SegmentRequest {
    pub fn new(route: Route, range: DateRange) -> Self {
        Self {
            route,
            range,
            stopover: None,
        }
    }

    pub fn with_stopover(mut self, stopover: StopoverSpec) -> Self {
        self.stopover = Some(stopover);
        self
    }

    /// Validate the request.
    pub fn validate(&self) -> Result<(), PlanError> {
        if let Some(stopover) = &self.stopover {
            let airports = self.route.airports();
            let interior = &airports[1..airports.len() - 1];
            if !interior.contains(&stopover.airport) {
                return Err(PlanError::InvalidRequest(format!(
                    "stopover airport {} is not an intermediate stop of {}",
                    stopover.airport, self.route
                )));
            }
        }
        Ok(())
    }
}

/// Fetch and normalize every date of one segment's window.
///
/// Dates without a calendar row are skipped. A failed fetch is logged and
/// contributes no legs. Per-date batches are merged in date order.
pub async fn fetch_segment<S: FlightSource>(
    source: &S,
    calendar: &AvailabilityCalendar,
    hop: &HopContext,
    dates: &[NaiveDate],
    window: Option<&SearchWindow>,
    config: &PlannerConfig,
) -> Vec<Leg> {
    let lookups: Vec<(NaiveDate, &str)> = dates
        .iter()
        .filter_map(|&date| match calendar.segment_id(hop.segment_index, date) {
            Some(id) => Some((date, id)),
            None => {
                debug!(
                    origin = %hop.origin,
                    destination = %hop.destination,
                    %date,
                    "no availability row for date"
                );
                None
            }
        })
        .collect();

    let mut legs = Vec::new();

    for batch in lookups.chunks(config.max_concurrent_fetches.max(1)) {
        let futures: Vec<_> = batch
            .iter()
            .map(|&(date, id)| async move { (date, id, source.fetch_legs(id).await) })
            .collect();

        for (date, id, result) in join_all(futures).await {
            match result {
                Ok(records) => {
                    let normalized = normalize_batch(&records, hop, window, config);
                    debug!(
                        %date,
                        segment_id = id,
                        records = records.len(),
                        legs = normalized.legs.len(),
                        "normalized seat records"
                    );
                    merge_into(&mut legs, normalized.legs);
                }
                Err(e) => {
                    warn!(
                        origin = %hop.origin,
                        destination = %hop.destination,
                        %date,
                        segment_id = id,
                        error = %e,
                        transient = e.is_transient(),
                        "failed to fetch seat records, skipping date"
                    );
                }
            }
        }
    }

    legs
}

/// Build every segment of the route in order.
///
/// `generation` is checked after each suspension point; once a newer search
/// has started, partial results are discarded and `Superseded` is returned.
/// An empty first segment fails the search with `NoFlights`; later empty
/// segments are kept so that the combination search can narrow around them.
pub async fn compute_segments<S: FlightSource>(
    source: &S,
    request: &SegmentRequest,
    config: &PlannerConfig,
    generation: &Generation,
) -> Result<Vec<Segment>, PlanError> {
    request.validate()?;

    // A failure that arrives after cancellation belongs to the stale search.
    let entries = source
        .fetch_availability(&request.route, Some(request.range.start()))
        .await;
    ensure_current(generation)?;
    let entries = entries?;

    let calendar = AvailabilityCalendar::from_entries(&request.route, &entries);
    let stopover = request.stopover.as_ref();
    let mut segments: Vec<Segment> = Vec::with_capacity(request.route.hop_count());

    for (index, origin, destination) in request.route.hops() {
        let window = compute_window(segments.last(), &request.range, stopover);
        let dates = window.dates();
        let hop = HopContext {
            segment_index: index,
            origin,
            destination,
            distance_miles: calendar.distance(index),
        };

        // The first segment takes everything on its dates.
        let filter = (index > 0).then_some(&window);

        debug!(
            segment = index,
            %origin,
            %destination,
            start = %window.start,
            end = %window.end,
            dates = dates.len(),
            "fetching segment"
        );

        let legs = fetch_segment(source, &calendar, &hop, &dates, filter, config).await;
        ensure_current(generation)?;

        let segment = Segment::new(index, origin, destination, window, legs);

        if index == 0 && segment.is_empty() {
            return Err(PlanError::NoFlights(segment.label()));
        }

        info!(
            segment = %segment.label(),
            legs = segment.legs().len(),
            earliest_arrival = ?segment.earliest_arrival(),
            latest_arrival = ?segment.latest_arrival(),
            "segment ready"
        );
        segments.push(segment);
    }

    Ok(segments)
}

fn ensure_current(generation: &Generation) -> Result<(), PlanError> {
    if generation.is_current() {
        Ok(())
    } else {
        warn!(generation = generation.value(), "discarding results of stale search");
        Err(PlanError::Superseded)
    }
}

#[cfg(test)]
#[path = "fetch_tests.rs"]
mod tests;
