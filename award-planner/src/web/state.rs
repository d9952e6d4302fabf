//! Application state for the web layer.

use std::sync::Arc;

use chrono::NaiveDate;

use crate::availability::{
    AvailabilityEntry, AvailabilityError, MockAvailabilityClient, RawFlightRecord,
};
use crate::cache::CachedAvailabilityClient;
use crate::domain::Route;
use crate::planner::{FlightSource, PlannerConfig};

/// Where availability comes from.
pub enum Backend {
    /// The live API, behind the response cache
    Live(CachedAvailabilityClient),
    /// JSON fixtures on disk
    Mock(MockAvailabilityClient),
}

impl FlightSource for Backend {
    async fn fetch_availability(
        &self,
        route: &Route,
        from_date: Option<NaiveDate>,
    ) -> Result<Vec<AvailabilityEntry>, AvailabilityError> {
        match self {
            Backend::Live(client) => FlightSource::fetch_availability(client, route, from_date).await,
            Backend::Mock(client) => client.fetch_availability(route, from_date).await,
        }
    }

    async fn fetch_legs(&self, segment_id: &str) -> Result<Vec<RawFlightRecord>, AvailabilityError> {
        match self {
            Backend::Live(client) => FlightSource::fetch_legs(client, segment_id).await,
            Backend::Mock(client) => client.fetch_legs(segment_id).await,
        }
    }
}

/// Shared application state.
///
/// Contains all the services needed to handle requests.
#[derive(Clone)]
pub struct AppState {
    /// Availability source
    pub source: Arc<Backend>,

    /// Planner configuration
    pub config: Arc<PlannerConfig>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(source: Backend, config: PlannerConfig) -> Self {
        Self {
            source: Arc::new(source),
            config: Arc::new(config),
        }
    }
}
