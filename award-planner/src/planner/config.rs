//! Planner configuration.

use crate::domain::CarrierCode;

/// Configuration parameters for segment fetching and combination search.
#[derive(Debug, Clone)]
pub struct PlannerConfig {
    /// Minimum time required for an ordinary connection (minutes).
    /// Connections tighter than this are rejected.
    pub min_connection_mins: i64,

    /// Maximum time allowed for an ordinary connection (minutes).
    pub max_connection_mins: i64,

    /// Carriers whose records are dropped outright.
    pub excluded_carriers: Vec<CarrierCode>,

    /// `(alias, operating)` pairs: records filed under `alias` are rewritten
    /// to `operating`, flight-number prefix included.
    pub carrier_aliases: Vec<(CarrierCode, CarrierCode)>,

    /// Maximum number of per-date seat fetches in flight for one segment.
    pub max_concurrent_fetches: usize,
}

/// Static carrier codes are always valid; this keeps the defaults infallible.
fn code(s: &'static str) -> Option<CarrierCode> {
    CarrierCode::parse(s).ok()
}

impl PlannerConfig {
    /// Returns true if records for `carrier` must be dropped.
    pub fn is_excluded(&self, carrier: CarrierCode) -> bool {
        self.excluded_carriers.contains(&carrier)
    }

    /// The operating carrier for `carrier` (itself if not an alias).
    pub fn canonical_carrier(&self, carrier: CarrierCode) -> CarrierCode {
        self.carrier_aliases
            .iter()
            .find(|(alias, _)| *alias == carrier)
            .map(|(_, operating)| *operating)
            .unwrap_or(carrier)
    }

    /// Set the ordinary connection bounds (minutes).
    pub fn with_connection_bounds(mut self, min_mins: i64, max_mins: i64) -> Self {
        self.min_connection_mins = min_mins;
        self.max_connection_mins = max_mins;
        self
    }

    /// Replace the excluded carrier set.
    pub fn with_excluded_carriers(mut self, carriers: Vec<CarrierCode>) -> Self {
        self.excluded_carriers = carriers;
        self
    }

    /// Add an alias rewrite.
    pub fn with_alias(mut self, alias: CarrierCode, operating: CarrierCode) -> Self {
        self.carrier_aliases.push((alias, operating));
        self
    }

    /// Set the per-segment fetch fan-out.
    pub fn with_max_concurrent_fetches(mut self, n: usize) -> Self {
        self.max_concurrent_fetches = n.max(1);
        self
    }
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            min_connection_mins: 30,
            max_connection_mins: 1440, // 24 hours
            excluded_carriers: ["EK", "FZ"].into_iter().filter_map(code).collect(),
            carrier_aliases: code("RV").zip(code("AC")).into_iter().collect(),
            max_concurrent_fetches: 8,
        }
    }
}
