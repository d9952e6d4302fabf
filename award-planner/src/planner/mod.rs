//! Itinerary composition.
//!
//! This module turns raw seat availability into bookable itineraries:
//!
//! 1. `normalize` converts each fetched batch of flight records into legs
//! 2. `window` derives each segment's departure window from the previous
//!    segment's arrivals
//! 3. `fetch` drives 1 and 2 segment by segment against a `FlightSource`
//! 4. `combine` enumerates every feasible end-to-end combination of legs
//! 5. `select` propagates the user's pinned legs to the other segments
//!
//! `Engine` wraps all of this in a stateful search context with explicit
//! host callbacks and generation-based cancellation.

mod combine;
mod config;
mod engine;
mod epoch;
mod fetch;
mod normalize;
mod select;
mod window;

pub use combine::{compute_combinations, displayed_legs, is_feasible_connection};
pub use config::PlannerConfig;
pub use engine::{CancelHandle, Engine};
pub use epoch::{EngineListener, Generation, GenerationCounter, NoopListener};
pub use fetch::{FlightSource, PlanError, SegmentRequest, compute_segments, fetch_segment};
pub use normalize::{
    DEFAULT_DISTANCE_MILES, HopContext, NormalizedBatch, RecordRejected, merge_into,
    normalize_batch,
};
pub use select::{
    LegVisibility, SelectionUpdate, apply_selection, is_consistent, toggle_selection,
};
pub use window::compute_window;
