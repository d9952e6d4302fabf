//! Stateful itinerary engine.
//!
//! Holds one search context: the segments of the last completed search, the
//! combinations over them, the legs on display and the user's pins. The host
//! drives it through `search`, `toggle` and `reset`, and observes it through
//! an `EngineListener`. A `CancelHandle` lets another task invalidate an
//! in-flight search.

use tracing::{debug, info};

use crate::domain::{Combination, Leg, Segment, Selection, StopoverSpec};

use super::combine::{compute_combinations, displayed_legs};
use super::config::PlannerConfig;
use super::epoch::{EngineListener, GenerationCounter, NoopListener};
use super::fetch::{FlightSource, PlanError, SegmentRequest, compute_segments};
use super::select::{LegVisibility, SelectionUpdate, apply_selection, toggle_selection};

/// Invalidates the engine's current search from elsewhere.
#[derive(Debug, Clone)]
pub struct CancelHandle {
    generations: GenerationCounter,
}

impl CancelHandle {
    /// Results of any search in flight will be discarded.
    pub fn cancel(&self) {
        self.generations.cancel();
    }
}

/// Itinerary engine over a flight source.
pub struct Engine<S, L = NoopListener> {
    source: S,
    config: PlannerConfig,
    listener: L,
    generations: GenerationCounter,
    stopover: Option<StopoverSpec>,
    segments: Vec<Segment>,
    combinations: Vec<Combination>,
    shown: Vec<Leg>,
    selection: Selection,
    visibility: Vec<LegVisibility>,
}

impl<S: FlightSource> Engine<S> {
    /// Create an engine with no listener.
    pub fn new(source: S, config: PlannerConfig) -> Self {
        Self::with_listener(source, config, NoopListener)
    }
}

impl<S: FlightSource, L: EngineListener> Engine<S, L> {
    /// Create an engine reporting to `listener`.
    pub fn with_listener(source: S, config: PlannerConfig, listener: L) -> Self {
        Self {
            source,
            config,
            listener,
            generations: GenerationCounter::new(),
            stopover: None,
            segments: Vec::new(),
            combinations: Vec::new(),
            shown: Vec::new(),
            selection: Selection::new(),
            visibility: Vec::new(),
        }
    }

    /// Run a new search, replacing the current context.
    ///
    /// Any earlier search still in flight is invalidated. On success the
    /// selection is cleared, since its legs belong to the old context. If
    /// this search is itself cancelled, the engine keeps its previous state
    /// and `PlanError::Superseded` is returned.
    pub async fn search(&mut self, request: SegmentRequest) -> Result<&[Segment], PlanError> {
        let generation = self.generations.begin();
        debug!(generation = generation.value(), route = %request.route, "starting search");

        let result = compute_segments(&self.source, &request, &self.config, &generation).await;

        let segments = match result {
            Ok(segments) => segments,
            Err(PlanError::Superseded) => return Err(PlanError::Superseded),
            Err(e) if !generation.is_current() => {
                debug!(
                    generation = generation.value(),
                    error = %e,
                    "dropping error from stale search"
                );
                return Err(PlanError::Superseded);
            }
            Err(e) => {
                self.clear();
                return Err(e);
            }
        };

        self.stopover = request.stopover;
        self.segments = segments;
        self.selection.clear();
        self.refresh();

        info!(
            route = %request.route,
            segments = self.segments.len(),
            combinations = self.combinations.len(),
            "search complete"
        );
        self.listener.on_segments(&self.segments);

        Ok(&self.segments)
    }

    /// Recompute combinations and visibility from the current segments.
    ///
    /// The selection is kept.
    pub fn refresh(&mut self) {
        self.combinations =
            compute_combinations(&self.segments, self.stopover.as_ref(), &self.config);
        self.shown = displayed_legs(&self.segments, &self.combinations);
        self.visibility = apply_selection(&self.shown, &self.combinations, &self.selection);
    }

    /// Pin or unpin `leg` in `segment_index`.
    pub fn toggle(&mut self, leg: &Leg, segment_index: usize) -> SelectionUpdate {
        let update = toggle_selection(
            &self.shown,
            &self.combinations,
            &self.selection,
            leg,
            segment_index,
        );
        let pinned = update
            .selection
            .pinned(segment_index)
            .iter()
            .any(|p| p.same_flight(leg));
        self.selection = update.selection.clone();
        self.visibility = update.legs.clone();

        debug!(
            flight = %leg.flight_id,
            segment_index,
            pinned,
            consistent = update.consistent_combinations,
            "selection toggled"
        );
        self.listener.on_selection(&update);
        update
    }

    /// Drop the search context and invalidate any search in flight.
    pub fn reset(&mut self) {
        self.generations.cancel();
        self.clear();
        self.listener.on_reset();
    }

    /// Handle for cancelling searches from another task.
    pub fn cancel_handle(&self) -> CancelHandle {
        CancelHandle {
            generations: self.generations.clone(),
        }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn combinations(&self) -> &[Combination] {
        &self.combinations
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Shown legs with their selection flags.
    pub fn legs(&self) -> &[LegVisibility] {
        &self.visibility
    }

    fn clear(&mut self) {
        self.stopover = None;
        self.segments.clear();
        self.combinations.clear();
        self.shown.clear();
        self.selection.clear();
        self.visibility.clear();
    }
}
