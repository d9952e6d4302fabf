//! Search generations and host callbacks.
//!
//! Every search takes a fresh `Generation` from a shared counter. Starting a
//! new search, or cancelling, advances the counter, so results computed for
//! an older generation can be recognized and dropped at the point they would
//! otherwise be applied. In-flight requests are not aborted.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::domain::Segment;

use super::select::SelectionUpdate;

/// Shared monotonic search counter.
#[derive(Debug, Clone, Default)]
pub struct GenerationCounter {
    current: Arc<AtomicU64>,
}

impl GenerationCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new generation, invalidating all earlier ones.
    pub fn begin(&self) -> Generation {
        let value = self.current.fetch_add(1, Ordering::SeqCst) + 1;
        Generation {
            value,
            counter: Arc::clone(&self.current),
        }
    }

    /// Invalidate the current generation without starting a search.
    pub fn cancel(&self) {
        self.current.fetch_add(1, Ordering::SeqCst);
    }
}

/// Token identifying one search.
#[derive(Debug, Clone)]
pub struct Generation {
    value: u64,
    counter: Arc<AtomicU64>,
}

impl Generation {
    /// A token that never goes stale, for one-shot searches with no host.
    pub fn detached() -> Self {
        GenerationCounter::new().begin()
    }

    pub fn value(&self) -> u64 {
        self.value
    }

    /// Returns true if no newer search has started since this one.
    pub fn is_current(&self) -> bool {
        self.counter.load(Ordering::SeqCst) == self.value
    }
}

/// Host-side hooks for engine state changes.
///
/// All methods default to doing nothing.
pub trait EngineListener: Send + Sync {
    /// Segments, combinations and selection were cleared.
    fn on_reset(&self) {}

    /// A search finished and its segments were applied.
    fn on_segments(&self, _segments: &[Segment]) {}

    /// The selection changed and visibility was recomputed.
    fn on_selection(&self, _update: &SelectionUpdate) {}
}

/// Listener that ignores every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopListener;

impl EngineListener for NoopListener {}

impl<L: EngineListener + ?Sized> EngineListener for Arc<L> {
    fn on_reset(&self) {
        (**self).on_reset()
    }

    fn on_segments(&self, segments: &[Segment]) {
        (**self).on_segments(segments)
    }

    fn on_selection(&self, update: &SelectionUpdate) {
        (**self).on_selection(update)
    }
}
