//! Domain error types.
//!
//! These errors represent malformed input handed to the domain layer by a
//! caller. Missing or partial flight data is never an error here.

use chrono::NaiveDate;

/// Domain-level errors for validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    /// A route needs an origin and a destination
    #[error("route must have at least two airports, got {0}")]
    RouteTooShort(usize),

    /// Route contained an unparseable airport code
    #[error("invalid airport code in route: {0:?}")]
    InvalidAirport(String),

    /// Date range ends before it starts
    #[error("date range ends ({end}) before it starts ({start})")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },

    /// Combination has no legs
    #[error("combination must have at least one leg")]
    EmptyCombination,

    /// Combination legs skip or repeat a segment
    #[error("combination legs must cover consecutive segments: expected {expected}, found {found}")]
    NonContiguousCombination { expected: usize, found: usize },
}
