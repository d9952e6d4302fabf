//! Seat-availability API client.
//!
//! This module provides an HTTP client for the award availability backend,
//! which the planner queries in two steps:
//! - a per-date calendar for the route's hops, whose rows carry an opaque
//!   segment ID and Y/J/F open flags
//! - the seat detail behind one row: raw per-cabin flight records
//!
//! Times in flight records are local to each airport and must not be
//! shifted to UTC.

mod calendar;
mod client;
mod error;
mod mock;
mod types;

pub use calendar::{AvailabilityCalendar, HopAvailability};
pub use client::{AvailabilityClient, AvailabilityConfig};
pub use error::AvailabilityError;
pub use mock::MockAvailabilityClient;
pub use types::{AvailabilityEntry, ClassOpen, RawFlightRecord, SeatsResponse};
