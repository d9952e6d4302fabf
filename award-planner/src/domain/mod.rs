//! Domain types for the award itinerary planner.
//!
//! This module contains the core domain model types that represent
//! validated flight data. All types enforce their invariants at construction
//! time, so code that receives these types can trust their validity.

mod airport;
mod cabin;
mod carrier;
mod combination;
mod error;
pub(crate) mod leg;
mod route;
mod segment;
mod time;

pub use airport::{Airport, InvalidAirport};
pub use cabin::{Cabin, CabinFlags, InvalidCabin};
pub use carrier::{CarrierCode, FlightId, InvalidCarrierCode, InvalidFlightId};
pub use combination::{Combination, Selection};
pub use error::DomainError;
pub use leg::{Leg, LegKey};
pub use route::{DateRange, Route, StopoverSpec};
pub use segment::{ArrivalBounds, SearchWindow, Segment};
pub use time::{
    TimeError, dates_between, day_offset, end_of_day, format_with_day_offset,
    parse_local_timestamp, start_of_day,
};
