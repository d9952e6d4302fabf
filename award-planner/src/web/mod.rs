//! Web layer for the award itinerary planner.
//!
//! Provides a JSON API over the availability calendar, segment building,
//! combination search and selection propagation.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::{AppState, Backend};
