//! Award itinerary planner server.
//!
//! A web application that answers: "Given seat availability on each hop of
//! this route, which combinations of flights can I actually book end to end?"

pub mod availability;
pub mod cache;
pub mod domain;
pub mod planner;
pub mod web;
