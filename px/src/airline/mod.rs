//! Simulated airline booking backend
//!
//! An in-memory demo domain used to exercise the tool-invocation protocol:
//! users, flights and itineraries, with bookings serialized through a
//! single-writer actor. Nothing here survives a process restart.

mod backend;
mod types;

pub use backend::{AirlineError, AirlineHandle, ModifyOutcome};
pub use types::{Flight, FlightDate, Itinerary, SupportTicket, UserProfile};
