//! Domain types for the simulated airline backend

use serde::{Deserialize, Serialize};

/// Calendar slot for a flight
///
/// Plain integer fields on purpose - language models are unreliable at
/// emitting full datetime strings, so the tool schemas ask for the parts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlightDate {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    #[serde(default)]
    pub hour: u32,
}

impl FlightDate {
    pub fn new(year: i32, month: u32, day: u32, hour: u32) -> Self {
        Self { year, month, day, hour }
    }

    /// Whether two dates fall on the same calendar day (hour ignored)
    pub fn same_day(&self, other: &FlightDate) -> bool {
        self.year == other.year && self.month == other.month && self.day == other.day
    }
}

/// A registered traveller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub user_id: String,
    pub name: String,
    pub email: String,
}

/// A schedulable flight
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flight {
    pub flight_id: String,
    pub date_time: FlightDate,
    pub origin: String,
    pub destination: String,
    pub duration: f64,
    pub price: f64,
}

/// A confirmed booking
///
/// The confirmation number is generated at booking time and is the primary
/// key of the in-memory itinerary map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Itinerary {
    pub confirmation_number: String,
    pub user_profile: UserProfile,
    pub flight: Flight,
}

/// A filed support ticket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupportTicket {
    pub ticket_id: String,
    pub user_request: String,
    pub user_profile: UserProfile,
}
