//! AirlineBackend - actor that owns the demo user/flight/itinerary maps
//!
//! All writes go through a single actor task, so booking and cancellation
//! are serialized: two concurrent bookings can never be handed the same
//! freshly generated confirmation number. The itinerary map is volatile -
//! it lives exactly as long as the process.

use std::collections::HashMap;

use rand::Rng;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info};

use super::{Flight, FlightDate, Itinerary, SupportTicket, UserProfile};

/// Length of generated confirmation numbers
const CONFIRMATION_LEN: usize = 8;

/// Length of generated support ticket ids
const TICKET_LEN: usize = 6;

/// Errors from the airline backend
///
/// The "not found" variants are diagnostic outcomes, not faults - tools
/// render them as plain strings for the reasoning loop to react to.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AirlineError {
    #[error("User {0} not found in database")]
    UserNotFound(String),

    #[error("Flight {0} not found")]
    FlightNotFound(String),

    #[error("Confirmation number {0} not found")]
    ItineraryNotFound(String),

    #[error("No modification specified")]
    NoModification,

    #[error("Airline backend is not running")]
    BackendGone,
}

/// Outcome of a modify request
#[derive(Debug, Clone, PartialEq)]
pub enum ModifyOutcome {
    /// The booking was cancelled and removed from the store
    Cancelled(String),
    /// The booking was moved to a different flight
    Rebooked(Itinerary),
}

enum AirlineCommand {
    SearchFlights {
        date: FlightDate,
        origin: String,
        destination: String,
        reply: oneshot::Sender<Vec<Flight>>,
    },
    GetUser {
        name: String,
        reply: oneshot::Sender<Option<UserProfile>>,
    },
    GetItinerary {
        confirmation_number: String,
        reply: oneshot::Sender<Option<Itinerary>>,
    },
    Book {
        user_name: String,
        flight_id: String,
        reply: oneshot::Sender<Result<Itinerary, AirlineError>>,
    },
    Modify {
        confirmation_number: String,
        new_flight_id: Option<String>,
        cancel: bool,
        reply: oneshot::Sender<Result<ModifyOutcome, AirlineError>>,
    },
    FileTicket {
        user_name: String,
        user_request: String,
        reply: oneshot::Sender<Result<SupportTicket, AirlineError>>,
    },
    ItineraryCount {
        reply: oneshot::Sender<usize>,
    },
}

/// Handle to send requests to the airline backend actor
#[derive(Clone)]
pub struct AirlineHandle {
    tx: mpsc::Sender<AirlineCommand>,
}

impl AirlineHandle {
    /// Spawn the backend actor with the demo seed data
    pub fn spawn() -> Self {
        let (tx, rx) = mpsc::channel(64);
        let backend = AirlineBackend::with_seed_data(rx);
        tokio::spawn(backend.run());
        info!("Airline backend spawned");
        Self { tx }
    }

    /// Flights from origin to destination on the given day
    pub async fn search_flights(
        &self,
        date: FlightDate,
        origin: &str,
        destination: &str,
    ) -> Result<Vec<Flight>, AirlineError> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(AirlineCommand::SearchFlights {
                date,
                origin: origin.to_string(),
                destination: destination.to_string(),
                reply,
            })
            .await
            .map_err(|_| AirlineError::BackendGone)?;
        rx.await.map_err(|_| AirlineError::BackendGone)
    }

    /// Look up a user profile by name
    pub async fn get_user(&self, name: &str) -> Result<Option<UserProfile>, AirlineError> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(AirlineCommand::GetUser {
                name: name.to_string(),
                reply,
            })
            .await
            .map_err(|_| AirlineError::BackendGone)?;
        rx.await.map_err(|_| AirlineError::BackendGone)
    }

    /// Fetch an itinerary by confirmation number
    pub async fn get_itinerary(&self, confirmation_number: &str) -> Result<Option<Itinerary>, AirlineError> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(AirlineCommand::GetItinerary {
                confirmation_number: confirmation_number.to_string(),
                reply,
            })
            .await
            .map_err(|_| AirlineError::BackendGone)?;
        rx.await.map_err(|_| AirlineError::BackendGone)
    }

    /// Book a flight for a user, generating a fresh confirmation number
    pub async fn book(&self, user_name: &str, flight_id: &str) -> Result<Itinerary, AirlineError> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(AirlineCommand::Book {
                user_name: user_name.to_string(),
                flight_id: flight_id.to_string(),
                reply,
            })
            .await
            .map_err(|_| AirlineError::BackendGone)?;
        rx.await.map_err(|_| AirlineError::BackendGone)?
    }

    /// Modify an existing itinerary - change the flight or cancel it
    pub async fn modify(
        &self,
        confirmation_number: &str,
        new_flight_id: Option<String>,
        cancel: bool,
    ) -> Result<ModifyOutcome, AirlineError> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(AirlineCommand::Modify {
                confirmation_number: confirmation_number.to_string(),
                new_flight_id,
                cancel,
                reply,
            })
            .await
            .map_err(|_| AirlineError::BackendGone)?;
        rx.await.map_err(|_| AirlineError::BackendGone)?
    }

    /// File a free-text support ticket for a user
    pub async fn file_ticket(&self, user_name: &str, user_request: &str) -> Result<SupportTicket, AirlineError> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(AirlineCommand::FileTicket {
                user_name: user_name.to_string(),
                user_request: user_request.to_string(),
                reply,
            })
            .await
            .map_err(|_| AirlineError::BackendGone)?;
        rx.await.map_err(|_| AirlineError::BackendGone)?
    }

    /// Number of stored itineraries (for diagnostics and tests)
    pub async fn itinerary_count(&self) -> Result<usize, AirlineError> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(AirlineCommand::ItineraryCount { reply })
            .await
            .map_err(|_| AirlineError::BackendGone)?;
        rx.await.map_err(|_| AirlineError::BackendGone)
    }
}

/// The actor that owns the maps and processes commands in order
struct AirlineBackend {
    users: HashMap<String, UserProfile>,
    flights: HashMap<String, Flight>,
    itineraries: HashMap<String, Itinerary>,
    rx: mpsc::Receiver<AirlineCommand>,
}

impl AirlineBackend {
    fn with_seed_data(rx: mpsc::Receiver<AirlineCommand>) -> Self {
        Self {
            users: seed_users(),
            flights: seed_flights(),
            itineraries: HashMap::new(),
            rx,
        }
    }

    async fn run(mut self) {
        debug!("Airline backend actor started");

        while let Some(cmd) = self.rx.recv().await {
            match cmd {
                AirlineCommand::SearchFlights {
                    date,
                    origin,
                    destination,
                    reply,
                } => {
                    let mut flights: Vec<Flight> = self
                        .flights
                        .values()
                        .filter(|f| f.date_time.same_day(&date) && f.origin == origin && f.destination == destination)
                        .cloned()
                        .collect();
                    flights.sort_by(|a, b| a.flight_id.cmp(&b.flight_id));
                    let _ = reply.send(flights);
                }

                AirlineCommand::GetUser { name, reply } => {
                    let _ = reply.send(self.users.get(&name).cloned());
                }

                AirlineCommand::GetItinerary {
                    confirmation_number,
                    reply,
                } => {
                    let _ = reply.send(self.itineraries.get(&confirmation_number).cloned());
                }

                AirlineCommand::Book {
                    user_name,
                    flight_id,
                    reply,
                } => {
                    let _ = reply.send(self.book(&user_name, &flight_id));
                }

                AirlineCommand::Modify {
                    confirmation_number,
                    new_flight_id,
                    cancel,
                    reply,
                } => {
                    let _ = reply.send(self.modify(&confirmation_number, new_flight_id, cancel));
                }

                AirlineCommand::FileTicket {
                    user_name,
                    user_request,
                    reply,
                } => {
                    let _ = reply.send(self.file_ticket(&user_name, &user_request));
                }

                AirlineCommand::ItineraryCount { reply } => {
                    let _ = reply.send(self.itineraries.len());
                }
            }
        }

        debug!("Airline backend actor stopped");
    }

    fn book(&mut self, user_name: &str, flight_id: &str) -> Result<Itinerary, AirlineError> {
        let user_profile = self
            .users
            .get(user_name)
            .cloned()
            .ok_or_else(|| AirlineError::UserNotFound(user_name.to_string()))?;
        let flight = self
            .flights
            .get(flight_id)
            .cloned()
            .ok_or_else(|| AirlineError::FlightNotFound(flight_id.to_string()))?;

        // Re-roll on the (unlikely) collision so codes stay unique
        let mut confirmation_number = random_code(CONFIRMATION_LEN, b"abcdefghijklmnopqrstuvwxyz0123456789");
        while self.itineraries.contains_key(&confirmation_number) {
            confirmation_number = random_code(CONFIRMATION_LEN, b"abcdefghijklmnopqrstuvwxyz0123456789");
        }

        let itinerary = Itinerary {
            confirmation_number: confirmation_number.clone(),
            user_profile,
            flight,
        };
        self.itineraries.insert(confirmation_number.clone(), itinerary.clone());

        info!(confirmation_number, user_name, flight_id, "Booked itinerary");
        Ok(itinerary)
    }

    fn modify(
        &mut self,
        confirmation_number: &str,
        new_flight_id: Option<String>,
        cancel: bool,
    ) -> Result<ModifyOutcome, AirlineError> {
        if !self.itineraries.contains_key(confirmation_number) {
            return Err(AirlineError::ItineraryNotFound(confirmation_number.to_string()));
        }

        if cancel {
            self.itineraries.remove(confirmation_number);
            info!(confirmation_number, "Cancelled itinerary");
            return Ok(ModifyOutcome::Cancelled(confirmation_number.to_string()));
        }

        if let Some(flight_id) = new_flight_id {
            let flight = self
                .flights
                .get(&flight_id)
                .cloned()
                .ok_or_else(|| AirlineError::FlightNotFound(flight_id.clone()))?;

            let itinerary = self
                .itineraries
                .get_mut(confirmation_number)
                .ok_or_else(|| AirlineError::ItineraryNotFound(confirmation_number.to_string()))?;
            itinerary.flight = flight;

            info!(confirmation_number, flight_id, "Rebooked itinerary");
            return Ok(ModifyOutcome::Rebooked(itinerary.clone()));
        }

        Err(AirlineError::NoModification)
    }

    fn file_ticket(&mut self, user_name: &str, user_request: &str) -> Result<SupportTicket, AirlineError> {
        let user_profile = self
            .users
            .get(user_name)
            .cloned()
            .ok_or_else(|| AirlineError::UserNotFound(user_name.to_string()))?;

        let ticket_id = random_code(TICKET_LEN, b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789");
        info!(ticket_id, user_name, "Filed support ticket");

        Ok(SupportTicket {
            ticket_id,
            user_request: user_request.to_string(),
            user_profile,
        })
    }
}

fn random_code(len: usize, charset: &[u8]) -> String {
    let mut rng = rand::rng();
    (0..len)
        .map(|_| charset[rng.random_range(0..charset.len())] as char)
        .collect()
}

fn seed_users() -> HashMap<String, UserProfile> {
    [
        ("Adam", "1", "adam@gmail.com"),
        ("Bob", "2", "bob@gmail.com"),
        ("Chelsie", "3", "chelsie@gmail.com"),
        ("David", "4", "david@gmail.com"),
    ]
    .into_iter()
    .map(|(name, id, email)| {
        (
            name.to_string(),
            UserProfile {
                user_id: id.to_string(),
                name: name.to_string(),
                email: email.to_string(),
            },
        )
    })
    .collect()
}

fn seed_flights() -> HashMap<String, Flight> {
    let specs = [
        ("DA123", "SFO", "JFK", (2025, 9, 1, 1), 3.0, 200.0),
        ("DA125", "SFO", "JFK", (2025, 9, 1, 7), 9.0, 500.0),
        ("DA127", "SFO", "JFK", (2025, 9, 1, 19), 5.0, 300.0),
        ("DA129", "JFK", "SFO", (2025, 9, 2, 1), 6.0, 250.0),
        ("DA131", "JFK", "SFO", (2025, 9, 2, 7), 6.0, 350.0),
        ("DA133", "JFK", "SFO", (2025, 9, 2, 19), 6.0, 400.0),
        ("DA135", "LAX", "JFK", (2025, 9, 1, 10), 5.0, 275.0),
        ("DA137", "JFK", "LAX", (2025, 9, 2, 15), 6.0, 325.0),
    ];

    specs
        .into_iter()
        .map(|(id, origin, destination, (y, m, d, h), duration, price)| {
            (
                id.to_string(),
                Flight {
                    flight_id: id.to_string(),
                    date_time: FlightDate::new(y, m, d, h),
                    origin: origin.to_string(),
                    destination: destination.to_string(),
                    duration,
                    price,
                },
            )
        })
        .collect()
}
