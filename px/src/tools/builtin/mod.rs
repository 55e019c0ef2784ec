//! Built-in tools available to the execution step

mod flights;
mod itinerary;
mod users;
mod web_search;

pub use flights::FetchFlightInfoTool;
pub use itinerary::{BookItineraryTool, FetchItineraryTool, ModifyItineraryTool};
pub use users::{FileTicketTool, GetUserInfoTool};
pub use web_search::WebSearchTool;
