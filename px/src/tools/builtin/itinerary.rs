//! Itinerary tools - fetch, book and modify bookings

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use crate::airline::{AirlineError, ModifyOutcome};
use crate::tools::{Tool, ToolContext, ToolResult};

/// Fetch an itinerary by confirmation number
pub struct FetchItineraryTool;

#[async_trait]
impl Tool for FetchItineraryTool {
    fn name(&self) -> &'static str {
        "fetch_itinerary"
    }

    fn description(&self) -> &'static str {
        "Fetch itinerary information using confirmation number"
    }

    fn input_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "confirmation_number": { "type": "string" }
            },
            "required": ["confirmation_number"]
        })
    }

    async fn execute(&self, input: Value, ctx: &ToolContext) -> ToolResult {
        let code = match input["confirmation_number"].as_str() {
            Some(c) => c,
            None => return ToolResult::error("confirmation_number is required"),
        };

        match ctx.airline.get_itinerary(code).await {
            Ok(Some(itinerary)) => ToolResult::json(&itinerary),
            Ok(None) => ToolResult::success(format!("Confirmation number {} not found", code)),
            Err(e) => ToolResult::error(e.to_string()),
        }
    }
}

/// Book a flight for a user
pub struct BookItineraryTool;

#[derive(Debug, Deserialize)]
struct BookItineraryArgs {
    user_name: String,
    flight_id: String,
}

#[async_trait]
impl Tool for BookItineraryTool {
    fn name(&self) -> &'static str {
        "book_itinerary"
    }

    fn description(&self) -> &'static str {
        "Book a flight for a user. Returns the itinerary with a fresh confirmation number."
    }

    fn input_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "user_name": { "type": "string" },
                "flight_id": { "type": "string" }
            },
            "required": ["user_name", "flight_id"]
        })
    }

    async fn execute(&self, input: Value, ctx: &ToolContext) -> ToolResult {
        let args: BookItineraryArgs = match serde_json::from_value(input) {
            Ok(a) => a,
            Err(e) => return ToolResult::error(format!("Malformed arguments: {}", e)),
        };

        match ctx.airline.book(&args.user_name, &args.flight_id).await {
            Ok(itinerary) => ToolResult::json(&itinerary),
            // Unknown user/flight are diagnostics for the reasoning loop
            Err(e @ (AirlineError::UserNotFound(_) | AirlineError::FlightNotFound(_))) => {
                ToolResult::success(e.to_string())
            }
            Err(e) => ToolResult::error(e.to_string()),
        }
    }
}

/// Modify an existing itinerary - change the flight or cancel
pub struct ModifyItineraryTool;

#[derive(Debug, Deserialize)]
struct ModifyItineraryArgs {
    confirmation_number: String,
    #[serde(default)]
    new_flight_id: Option<String>,
    #[serde(default)]
    cancel: bool,
}

#[async_trait]
impl Tool for ModifyItineraryTool {
    fn name(&self) -> &'static str {
        "modify_itinerary"
    }

    fn description(&self) -> &'static str {
        "Modify an existing itinerary - either change to a new flight or cancel the booking"
    }

    fn input_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "confirmation_number": { "type": "string" },
                "new_flight_id": {
                    "type": "string",
                    "description": "Flight to rebook onto (omit when cancelling)"
                },
                "cancel": {
                    "type": "boolean",
                    "description": "Set true to cancel the booking"
                }
            },
            "required": ["confirmation_number"]
        })
    }

    async fn execute(&self, input: Value, ctx: &ToolContext) -> ToolResult {
        let args: ModifyItineraryArgs = match serde_json::from_value(input) {
            Ok(a) => a,
            Err(e) => return ToolResult::error(format!("Malformed arguments: {}", e)),
        };

        match ctx
            .airline
            .modify(&args.confirmation_number, args.new_flight_id, args.cancel)
            .await
        {
            Ok(ModifyOutcome::Cancelled(code)) => {
                ToolResult::success(format!("Booking {} has been cancelled", code))
            }
            Ok(ModifyOutcome::Rebooked(itinerary)) => ToolResult::json(&itinerary),
            Err(
                e @ (AirlineError::ItineraryNotFound(_)
                | AirlineError::FlightNotFound(_)
                | AirlineError::NoModification),
            ) => ToolResult::success(e.to_string()),
            Err(e) => ToolResult::error(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::airline::AirlineHandle;
    use crate::config::SearchConfig;

    fn ctx() -> ToolContext {
        ToolContext::new(AirlineHandle::spawn(), SearchConfig::default())
    }

    #[tokio::test]
    async fn test_book_then_cancel_then_fetch() {
        let ctx = ctx();

        // Book
        let booked = BookItineraryTool
            .execute(serde_json::json!({"user_name": "Adam", "flight_id": "DA123"}), &ctx)
            .await;
        assert!(!booked.is_error);
        let itinerary: serde_json::Value = serde_json::from_str(&booked.content).unwrap();
        let code = itinerary["confirmation_number"].as_str().unwrap().to_string();
        assert_eq!(code.len(), 8);

        // Cancel
        let cancelled = ModifyItineraryTool
            .execute(
                serde_json::json!({"confirmation_number": code, "cancel": true}),
                &ctx,
            )
            .await;
        assert!(!cancelled.is_error);
        assert!(cancelled.content.contains("has been cancelled"));

        // Fetch now reports not found
        let fetched = FetchItineraryTool
            .execute(serde_json::json!({"confirmation_number": code}), &ctx)
            .await;
        assert!(!fetched.is_error);
        assert!(fetched.content.contains("not found"));
    }

    #[tokio::test]
    async fn test_book_unknown_user_is_diagnostic_not_error() {
        let result = BookItineraryTool
            .execute(serde_json::json!({"user_name": "Zelda", "flight_id": "DA123"}), &ctx())
            .await;

        assert!(!result.is_error);
        assert_eq!(result.content, "User Zelda not found in database");
    }

    #[tokio::test]
    async fn test_modify_without_change_is_diagnostic() {
        let ctx = ctx();

        let booked = BookItineraryTool
            .execute(serde_json::json!({"user_name": "Bob", "flight_id": "DA129"}), &ctx)
            .await;
        let itinerary: serde_json::Value = serde_json::from_str(&booked.content).unwrap();
        let code = itinerary["confirmation_number"].as_str().unwrap();

        let result = ModifyItineraryTool
            .execute(serde_json::json!({"confirmation_number": code}), &ctx)
            .await;
        assert!(!result.is_error);
        assert_eq!(result.content, "No modification specified");
    }
}
