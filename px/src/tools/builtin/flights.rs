//! fetch_flight_info tool - flight search against the airline backend

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use crate::airline::FlightDate;
use crate::tools::{Tool, ToolContext, ToolResult};

/// Search flights by date, origin and destination
pub struct FetchFlightInfoTool;

#[derive(Debug, Deserialize)]
struct FetchFlightInfoArgs {
    date: FlightDate,
    origin: String,
    destination: String,
}

#[async_trait]
impl Tool for FetchFlightInfoTool {
    fn name(&self) -> &'static str {
        "fetch_flight_info"
    }

    fn description(&self) -> &'static str {
        "Fetch flight information from origin to destination on the given date"
    }

    fn input_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "date": {
                    "type": "object",
                    "properties": {
                        "year": { "type": "integer" },
                        "month": { "type": "integer" },
                        "day": { "type": "integer" },
                        "hour": { "type": "integer" }
                    },
                    "required": ["year", "month", "day"]
                },
                "origin": {
                    "type": "string",
                    "description": "Origin airport code, e.g. SFO"
                },
                "destination": {
                    "type": "string",
                    "description": "Destination airport code, e.g. JFK"
                }
            },
            "required": ["date", "origin", "destination"]
        })
    }

    async fn execute(&self, input: Value, ctx: &ToolContext) -> ToolResult {
        let args: FetchFlightInfoArgs = match serde_json::from_value(input) {
            Ok(a) => a,
            Err(e) => return ToolResult::error(format!("Malformed arguments: {}", e)),
        };

        match ctx
            .airline
            .search_flights(args.date, &args.origin, &args.destination)
            .await
        {
            Ok(flights) if flights.is_empty() => ToolResult::success(format!(
                "No flights found from {} to {} on {}-{:02}-{:02}",
                args.origin, args.destination, args.date.year, args.date.month, args.date.day
            )),
            Ok(flights) => ToolResult::json(&flights),
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
    async fn test_fetch_flight_info_finds_seeded_flights() {
        let tool = FetchFlightInfoTool;
        let input = serde_json::json!({
            "date": {"year": 2025, "month": 9, "day": 1},
            "origin": "SFO",
            "destination": "JFK"
        });

        let result = tool.execute(input, &ctx()).await;
        assert!(!result.is_error);
        assert!(result.content.contains("DA123"));
        assert!(result.content.contains("DA127"));
    }

    #[tokio::test]
    async fn test_fetch_flight_info_reports_no_matches() {
        let tool = FetchFlightInfoTool;
        let input = serde_json::json!({
            "date": {"year": 2026, "month": 1, "day": 1},
            "origin": "SFO",
            "destination": "JFK"
        });

        let result = tool.execute(input, &ctx()).await;
        assert!(!result.is_error);
        assert!(result.content.contains("No flights found"));
    }
}
