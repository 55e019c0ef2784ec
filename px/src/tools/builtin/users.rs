//! User tools - profile lookup and support tickets

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use crate::airline::AirlineError;
use crate::tools::{Tool, ToolContext, ToolResult};

/// Look up a user profile by name
pub struct GetUserInfoTool;

#[async_trait]
impl Tool for GetUserInfoTool {
    fn name(&self) -> &'static str {
        "get_user_info"
    }

    fn description(&self) -> &'static str {
        "Get user profile information"
    }

    fn input_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "user_name": { "type": "string" }
            },
            "required": ["user_name"]
        })
    }

    async fn execute(&self, input: Value, ctx: &ToolContext) -> ToolResult {
        let name = match input["user_name"].as_str() {
            Some(n) => n,
            None => return ToolResult::error("user_name is required"),
        };

        match ctx.airline.get_user(name).await {
            Ok(Some(profile)) => ToolResult::json(&profile),
            Ok(None) => ToolResult::success(format!("User {} not found", name)),
            Err(e) => ToolResult::error(e.to_string()),
        }
    }
}

/// File a support ticket for requests that need a human
pub struct FileTicketTool;

#[derive(Debug, Deserialize)]
struct FileTicketArgs {
    user_name: String,
    user_request: String,
}

#[async_trait]
impl Tool for FileTicketTool {
    fn name(&self) -> &'static str {
        "file_ticket"
    }

    fn description(&self) -> &'static str {
        "File a support ticket for complex requests that need human assistance"
    }

    fn input_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "user_name": { "type": "string" },
                "user_request": { "type": "string" }
            },
            "required": ["user_name", "user_request"]
        })
    }

    async fn execute(&self, input: Value, ctx: &ToolContext) -> ToolResult {
        let args: FileTicketArgs = match serde_json::from_value(input) {
            Ok(a) => a,
            Err(e) => return ToolResult::error(format!("Malformed arguments: {}", e)),
        };

        match ctx.airline.file_ticket(&args.user_name, &args.user_request).await {
            Ok(ticket) => ToolResult::success(format!(
                "Support ticket {} has been created for {}. A human agent will contact you at {} within 24 hours.",
                ticket.ticket_id, ticket.user_profile.name, ticket.user_profile.email
            )),
            Err(e @ AirlineError::UserNotFound(_)) => ToolResult::success(e.to_string()),
            Err(e) => ToolResult::error(e.to_string()),
        }
    }
}
