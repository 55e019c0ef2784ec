//! ToolRegistry - named, schema-described tools for the reasoning loop
//!
//! The registry enumerates tool descriptors at construction time and
//! validates every invocation's arguments against the named tool's schema
//! before dispatch.

use std::collections::HashMap;

use futures::future::join_all;
use tracing::debug;

use crate::llm::{ToolCall, ToolDefinition};

use super::builtin::{
    BookItineraryTool, FetchFlightInfoTool, FetchItineraryTool, FileTicketTool, GetUserInfoTool, ModifyItineraryTool,
    WebSearchTool,
};
use super::{Tool, ToolContext, ToolError, ToolResult, schema};

/// Manages the tool set for an agent
pub struct ToolRegistry {
    tools: HashMap<String, Box<dyn Tool>>,
}

impl ToolRegistry {
    /// Create a registry with the standard tool set
    pub fn standard() -> Self {
        let mut tools: HashMap<String, Box<dyn Tool>> = HashMap::new();

        // Web search
        tools.insert("web_search".into(), Box::new(WebSearchTool));

        // Airline backend operations
        tools.insert("fetch_flight_info".into(), Box::new(FetchFlightInfoTool));
        tools.insert("fetch_itinerary".into(), Box::new(FetchItineraryTool));
        tools.insert("book_itinerary".into(), Box::new(BookItineraryTool));
        tools.insert("modify_itinerary".into(), Box::new(ModifyItineraryTool));
        tools.insert("get_user_info".into(), Box::new(GetUserInfoTool));
        tools.insert("file_ticket".into(), Box::new(FileTicketTool));

        Self { tools }
    }

    /// Create an empty registry (for testing)
    pub fn empty() -> Self {
        Self { tools: HashMap::new() }
    }

    /// Add a tool to the registry
    pub fn add_tool(&mut self, tool: Box<dyn Tool>) {
        self.tools.insert(tool.name().to_string(), tool);
    }

    /// Get tool definitions for the LLM
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        let mut defs: Vec<ToolDefinition> = self
            .tools
            .values()
            .map(|t| ToolDefinition {
                name: t.name().to_string(),
                description: t.description().to_string(),
                input_schema: t.input_schema(),
            })
            .collect();
        defs.sort_by(|a, b| a.name.cmp(&b.name));
        defs
    }

    /// Check if a tool exists
    pub fn has_tool(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// Get tool names
    pub fn tool_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tools.keys().cloned().collect();
        names.sort();
        names
    }

    /// Invoke a tool call after validating its arguments
    pub async fn invoke(&self, call: &ToolCall, ctx: &ToolContext) -> Result<ToolResult, ToolError> {
        let tool = self.tools.get(&call.name).ok_or_else(|| ToolError::UnknownTool {
            name: call.name.clone(),
        })?;

        schema::validate(&tool.input_schema(), &call.input).map_err(|detail| ToolError::InvalidArguments {
            tool: call.name.clone(),
            detail,
        })?;

        debug!(tool = %call.name, "invoke: arguments validated, dispatching");
        Ok(tool.execute(call.input.clone(), ctx).await)
    }

    /// Invoke multiple tool calls concurrently
    ///
    /// Invocations are independent, so they fan out together; invalid calls
    /// fold into error results so the reasoning loop always gets one
    /// observation per call.
    pub async fn invoke_all(&self, calls: &[ToolCall], ctx: &ToolContext) -> Vec<(String, ToolResult)> {
        let futures = calls.iter().map(|call| async move {
            let result = match self.invoke(call, ctx).await {
                Ok(result) => result,
                Err(e) => ToolResult::error(e.to_string()),
            };
            (call.id.clone(), result)
        });

        join_all(futures).await
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

    fn call(name: &str, input: serde_json::Value) -> ToolCall {
        ToolCall {
            id: format!("call_{}", name),
            name: name.to_string(),
            input,
        }
    }

    #[test]
    fn test_standard_registry_has_all_tools() {
        let registry = ToolRegistry::standard();

        assert!(registry.has_tool("web_search"));
        assert!(registry.has_tool("fetch_flight_info"));
        assert!(registry.has_tool("fetch_itinerary"));
        assert!(registry.has_tool("book_itinerary"));
        assert!(registry.has_tool("modify_itinerary"));
        assert!(registry.has_tool("get_user_info"));
        assert!(registry.has_tool("file_ticket"));
    }

    #[test]
    fn test_definitions_are_static_and_sorted() {
        let registry = ToolRegistry::standard();
        let defs = registry.definitions();

        assert_eq!(defs.len(), 7);
        let names: Vec<&str> = defs.iter().map(|d| d.name.as_str()).collect();
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
        assert!(defs.iter().all(|d| d.input_schema.is_object()));
    }

    #[tokio::test]
    async fn test_invoke_unknown_tool() {
        let registry = ToolRegistry::standard();

        let result = registry.invoke(&call("teleport", serde_json::json!({})), &ctx()).await;
        assert!(matches!(result, Err(ToolError::UnknownTool { .. })));
    }

    #[tokio::test]
    async fn test_invoke_rejects_malformed_args_before_dispatch() {
        let registry = ToolRegistry::standard();

        // Missing flight_id
        let result = registry
            .invoke(&call("book_itinerary", serde_json::json!({"user_name": "Adam"})), &ctx())
            .await;

        match result {
            Err(ToolError::InvalidArguments { tool, detail }) => {
                assert_eq!(tool, "book_itinerary");
                assert!(detail.contains("flight_id"));
            }
            other => panic!("Expected InvalidArguments, got {:?}", other.map(|r| r.content)),
        }
    }

    #[tokio::test]
    async fn test_invoke_valid_call_dispatches() {
        let registry = ToolRegistry::standard();

        let result = registry
            .invoke(&call("get_user_info", serde_json::json!({"user_name": "Adam"})), &ctx())
            .await
            .unwrap();

        assert!(!result.is_error);
        assert!(result.content.contains("adam@gmail.com"));
    }

    #[tokio::test]
    async fn test_invoke_all_pairs_results_with_call_ids() {
        let registry = ToolRegistry::standard();

        let calls = vec![
            call("get_user_info", serde_json::json!({"user_name": "Adam"})),
            call("nonexistent", serde_json::json!({})),
        ];

        let results = registry.invoke_all(&calls, &ctx()).await;

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].0, "call_get_user_info");
        assert!(!results[0].1.is_error);
        assert_eq!(results[1].0, "call_nonexistent");
        assert!(results[1].1.is_error);
        assert!(results[1].1.content.contains("Tool not found"));
    }
}
