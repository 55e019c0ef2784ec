//! Tool trait definition

use async_trait::async_trait;
use serde_json::Value;

use super::context::ToolContext;

/// A tool that can be called by the reasoning loop
#[async_trait]
pub trait Tool: Send + Sync {
    /// Tool name (matches the LLM tool_use name)
    fn name(&self) -> &'static str;

    /// Human-readable description
    fn description(&self) -> &'static str;

    /// JSON Schema for input parameters
    fn input_schema(&self) -> Value;

    /// Execute the tool
    ///
    /// Arguments have already been validated against `input_schema` by the
    /// registry before this is called.
    async fn execute(&self, input: Value, ctx: &ToolContext) -> ToolResult;
}

/// Result of a tool execution
///
/// A diagnostic string such as "User Adam not found in database" is a
/// successful result - the reasoning loop decides whether the content
/// signals a logical failure. `is_error` marks infrastructure faults.
#[derive(Debug, Clone)]
pub struct ToolResult {
    pub content: String,
    pub is_error: bool,
}

impl ToolResult {
    /// Create a successful result
    pub fn success(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            is_error: false,
        }
    }

    /// Create an error result
    pub fn error(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            is_error: true,
        }
    }

    /// Render a serializable value as a pretty JSON result
    pub fn json<T: serde::Serialize>(value: &T) -> Self {
        match serde_json::to_string_pretty(value) {
            Ok(content) => Self::success(content),
            Err(e) => Self::error(format!("Failed to serialize result: {}", e)),
        }
    }
}
