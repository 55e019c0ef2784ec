//! Tool error types

use thiserror::Error;

/// Errors that can occur during tool invocation
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Tool not found: {name}")]
    UnknownTool { name: String },

    #[error("Invalid arguments for {tool}: {detail}")]
    InvalidArguments { tool: String, detail: String },

    #[error("Tool backend unavailable: {0}")]
    BackendUnavailable(String),
}

impl ToolError {
    /// Whether this is an invalid-call error (unknown name or bad args)
    pub fn is_invalid_call(&self) -> bool {
        matches!(
            self,
            ToolError::UnknownTool { .. } | ToolError::InvalidArguments { .. }
        )
    }
}
