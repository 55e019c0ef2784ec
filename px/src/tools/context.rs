//! ToolContext - execution context for tools
//!
//! Collaborators are explicitly constructed process singletons handed to
//! each invocation, never ambient globals.

use crate::airline::AirlineHandle;
use crate::config::SearchConfig;

/// Execution context shared by all tool invocations of one agent
#[derive(Clone)]
pub struct ToolContext {
    /// Handle to the airline backend actor
    pub airline: AirlineHandle,

    /// Web search settings
    pub search: SearchConfig,
}

impl ToolContext {
    /// Create a new tool context
    pub fn new(airline: AirlineHandle, search: SearchConfig) -> Self {
        Self { airline, search }
    }
}

impl std::fmt::Debug for ToolContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolContext")
            .field("search_provider", &self.search.provider)
            .finish()
    }
}
