//! Agent error taxonomy

use thiserror::Error;

use crate::checkpoint::StateError;
use crate::llm::LlmError;

/// Errors that are fatal to one chat request
///
/// Tool and completion failures inside the execution step never surface
/// here - they are captured as the step's result text so the replanner can
/// react. Everything below aborts the request with the cause preserved.
#[derive(Debug, Error)]
pub enum AgentError {
    #[error("Planning failed: {0}")]
    Planning(#[source] LlmError),

    #[error("Replanning failed: {0}")]
    Replanning(#[source] LlmError),

    #[error("Prompt rendering failed: {0}")]
    Prompt(String),

    #[error("Exceeded {limit} plan-execute-replan cycles without converging")]
    LoopNotConverging { limit: u32 },

    #[error("Terminal state reached without a response")]
    NoResponseProduced,

    #[error("Checkpoint store failure: {0}")]
    Store(#[from] StateError),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}
