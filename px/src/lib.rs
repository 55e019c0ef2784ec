//! PlanExec - plan-execute conversational agent
//!
//! Given a user message, PlanExec produces a multi-step plan, executes the
//! first pending step with a tool-using reasoning loop, then replans or
//! emits the final answer, looping until done. Conversation state is
//! checkpointed per thread id so interactions survive restarts and support
//! multi-turn follow-up.
//!
//! # Core concepts
//!
//! - **Sequential by design**: one step executes, then the replanner
//!   decides the next - never two concurrent steps in one run
//! - **Partial-failure tolerant**: tool and completion failures become the
//!   step's result text so the replanner can react to them
//! - **Bounded everywhere**: the reasoning loop and the replan cycle both
//!   carry hard iteration ceilings
//! - **State in snapshots**: each transition is checkpointed; a cancelled
//!   run leaves the last complete snapshot intact
//!
//! # Modules
//!
//! - [`llm`] - LLM client trait, structured completion, Anthropic implementation
//! - [`tools`] - tool registry with schema-validated invocation
//! - [`airline`] - simulated airline booking backend (demo tool domain)
//! - [`agent`] - planner, replanner, execution step and the orchestrator
//! - [`checkpoint`] - per-thread checkpoint actor
//! - [`service`] - {message, thread_id} -> {response} wrapper
//! - [`config`] - configuration types and loading

pub mod agent;
pub mod airline;
pub mod checkpoint;
pub mod cli;
pub mod config;
pub mod llm;
pub mod prompts;
pub mod repl;
pub mod service;
pub mod tools;

// Re-export commonly used types
pub use agent::{
    Action, AgentError, AgentEvent, ChatRequest, ChatResponse, ConversationState, DIRECT_ANSWER_STEP, Orchestrator,
    PastStep, Planner, Replanner, StepExecutor,
};
pub use airline::{AirlineError, AirlineHandle, Flight, FlightDate, Itinerary, UserProfile};
pub use checkpoint::{CheckpointManager, StateError};
pub use config::{AgentConfig, Config, LlmConfig, SearchConfig, StorageConfig};
pub use llm::{
    AnthropicClient, CompletionRequest, CompletionResponse, ExtractionSpec, LlmClient, LlmError, StructuredClient,
};
pub use service::PlanExecuteService;
pub use tools::{Tool, ToolContext, ToolError, ToolRegistry, ToolResult};
