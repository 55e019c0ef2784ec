//! The plan-execute-replan agent core
//!
//! A planner produces an ordered step list, an execution step resolves the
//! first pending step with a bounded tool loop, and a replanner decides
//! after every step whether to respond or continue. The orchestrator wires
//! the three together and checkpoints the conversation state after each
//! transition.

mod error;
mod events;
mod executor;
mod orchestrator;
mod planner;
mod replanner;
mod state;

pub use error::AgentError;
pub use events::{AgentEvent, preview, send_event};
pub use executor::{DIRECT_ANSWER_STEP, StepExecutor};
pub use orchestrator::Orchestrator;
pub use planner::Planner;
pub use replanner::{Action, Replanner};
pub use state::{ChatRequest, ChatResponse, ConversationState, PastStep};
