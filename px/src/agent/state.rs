//! Conversation state shared by the state machine and the checkpoint store

use serde::{Deserialize, Serialize};

/// One completed execution step: the instruction and its result text
///
/// Past steps are append-only; once recorded they are never rewritten.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PastStep {
    pub step: String,
    pub result: String,
}

impl PastStep {
    pub fn new(step: impl Into<String>, result: impl Into<String>) -> Self {
        Self {
            step: step.into(),
            result: result.into(),
        }
    }
}

/// The aggregate persisted per thread
///
/// `Default` is the state of a brand new thread: no objective, no plan,
/// no history, no response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConversationState {
    /// The user's objective for the current planning episode
    #[serde(default)]
    pub input: String,

    /// Pending steps, in the order they must be attempted
    #[serde(default)]
    pub plan: Vec<String>,

    /// Completed (instruction, result) pairs, in execution order
    #[serde(default)]
    pub past_steps: Vec<PastStep>,

    /// Final response of the last completed episode, if any
    #[serde(default)]
    pub response: Option<String>,
}

impl ConversationState {
    /// Start a new planning episode on this thread
    ///
    /// Replaces the objective and clears the plan and response. Past steps
    /// are kept - they are the multi-turn context the replanner sees when
    /// the user follows up on the same thread.
    pub fn begin_episode(&mut self, message: &str) {
        self.input = message.to_string();
        self.plan.clear();
        self.response = None;
    }

    /// The plan as a numbered list for prompt embedding
    pub fn plan_numbered(&self) -> String {
        self.plan
            .iter()
            .enumerate()
            .map(|(i, step)| format!("{}. {}", i + 1, step))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Past steps rendered for prompt embedding
    pub fn past_steps_rendered(&self) -> String {
        if self.past_steps.is_empty() {
            return "(none yet)".to_string();
        }
        self.past_steps
            .iter()
            .map(|p| format!("- {}\n  result: {}", p.step, p.result))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Inbound request shape: one user message for one thread
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,

    #[serde(default = "default_thread_id")]
    pub thread_id: String,
}

fn default_thread_id() -> String {
    "default".to_string()
}

impl ChatRequest {
    pub fn new(message: impl Into<String>, thread_id: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            thread_id: thread_id.into(),
        }
    }
}

/// Outbound response shape
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
}
