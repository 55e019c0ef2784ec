//! Progress events emitted while a request runs
//!
//! The core result is final-only; these events exist so a CLI or REPL can
//! show what the loop is doing. Consumers that fall behind or disappear
//! are ignored.

use tokio::sync::mpsc::UnboundedSender;

/// One observable moment in a run
#[derive(Debug, Clone)]
pub enum AgentEvent {
    /// Initial plan produced
    PlanCreated { steps: Vec<String> },
    /// An execution step started
    StepStarted { step: String },
    /// The reasoning loop invoked a tool
    ToolInvoked { tool: String },
    /// A tool produced an observation
    ToolObserved { tool: String, preview: String },
    /// The execution step finished
    StepCompleted { step: String, preview: String },
    /// The replanner revised the remaining plan
    PlanRevised { steps: Vec<String> },
    /// The run reached its terminal state
    Completed { response: String },
}

/// Best-effort send; a closed or absent channel is not an error
pub fn send_event(tx: Option<&UnboundedSender<AgentEvent>>, event: AgentEvent) {
    if let Some(tx) = tx {
        let _ = tx.send(event);
    }
}

/// Clip a string for event previews
pub fn preview(text: &str, max_chars: usize) -> String {
    let clipped: String = text.chars().take(max_chars).collect();
    if text.chars().count() > max_chars {
        format!("{}...", clipped)
    } else {
        clipped
    }
}
