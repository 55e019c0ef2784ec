//! Replanner - the sole termination-decision point of the loop
//!
//! Given the objective, the plan snapshot and the completed steps, decides
//! to either respond to the user or continue with the remaining steps.
//! The prompt tells the model to respond as soon as the past steps satisfy
//! the objective and to never re-list completed steps.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::llm::{ExtractionSpec, LlmClient, StructuredClient};
use crate::prompts::PromptLoader;

use super::{AgentError, ConversationState};

/// One replanning decision
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Action {
    /// Terminate the loop with this final answer
    Response { response: String },
    /// Continue looping with these remaining steps
    Plan { steps: Vec<String> },
}

/// Payload of the forced submit_action call
#[derive(Debug, Deserialize)]
struct ActOutput {
    action: Action,
}

#[derive(Debug, Serialize)]
struct ReplanContext {
    objective: String,
    plan: String,
    past_steps: String,
}

fn action_spec() -> ExtractionSpec {
    ExtractionSpec {
        tool_name: "submit_action",
        description: "Submit the replanning decision. Use a response action to answer the user, \
                      or a plan action to continue with the remaining steps.",
        schema: serde_json::json!({
            "type": "object",
            "properties": {
                "action": {
                    "oneOf": [
                        {
                            "type": "object",
                            "properties": {
                                "type": { "const": "response" },
                                "response": {
                                    "type": "string",
                                    "description": "The final response to the user's query. Only use when you have the answer."
                                }
                            },
                            "required": ["type", "response"],
                            "additionalProperties": false
                        },
                        {
                            "type": "object",
                            "properties": {
                                "type": { "const": "plan" },
                                "steps": {
                                    "type": "array",
                                    "items": { "type": "string" },
                                    "description": "Remaining steps to follow, in sorted order. Never include steps already done."
                                }
                            },
                            "required": ["type", "steps"],
                            "additionalProperties": false
                        }
                    ]
                }
            },
            "required": ["action"]
        }),
    }
}

/// Decides between responding and continuing after each executed step
pub struct Replanner {
    client: StructuredClient,
    prompts: Arc<PromptLoader>,
}

impl Replanner {
    pub fn new(llm: Arc<dyn LlmClient>, prompts: Arc<PromptLoader>, max_tokens: u32) -> Self {
        Self {
            client: StructuredClient::new(llm, max_tokens),
            prompts,
        }
    }

    /// Produce the next action for the current state
    pub async fn replan(&self, state: &ConversationState) -> Result<Action, AgentError> {
        let system = self
            .prompts
            .load_template("replan-system")
            .map_err(|e| AgentError::Prompt(e.to_string()))?;

        let context = ReplanContext {
            objective: state.input.clone(),
            plan: state.plan_numbered(),
            past_steps: state.past_steps_rendered(),
        };
        let prompt = self
            .prompts
            .render("replan", &context)
            .map_err(|e| AgentError::Prompt(e.to_string()))?;

        let output: ActOutput = self
            .client
            .extract(&action_spec(), &system, &prompt)
            .await
            .map_err(AgentError::Replanning)?;

        match &output.action {
            Action::Response { .. } => debug!("replan: decided to respond"),
            Action::Plan { steps } => debug!(remaining = steps.len(), "replan: decided to continue"),
        }
        Ok(output.action)
    }
}
