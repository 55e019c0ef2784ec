//! Planner - turns an objective into an ordered list of steps

use std::sync::Arc;

use serde::Deserialize;
use tracing::debug;

use crate::llm::{ExtractionSpec, LlmClient, StructuredClient};
use crate::prompts::PromptLoader;

use super::AgentError;

/// Payload of the forced submit_plan call
#[derive(Debug, Deserialize)]
struct PlanOutput {
    steps: Vec<String>,
}

fn plan_spec() -> ExtractionSpec {
    ExtractionSpec {
        tool_name: "submit_plan",
        description: "Submit the step by step plan for the objective. Call this once with all steps.",
        schema: serde_json::json!({
            "type": "object",
            "properties": {
                "steps": {
                    "type": "array",
                    "items": { "type": "string" },
                    "description": "Different steps to follow, in sorted order"
                }
            },
            "required": ["steps"]
        }),
    }
}

/// Produces the initial plan for an objective
pub struct Planner {
    client: StructuredClient,
    prompts: Arc<PromptLoader>,
}

impl Planner {
    pub fn new(llm: Arc<dyn LlmClient>, prompts: Arc<PromptLoader>, max_tokens: u32) -> Self {
        Self {
            client: StructuredClient::new(llm, max_tokens),
            prompts,
        }
    }

    /// Plan the given objective
    ///
    /// A zero-step plan is a valid output; the execution step has a
    /// degenerate-case instruction for it.
    pub async fn plan(&self, objective: &str) -> Result<Vec<String>, AgentError> {
        let system = self
            .prompts
            .load_template("plan")
            .map_err(|e| AgentError::Prompt(e.to_string()))?;

        let output: PlanOutput = self
            .client
            .extract(&plan_spec(), &system, objective)
            .await
            .map_err(AgentError::Planning)?;

        debug!(step_count = output.steps.len(), "plan: produced");
        Ok(output.steps)
    }
}
