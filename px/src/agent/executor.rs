//! StepExecutor - resolves the first pending plan step with a tool loop
//!
//! Formats a task instruction embedding the whole plan, then runs a
//! bounded think/act/observe cycle against the tool registry. Failures
//! from the completion client or tools become the step's result text -
//! they are never dropped and never abort the run. One attempt per
//! invocation; retrying is the replanner's call.

use std::sync::Arc;

use tokio::sync::mpsc::UnboundedSender;
use tracing::debug;

use crate::llm::{CompletionRequest, CompletionResponse, ContentBlock, LlmClient, Message, StopReason, ToolDefinition};
use crate::prompts::PromptLoader;
use crate::tools::{ToolContext, ToolRegistry, ToolResult};

use super::events::{AgentEvent, preview, send_event};
use super::{ConversationState, PastStep};

/// Instruction used when the plan is empty (degenerate case)
pub const DIRECT_ANSWER_STEP: &str = "Answer the user's request directly.";

/// Max characters shown in observation/result previews
const PREVIEW_CHARS: usize = 200;

/// Executes one plan step per invocation
pub struct StepExecutor {
    llm: Arc<dyn LlmClient>,
    registry: Arc<ToolRegistry>,
    ctx: ToolContext,
    prompts: Arc<PromptLoader>,
    max_turns: u32,
    max_tokens: u32,
}

impl StepExecutor {
    pub fn new(
        llm: Arc<dyn LlmClient>,
        registry: Arc<ToolRegistry>,
        ctx: ToolContext,
        prompts: Arc<PromptLoader>,
        max_turns: u32,
        max_tokens: u32,
    ) -> Self {
        Self {
            llm,
            registry,
            ctx,
            prompts,
            max_turns,
            max_tokens,
        }
    }

    /// Execute the first pending step of the plan
    ///
    /// Always yields a PastStep; every failure mode is captured in the
    /// result text so the replanner can react to it.
    pub async fn execute(
        &self,
        state: &ConversationState,
        events: Option<&UnboundedSender<AgentEvent>>,
    ) -> PastStep {
        let task = state
            .plan
            .first()
            .cloned()
            .unwrap_or_else(|| DIRECT_ANSWER_STEP.to_string());

        send_event(events, AgentEvent::StepStarted { step: task.clone() });

        let instruction = match self.prompts.render(
            "execute-step",
            &serde_json::json!({
                "plan": state.plan_numbered(),
                "task": task,
            }),
        ) {
            Ok(i) => i,
            Err(e) => return PastStep::new(task, format!("Failed to render step instruction: {}", e)),
        };
        let system = match self.prompts.load_template("executor-system") {
            Ok(s) => s,
            Err(e) => return PastStep::new(task, format!("Failed to load executor prompt: {}", e)),
        };

        let result = self
            .reasoning_loop(&system, &instruction, &self.registry.definitions(), events)
            .await;

        send_event(
            events,
            AgentEvent::StepCompleted {
                step: task.clone(),
                preview: preview(&result, PREVIEW_CHARS),
            },
        );

        PastStep::new(task, result)
    }

    /// The bounded think/act/observe cycle
    async fn reasoning_loop(
        &self,
        system: &str,
        instruction: &str,
        tool_defs: &[ToolDefinition],
        events: Option<&UnboundedSender<AgentEvent>>,
    ) -> String {
        let mut messages = vec![Message::user(instruction)];
        let mut last_text = String::new();
        let mut turn = 0u32;

        loop {
            turn += 1;
            if turn > self.max_turns {
                debug!(max_turns = self.max_turns, "reasoning_loop: turn limit reached");
                return format!(
                    "Stopped after {} reasoning turns without a final answer. Last output: {}",
                    self.max_turns, last_text
                );
            }

            let request = CompletionRequest {
                system_prompt: system.to_string(),
                messages: messages.clone(),
                tools: tool_defs.to_vec(),
                max_tokens: self.max_tokens,
            };

            let response = match self.llm.complete(request).await {
                Ok(r) => r,
                Err(e) => return format!("Language model call failed: {}", e),
            };

            if let Some(text) = &response.content {
                last_text = text.clone();
            }
            messages.push(build_assistant_message(&response));

            match response.stop_reason {
                StopReason::EndTurn | StopReason::StopSequence => {
                    return response.content.unwrap_or(last_text);
                }
                StopReason::ToolUse => {
                    if response.tool_calls.is_empty() {
                        // Malformed stop reason; treat whatever text we have
                        // as the outcome rather than spinning
                        return last_text;
                    }

                    for call in &response.tool_calls {
                        send_event(events, AgentEvent::ToolInvoked { tool: call.name.clone() });
                    }

                    let results = self.registry.invoke_all(&response.tool_calls, &self.ctx).await;

                    for (call, (_, result)) in response.tool_calls.iter().zip(results.iter()) {
                        send_event(
                            events,
                            AgentEvent::ToolObserved {
                                tool: call.name.clone(),
                                preview: preview(&result.content, PREVIEW_CHARS),
                            },
                        );
                    }

                    messages.push(build_tool_result_message(&results));
                }
                StopReason::MaxTokens => {
                    messages.push(Message::user(
                        "Continue from where you left off. Your previous response was truncated.",
                    ));
                }
            }
        }
    }
}

/// Build the assistant message echoing text and tool calls
fn build_assistant_message(response: &CompletionResponse) -> Message {
    let mut blocks = Vec::new();

    if let Some(text) = &response.content {
        blocks.push(ContentBlock::text(text));
    }

    for call in &response.tool_calls {
        blocks.push(ContentBlock::ToolUse {
            id: call.id.clone(),
            name: call.name.clone(),
            input: call.input.clone(),
        });
    }

    Message::assistant_blocks(blocks)
}

/// Build the user message carrying tool results back to the model
fn build_tool_result_message(results: &[(String, ToolResult)]) -> Message {
    let blocks: Vec<ContentBlock> = results
        .iter()
        .map(|(id, result)| ContentBlock::tool_result(id, &result.content, result.is_error))
        .collect();

    Message::user_blocks(blocks)
}
