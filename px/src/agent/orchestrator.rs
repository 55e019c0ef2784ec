//! Orchestrator - the plan-execute-replan state machine
//!
//! PLAN -> EXECUTE -> REPLAN -> {EXECUTE | TERMINAL}. The state is
//! checkpointed after every transition, so a new request for the same
//! thread resumes from the last complete snapshot. A recursion ceiling
//! bounds the loop; exceeding it means the replanner is not converging
//! and the request fails rather than spinning forever.

use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info};

use crate::checkpoint::CheckpointManager;

use super::events::{AgentEvent, send_event};
use super::{Action, AgentError, Planner, Replanner, StepExecutor};

/// Drives one chat request through the state machine
pub struct Orchestrator {
    planner: Planner,
    executor: StepExecutor,
    replanner: Replanner,
    checkpoints: CheckpointManager,
    recursion_limit: u32,
}

impl Orchestrator {
    pub fn new(
        planner: Planner,
        executor: StepExecutor,
        replanner: Replanner,
        checkpoints: CheckpointManager,
        recursion_limit: u32,
    ) -> Self {
        Self {
            planner,
            executor,
            replanner,
            checkpoints,
            recursion_limit,
        }
    }

    /// Run the state machine for one message on one thread
    ///
    /// Returns the final response text, or the fatal error for this
    /// request. Per-step failures are inside the state, not here.
    pub async fn run(
        &self,
        thread_id: &str,
        message: &str,
        events: Option<&UnboundedSender<AgentEvent>>,
    ) -> Result<String, AgentError> {
        let mut state = self.checkpoints.load(thread_id).await?;
        state.begin_episode(message);

        // PLAN
        let steps = self.planner.plan(&state.input).await?;
        info!(thread_id, step_count = steps.len(), "Initial plan created");
        send_event(events, AgentEvent::PlanCreated { steps: steps.clone() });
        state.plan = steps;
        self.checkpoints.save(thread_id, &state).await?;

        let mut cycles = 0u32;
        loop {
            if cycles >= self.recursion_limit {
                return Err(AgentError::LoopNotConverging {
                    limit: self.recursion_limit,
                });
            }
            cycles += 1;
            debug!(thread_id, cycles, "run: entering execute");

            // EXECUTE
            let past = self.executor.execute(&state, events).await;
            state.past_steps.push(past);
            self.checkpoints.save(thread_id, &state).await?;

            // REPLAN
            match self.replanner.replan(&state).await? {
                Action::Response { response } => {
                    state.response = Some(response);
                    state.plan.clear();
                    self.checkpoints.save(thread_id, &state).await?;
                    break;
                }
                Action::Plan { steps } => {
                    debug!(thread_id, remaining = steps.len(), "run: plan revised");
                    send_event(events, AgentEvent::PlanRevised { steps: steps.clone() });
                    state.plan = steps;
                    self.checkpoints.save(thread_id, &state).await?;
                }
            }
        }

        // TERMINAL - a responseless or blank terminal state is a contract
        // violation, never a silently empty reply
        match state.response {
            Some(response) if !response.trim().is_empty() => {
                info!(thread_id, cycles, "Run complete");
                send_event(
                    events,
                    AgentEvent::Completed {
                        response: response.clone(),
                    },
                );
                Ok(response)
            }
            _ => Err(AgentError::NoResponseProduced),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use tempfile::TempDir;

    use super::*;
    use crate::agent::executor::DIRECT_ANSWER_STEP;
    use crate::airline::AirlineHandle;
    use crate::config::SearchConfig;
    use crate::llm::CompletionResponse;
    use crate::llm::client::mock::MockLlmClient;
    use crate::prompts::PromptLoader;
    use crate::tools::{ToolContext, ToolRegistry};

    fn plan_response(steps: &[&str]) -> CompletionResponse {
        MockLlmClient::tool_call_response("submit_plan", serde_json::json!({ "steps": steps }))
    }

    fn respond_action(text: &str) -> CompletionResponse {
        MockLlmClient::tool_call_response(
            "submit_action",
            serde_json::json!({"action": {"type": "response", "response": text}}),
        )
    }

    fn plan_action(steps: &[&str]) -> CompletionResponse {
        MockLlmClient::tool_call_response("submit_action", serde_json::json!({"action": {"type": "plan", "steps": steps}}))
    }

    struct Fixture {
        orchestrator: Orchestrator,
        checkpoints: CheckpointManager,
        _temp: TempDir,
    }

    fn fixture(
        planner_mock: MockLlmClient,
        executor_mock: MockLlmClient,
        replanner_mock: MockLlmClient,
        recursion_limit: u32,
    ) -> Fixture {
        let temp = TempDir::new().unwrap();
        let checkpoints = CheckpointManager::spawn(temp.path()).unwrap();
        let prompts = Arc::new(PromptLoader::embedded_only());

        let planner = Planner::new(Arc::new(planner_mock), prompts.clone(), 1024);
        let replanner = Replanner::new(Arc::new(replanner_mock), prompts.clone(), 1024);
        let executor = StepExecutor::new(
            Arc::new(executor_mock),
            Arc::new(ToolRegistry::empty()),
            ToolContext::new(AirlineHandle::spawn(), SearchConfig::default()),
            prompts,
            8,
            1024,
        );

        Fixture {
            orchestrator: Orchestrator::new(planner, executor, replanner, checkpoints.clone(), recursion_limit),
            checkpoints,
            _temp: temp,
        }
    }

    #[tokio::test]
    async fn test_single_cycle_run_reaches_terminal() {
        let f = fixture(
            MockLlmClient::new(vec![plan_response(&["Compute 2+2"])]),
            MockLlmClient::new(vec![MockLlmClient::text_response("4")]),
            MockLlmClient::new(vec![respond_action("The answer is 4.")]),
            50,
        );

        let response = f.orchestrator.run("default", "What is 2+2?", None).await.unwrap();
        assert_eq!(response, "The answer is 4.");

        // Checkpoint reflects the terminal state
        let state = f.checkpoints.load("default").await.unwrap();
        assert_eq!(state.input, "What is 2+2?");
        assert!(state.plan.is_empty());
        assert_eq!(state.past_steps.len(), 1);
        assert_eq!(state.past_steps[0].step, "Compute 2+2");
        assert_eq!(state.past_steps[0].result, "4");
        assert_eq!(state.response.as_deref(), Some("The answer is 4."));
    }

    #[tokio::test]
    async fn test_n_steps_terminate_after_n_cycles() {
        let f = fixture(
            MockLlmClient::new(vec![plan_response(&["step one", "step two", "step three"])]),
            MockLlmClient::new(vec![]).with_fallback(MockLlmClient::text_response("done")),
            MockLlmClient::new(vec![
                plan_action(&["step two", "step three"]),
                plan_action(&["step three"]),
                respond_action("All three steps are done."),
            ]),
            50,
        );

        let response = f.orchestrator.run("t", "do three things", None).await.unwrap();
        assert_eq!(response, "All three steps are done.");

        let state = f.checkpoints.load("t").await.unwrap();
        assert_eq!(state.past_steps.len(), 3);
        assert_eq!(state.past_steps[0].step, "step one");
        assert_eq!(state.past_steps[1].step, "step two");
        assert_eq!(state.past_steps[2].step, "step three");
    }

    #[tokio::test]
    async fn test_non_converging_replanner_hits_ceiling() {
        let f = fixture(
            MockLlmClient::new(vec![plan_response(&["spin"])]),
            MockLlmClient::new(vec![]).with_fallback(MockLlmClient::text_response("spun")),
            MockLlmClient::new(vec![]).with_fallback(plan_action(&["spin again"])),
            5,
        );

        let err = f.orchestrator.run("t", "never finish", None).await.unwrap_err();
        assert!(matches!(err, AgentError::LoopNotConverging { limit: 5 }));

        // Exactly the ceiling's worth of steps were executed
        let state = f.checkpoints.load("t").await.unwrap();
        assert_eq!(state.past_steps.len(), 5);
    }

    #[tokio::test]
    async fn test_empty_plan_takes_degenerate_path() {
        let f = fixture(
            MockLlmClient::new(vec![plan_response(&[])]),
            MockLlmClient::new(vec![MockLlmClient::text_response("Hello!")]),
            MockLlmClient::new(vec![respond_action("Hello!")]),
            50,
        );

        f.orchestrator.run("t", "just say hi", None).await.unwrap();

        let state = f.checkpoints.load("t").await.unwrap();
        assert_eq!(state.past_steps[0].step, DIRECT_ANSWER_STEP);
    }

    #[tokio::test]
    async fn test_planner_failure_is_fatal_with_cause() {
        let f = fixture(
            MockLlmClient::new(vec![]), // planner has nothing to say
            MockLlmClient::new(vec![]),
            MockLlmClient::new(vec![]),
            50,
        );

        let err = f.orchestrator.run("t", "anything", None).await.unwrap_err();
        assert!(matches!(err, AgentError::Planning(_)));
    }

    #[tokio::test]
    async fn test_blank_response_is_contract_violation() {
        let f = fixture(
            MockLlmClient::new(vec![plan_response(&["one step"])]),
            MockLlmClient::new(vec![MockLlmClient::text_response("done")]),
            MockLlmClient::new(vec![respond_action("   ")]),
            50,
        );

        let err = f.orchestrator.run("t", "anything", None).await.unwrap_err();
        assert!(matches!(err, AgentError::NoResponseProduced));
    }

    #[tokio::test]
    async fn test_step_failure_is_not_fatal() {
        // Executor's LLM always fails; the failure lands in the step result
        // and the replanner still gets to decide
        let f = fixture(
            MockLlmClient::new(vec![plan_response(&["flaky step"])]),
            MockLlmClient::new(vec![]), // fails every call
            MockLlmClient::new(vec![respond_action("Could not complete the step.")]),
            50,
        );

        let response = f.orchestrator.run("t", "try anyway", None).await.unwrap();
        assert_eq!(response, "Could not complete the step.");

        let state = f.checkpoints.load("t").await.unwrap();
        assert!(state.past_steps[0].result.contains("Language model call failed"));
    }

    #[tokio::test]
    async fn test_second_turn_keeps_history_and_replaces_objective() {
        let f = fixture(
            MockLlmClient::new(vec![plan_response(&["first errand"]), plan_response(&["second errand"])]),
            MockLlmClient::new(vec![]).with_fallback(MockLlmClient::text_response("done")),
            MockLlmClient::new(vec![respond_action("First done."), respond_action("Second done.")]),
            50,
        );

        f.orchestrator.run("t", "do the first errand", None).await.unwrap();
        let response = f.orchestrator.run("t", "now the second errand", None).await.unwrap();
        assert_eq!(response, "Second done.");

        let state = f.checkpoints.load("t").await.unwrap();
        assert_eq!(state.input, "now the second errand");
        // History accumulated across both turns
        assert_eq!(state.past_steps.len(), 2);
        assert_eq!(state.past_steps[0].step, "first errand");
        assert_eq!(state.past_steps[1].step, "second errand");
    }

    #[tokio::test]
    async fn test_events_cover_the_whole_run() {
        let f = fixture(
            MockLlmClient::new(vec![plan_response(&["step one", "step two"])]),
            MockLlmClient::new(vec![]).with_fallback(MockLlmClient::text_response("done")),
            MockLlmClient::new(vec![plan_action(&["step two"]), respond_action("Finished.")]),
            50,
        );

        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        f.orchestrator.run("t", "two things", Some(&tx)).await.unwrap();
        drop(tx);

        let mut kinds = Vec::new();
        while let Some(event) = rx.recv().await {
            kinds.push(match event {
                AgentEvent::PlanCreated { .. } => "plan",
                AgentEvent::StepStarted { .. } => "start",
                AgentEvent::StepCompleted { .. } => "complete",
                AgentEvent::PlanRevised { .. } => "revise",
                AgentEvent::Completed { .. } => "done",
                _ => "other",
            });
        }

        assert_eq!(
            kinds,
            vec!["plan", "start", "complete", "revise", "start", "complete", "done"]
        );
    }
}
