//! PlanExecuteService - owns the assembled agent and the checkpointer
//!
//! Thin wrapper so callers only ever see {message, thread_id} in and
//! {response} out. The caller always receives a response string or an
//! explicit failure, never a silently empty reply.

use std::sync::Arc;

use tokio::sync::mpsc::UnboundedSender;
use tracing::info;

use crate::agent::{
    AgentError, AgentEvent, ChatRequest, ChatResponse, Orchestrator, Planner, Replanner, StepExecutor,
};
use crate::airline::AirlineHandle;
use crate::checkpoint::CheckpointManager;
use crate::config::Config;
use crate::llm::{self, LlmClient};
use crate::prompts::PromptLoader;
use crate::tools::{ToolContext, ToolRegistry};

/// The assembled plan-execute agent service
pub struct PlanExecuteService {
    orchestrator: Orchestrator,
    checkpoints: CheckpointManager,
}

impl PlanExecuteService {
    /// Assemble the full service from configuration
    pub fn from_config(config: &Config) -> eyre::Result<Self> {
        let llm = llm::create_client(&config.llm).map_err(|e| eyre::eyre!("Failed to create LLM client: {}", e))?;
        let airline = AirlineHandle::spawn();
        let checkpoints = CheckpointManager::spawn(&config.storage.checkpoint_dir)?;
        Ok(Self::new(llm, airline, checkpoints, config))
    }

    /// Assemble the service around existing collaborators
    ///
    /// The LLM client, airline backend and checkpoint manager are process
    /// singletons injected here rather than ambient globals.
    pub fn new(
        llm: Arc<dyn LlmClient>,
        airline: AirlineHandle,
        checkpoints: CheckpointManager,
        config: &Config,
    ) -> Self {
        let prompts = Arc::new(PromptLoader::from_cwd());
        let registry = Arc::new(ToolRegistry::standard());
        let ctx = ToolContext::new(airline, config.search.clone());

        let planner = Planner::new(llm.clone(), prompts.clone(), config.llm.max_tokens);
        let replanner = Replanner::new(llm.clone(), prompts.clone(), config.llm.max_tokens);
        let executor = StepExecutor::new(
            llm,
            registry,
            ctx,
            prompts,
            config.agent.max_reasoning_turns,
            config.llm.max_tokens,
        );

        let orchestrator = Orchestrator::new(
            planner,
            executor,
            replanner,
            checkpoints.clone(),
            config.agent.recursion_limit,
        );

        Self {
            orchestrator,
            checkpoints,
        }
    }

    /// The checkpoint manager backing this service
    pub fn checkpoints(&self) -> &CheckpointManager {
        &self.checkpoints
    }

    /// Process one chat message
    pub async fn chat(&self, req: &ChatRequest) -> Result<ChatResponse, AgentError> {
        self.chat_with_events(req, None).await
    }

    /// Process one chat message, pushing progress events as it runs
    pub async fn chat_with_events(
        &self,
        req: &ChatRequest,
        events: Option<&UnboundedSender<AgentEvent>>,
    ) -> Result<ChatResponse, AgentError> {
        checkpointstore::validate_thread_id(&req.thread_id)
            .map_err(|e| AgentError::InvalidRequest(e.to_string()))?;
        if req.message.trim().is_empty() {
            return Err(AgentError::InvalidRequest("message must not be empty".to_string()));
        }

        info!(thread_id = %req.thread_id, "Processing chat message");
        let response = self.orchestrator.run(&req.thread_id, &req.message, events).await?;
        info!(thread_id = %req.thread_id, "Returning response");

        Ok(ChatResponse { response })
    }
}
