//! LlmClient trait and mock implementation

use async_trait::async_trait;

use super::{CompletionRequest, CompletionResponse, LlmError};

/// A client for a text-generation endpoint
///
/// The core only ever needs a single awaitable call per invocation; retry
/// policy beyond transport-level transient errors belongs to callers.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Run one completion request to completion
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError>;
}

/// Scriptable mock client for tests
pub mod mock {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use crate::llm::{CompletionRequest, CompletionResponse, LlmError, StopReason, TokenUsage, ToolCall};

    /// Mock LLM client that replays a scripted sequence of responses
    ///
    /// Responses are served FIFO; when the script runs dry the optional
    /// fallback response is served instead, which makes "always does X"
    /// stubs easy to write.
    pub struct MockLlmClient {
        script: Mutex<VecDeque<CompletionResponse>>,
        fallback: Option<CompletionResponse>,
        requests: Mutex<Vec<CompletionRequest>>,
    }

    impl MockLlmClient {
        /// Create a mock with a fixed response script
        pub fn new(script: Vec<CompletionResponse>) -> Self {
            Self {
                script: Mutex::new(script.into()),
                fallback: None,
                requests: Mutex::new(Vec::new()),
            }
        }

        /// Serve this response whenever the script is exhausted
        pub fn with_fallback(mut self, response: CompletionResponse) -> Self {
            self.fallback = Some(response);
            self
        }

        /// All requests seen so far, in order
        pub fn requests(&self) -> Vec<CompletionRequest> {
            self.requests.lock().unwrap().clone()
        }

        /// Build a plain-text EndTurn response
        pub fn text_response(content: impl Into<String>) -> CompletionResponse {
            CompletionResponse {
                content: Some(content.into()),
                tool_calls: vec![],
                stop_reason: StopReason::EndTurn,
                usage: TokenUsage::default(),
            }
        }

        /// Build a single-tool-call response
        pub fn tool_call_response(name: impl Into<String>, input: serde_json::Value) -> CompletionResponse {
            CompletionResponse {
                content: None,
                tool_calls: vec![ToolCall {
                    id: "call_1".to_string(),
                    name: name.into(),
                    input,
                }],
                stop_reason: StopReason::ToolUse,
                usage: TokenUsage::default(),
            }
        }
    }

    #[async_trait]
    impl super::LlmClient for MockLlmClient {
        async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
            self.requests.lock().unwrap().push(request);

            if let Some(response) = self.script.lock().unwrap().pop_front() {
                return Ok(response);
            }
            match &self.fallback {
                Some(response) => Ok(response.clone()),
                None => Err(LlmError::InvalidResponse("mock script exhausted".to_string())),
            }
        }
    }

}
