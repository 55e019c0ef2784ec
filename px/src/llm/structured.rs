//! Structured completion - schema-validated extraction over an LlmClient
//!
//! Forces the model to produce output through a single declared tool, then
//! validates the payload against the tool's JSON Schema before
//! deserializing. A payload that does not validate is a SchemaViolation,
//! never a best-effort coercion. No retries happen at this layer.

use std::sync::Arc;

use jsonschema::JSONSchema;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use super::{CompletionRequest, LlmClient, LlmError, Message, ToolDefinition};

/// Target schema for one structured extraction
#[derive(Debug, Clone)]
pub struct ExtractionSpec {
    /// Name of the forced tool the model must call
    pub tool_name: &'static str,
    /// Tool description shown to the model
    pub description: &'static str,
    /// JSON Schema the payload must satisfy
    pub schema: Value,
}

/// Schema-validated wrapper around an LlmClient
pub struct StructuredClient {
    llm: Arc<dyn LlmClient>,
    max_tokens: u32,
}

impl StructuredClient {
    /// Create a new structured client
    pub fn new(llm: Arc<dyn LlmClient>, max_tokens: u32) -> Self {
        Self { llm, max_tokens }
    }

    /// Run one extraction and deserialize the validated payload into `T`
    pub async fn extract<T: DeserializeOwned>(
        &self,
        spec: &ExtractionSpec,
        system_prompt: &str,
        prompt: &str,
    ) -> Result<T, LlmError> {
        let request = CompletionRequest {
            system_prompt: system_prompt.to_string(),
            messages: vec![Message::user(prompt)],
            tools: vec![ToolDefinition::new(spec.tool_name, spec.description, spec.schema.clone())],
            max_tokens: self.max_tokens,
        };

        let response = self.llm.complete(request).await?;

        // Prefer the forced tool call; some models emit a bare JSON body
        // instead of calling the tool, which is accepted as a fallback.
        let payload = response
            .tool_calls
            .iter()
            .find(|call| call.name == spec.tool_name)
            .map(|call| call.input.clone())
            .or_else(|| {
                response
                    .content
                    .as_deref()
                    .and_then(|text| serde_json::from_str::<Value>(text.trim()).ok())
            });

        let Some(payload) = payload else {
            return Err(LlmError::SchemaViolation(format!(
                "model produced neither a {} call nor a JSON body",
                spec.tool_name
            )));
        };

        validate_payload(&spec.schema, &payload)?;
        debug!(tool = spec.tool_name, "extract: payload validated");

        serde_json::from_value(payload)
            .map_err(|e| LlmError::SchemaViolation(format!("payload failed to deserialize: {}", e)))
    }
}

/// Validate a payload against a JSON Schema
fn validate_payload(schema: &Value, payload: &Value) -> Result<(), LlmError> {
    let compiled = JSONSchema::compile(schema)
        .map_err(|e| LlmError::SchemaViolation(format!("invalid extraction schema: {}", e)))?;

    if let Err(errors) = compiled.validate(payload) {
        let detail = errors.map(|e| e.to_string()).collect::<Vec<_>>().join("; ");
        return Err(LlmError::SchemaViolation(detail));
    }
    Ok(())
}
