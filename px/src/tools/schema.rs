//! JSON Schema validation for tool arguments

use jsonschema::JSONSchema;
use serde_json::Value;

/// Validate an argument payload against a tool's declared input schema
///
/// Returns the joined validation error messages on failure.
pub fn validate(schema: &Value, instance: &Value) -> Result<(), String> {
    let compiled = JSONSchema::compile(schema).map_err(|e| format!("invalid tool schema: {}", e))?;

    if let Err(errors) = compiled.validate(instance) {
        let detail = errors.map(|e| e.to_string()).collect::<Vec<_>>().join("; ");
        return Err(detail);
    }
    Ok(())
}
