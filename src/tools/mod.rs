// src/tools/mod.rs

use crate::error::{GatewayError, Result};
use async_trait::async_trait;
use serde_json::Value;

pub mod documents;
pub mod guest;

pub use documents::{FetchDocuments, SignDocument};
pub use guest::{ConfirmGuestRegistration, PrepareGuestRegistration};

/// Interface every gateway capability implements.
/// Listed to agents as OpenAI-style function descriptors ([`crate::gateway::ToolDescriptor`]).
#[async_trait]
pub trait Tool: Send + Sync {
    /// Unique tool name (e.g. "fetchDocuments")
    fn name(&self) -> &str;

    /// Usage contract shown to the agent's planner.
    /// States when the tool may and may not be called; keep it in step with the validation.
    fn description(&self) -> &str;

    /// JSON Schema of the tool arguments
    fn parameters(&self) -> Value;

    /// Runs the tool. Errors are rendered to text by the gateway.
    async fn execute(&self, args: Value) -> Result<String>;
}

/// Reads a required, non-blank string argument.
pub(crate) fn required_str<'a>(args: &'a Value, key: &str) -> Result<&'a str> {
    match args.get(key).and_then(Value::as_str) {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(GatewayError::InvalidToolInput(format!("Missing '{key}' parameter"))),
    }
}
