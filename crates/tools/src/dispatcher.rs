use crate::registry::ToolRegistry;
use crate::traits::ToolResult;
use anchain_aml_providers::{ScreeningError, ValidationError};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

const MAX_INPUT_BYTES: usize = 64 * 1024;

/// Routes a named tool call to its implementation and folds the outcome into a
/// [`ToolResult`]. Failures are never swallowed: each one comes back as an
/// error payload carrying its kind.
pub struct ToolDispatcher {
    registry: Arc<ToolRegistry>,
}

impl ToolDispatcher {
    pub fn new(registry: Arc<ToolRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    pub async fn dispatch(&self, tool_name: &str, input: serde_json::Value) -> ToolResult {
        let started = Instant::now();
        let outcome = self.run(tool_name, input).await;

        match &outcome {
            Ok(_) => info!(
                "tool={} ok elapsed_ms={}",
                tool_name,
                started.elapsed().as_millis()
            ),
            Err(e) => warn!(
                "tool={} failed kind={} elapsed_ms={}",
                tool_name,
                e.kind(),
                started.elapsed().as_millis()
            ),
        }

        ToolResult::from(outcome)
    }

    async fn run(
        &self,
        tool_name: &str,
        input: serde_json::Value,
    ) -> Result<serde_json::Value, ScreeningError> {
        let tool = self
            .registry
            .get(tool_name)
            .ok_or_else(|| ValidationError::UnknownTool(tool_name.to_string()))?;

        validate_input(&input)?;
        tool.execute(input).await
    }
}

fn validate_input(input: &serde_json::Value) -> Result<(), ValidationError> {
    if !(input.is_object() || input.is_null()) {
        return Err(ValidationError::InvalidArguments(
            "arguments must be a JSON object".into(),
        ));
    }

    // Check for excessively large payloads
    if let Ok(serialized) = serde_json::to_string(input) {
        if serialized.len() > MAX_INPUT_BYTES {
            return Err(ValidationError::InvalidArguments(format!(
                "arguments exceed {} bytes",
                MAX_INPUT_BYTES
            )));
        }
    }

    Ok(())
}
