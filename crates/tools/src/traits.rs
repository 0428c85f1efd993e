use anchain_aml_providers::{ErrorPayload, ScreeningError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorPayload>,
}

impl ToolResult {
    pub fn ok(output: serde_json::Value) -> Self {
        Self {
            success: true,
            output: Some(output),
            error: None,
        }
    }

    pub fn failed(error: &ScreeningError) -> Self {
        Self {
            success: false,
            output: None,
            error: Some(error.to_payload()),
        }
    }

    /// The value handed back to the agent: the provider payload or the error object.
    pub fn body(&self) -> serde_json::Value {
        match (&self.output, &self.error) {
            (_, Some(error)) => serde_json::to_value(error).unwrap_or(serde_json::Value::Null),
            (Some(output), None) => output.clone(),
            (None, None) => serde_json::Value::Null,
        }
    }
}

impl From<Result<serde_json::Value, ScreeningError>> for ToolResult {
    fn from(outcome: Result<serde_json::Value, ScreeningError>) -> Self {
        match outcome {
            Ok(output) => Self::ok(output),
            Err(e) => Self::failed(&e),
        }
    }
}

#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &'static str;
    fn description(&self) -> String;
    fn schema(&self) -> serde_json::Value;

    async fn execute(&self, args: serde_json::Value) -> Result<serde_json::Value, ScreeningError>;
}
