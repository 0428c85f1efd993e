//! Classification of raw provider responses.

use crate::constants::MAX_ERROR_DETAIL_CHARS;
use crate::error::ScreeningError;
use crate::traits::RawResponse;
use serde_json::Value;
use tracing::warn;

/// Fields the provider uses to carry a human-readable error, in lookup order.
const DETAIL_FIELDS: &[&str] = &["err_msg", "message", "detail", "error", "msg"];

/// Turns a raw response into the provider's JSON object, or a classified error.
///
/// Successful bodies are returned untouched: no field is renamed, dropped or
/// aggregated.
pub fn normalize(response: RawResponse) -> Result<Value, ScreeningError> {
    if response.is_success() {
        return parse_success(&response.body);
    }

    let status = response.status;
    let detail = error_detail(status, &response.body);
    warn!("aml provider returned HTTP {}", status);

    Err(match status {
        401 | 403 => ScreeningError::Authentication {
            status,
            message: detail,
        },
        429 => ScreeningError::RateLimited {
            retry_after: response.retry_after.filter(|v| !v.is_empty()),
            message: detail,
        },
        400 | 422 => ScreeningError::InvalidRequest { status, detail },
        500..=599 => ScreeningError::ProviderUnavailable {
            status,
            message: detail,
        },
        _ => ScreeningError::Provider {
            status,
            message: detail,
        },
    })
}

fn parse_success(body: &[u8]) -> Result<Value, ScreeningError> {
    let value: Value = serde_json::from_slice(body)
        .map_err(|e| ScreeningError::MalformedResponse(format!("body is not valid JSON: {}", e)))?;

    if !value.is_object() {
        return Err(ScreeningError::MalformedResponse(format!(
            "expected a JSON object, got {}",
            json_type_name(&value)
        )));
    }

    Ok(value)
}

fn error_detail(status: u16, body: &[u8]) -> String {
    if let Ok(Value::Object(map)) = serde_json::from_slice::<Value>(body) {
        for field in DETAIL_FIELDS {
            match map.get(*field) {
                Some(Value::String(s)) if !s.trim().is_empty() => return truncate(s.trim()),
                Some(Value::Null) | None => continue,
                Some(Value::String(_)) => continue,
                Some(other) => return truncate(&other.to_string()),
            }
        }
    }

    let text = String::from_utf8_lossy(body);
    let text = text.trim();
    if !text.is_empty() {
        return truncate(text);
    }

    reqwest::StatusCode::from_u16(status)
        .ok()
        .and_then(|s| s.canonical_reason())
        .unwrap_or("no detail provided")
        .to_string()
}

fn truncate(s: &str) -> String {
    if s.chars().count() <= MAX_ERROR_DETAIL_CHARS {
        return s.to_string();
    }
    let mut out: String = s.chars().take(MAX_ERROR_DETAIL_CHARS).collect();
    out.push_str("...");
    out
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
