//! Defensive parsing of model responses.
//!
//! A structured-output call returns untrusted text that is expected to be a
//! JSON array but may be wrapped in markdown fences. Sanitize first, then
//! parse, with a typed outcome — never ad hoc string surgery inside business
//! logic.

use serde_json::Value as JsonValue;

/// Strip a leading ```json (or bare ```) fence and a trailing ``` fence.
pub fn strip_code_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let trimmed = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .map(str::trim_start)
        .unwrap_or(trimmed);
    trimmed
        .strip_suffix("```")
        .map(str::trim_end)
        .unwrap_or(trimmed)
}

/// Sanitize then parse model output as a JSON array.
///
/// The error is a detail message for the caller to wrap in its own
/// malformed-response variant. A broken array is not partially recovered.
pub fn parse_array(raw: &str) -> std::result::Result<Vec<JsonValue>, String> {
    let cleaned = strip_code_fences(raw);
    let value: JsonValue = serde_json::from_str(cleaned).map_err(|e| e.to_string())?;
    match value {
        JsonValue::Array(items) => Ok(items),
        other => Err(format!("expected a JSON array, got {}", kind_of(&other))),
    }
}

fn kind_of(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "a boolean",
        JsonValue::Number(_) => "a number",
        JsonValue::String(_) => "a string",
        JsonValue::Array(_) => "an array",
        JsonValue::Object(_) => "an object",
    }
}
