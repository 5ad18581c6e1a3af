//! Shared helpers for command handlers.

use hassctl_api::Attributes;
use serde_json::Value;

use crate::error::CliError;

/// Parse a `--data` / `--attributes` argument, which must be a JSON object.
pub fn parse_json_object(field: &str, raw: &str) -> Result<Attributes, CliError> {
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(CliError::Validation {
            field: field.into(),
            reason: format!("expected a JSON object, got {}", json_kind(&other)),
        }),
        Err(e) => Err(CliError::Validation {
            field: field.into(),
            reason: format!("invalid JSON: {e}"),
        }),
    }
}

/// Parse an optional JSON object argument.
pub fn parse_optional_object(
    field: &str,
    raw: Option<&str>,
) -> Result<Option<Attributes>, CliError> {
    raw.map(|r| parse_json_object(field, r)).transpose()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Render an attribute value compactly: strings unquoted, everything else as JSON.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Map a dialoguer / interactive I/O failure into CliError.
pub fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}
