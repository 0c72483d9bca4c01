//! Template filters for values documents
//!
//! These extend MiniJinja's builtins with the Helm-style helpers that values
//! templates tend to need.

use base64::Engine as _;
use minijinja::{Error, ErrorKind, Value};

/// Names of the filters registered by [`crate::Engine`]
pub const AVAILABLE_FILTERS: &[&str] = &["toyaml", "tojson", "b64encode", "quote", "nindent", "required"];

/// Convert a value to YAML
///
/// Usage: {{ app.tags | toyaml }}
pub fn toyaml(value: Value) -> Result<String, Error> {
    let json_value: serde_json::Value = serde_json::to_value(&value)
        .map_err(|e| Error::new(ErrorKind::InvalidOperation, e.to_string()))?;

    let yaml = serde_yaml::to_string(&json_value)
        .map_err(|e| Error::new(ErrorKind::InvalidOperation, e.to_string()))?;

    Ok(yaml.trim_start_matches("---\n").trim_end().to_string())
}

/// Convert a value to compact JSON
///
/// Usage: {{ environment.tags | tojson }}
pub fn tojson(value: Value) -> Result<String, Error> {
    serde_json::to_string(&value).map_err(|e| Error::new(ErrorKind::InvalidOperation, e.to_string()))
}

/// Usage: {{ deployment.version | b64encode }}
#[must_use]
pub fn b64encode(value: String) -> String {
    base64::engine::general_purpose::STANDARD.encode(value.as_bytes())
}

/// Wrap in double quotes, escaping backslashes and quotes
///
/// Usage: {{ app.name | quote }}
#[must_use]
pub fn quote(value: Value) -> String {
    let s = match value.as_str() {
        Some(s) => s.to_string(),
        None => value.to_string(),
    };
    format!("\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\""))
}

/// Start a new line and indent every non-empty line
///
/// Usage: {{ app.tags | toyaml | nindent(4) }}
#[must_use]
pub fn nindent(value: String, spaces: usize) -> String {
    let pad = " ".repeat(spaces);
    let lines: Vec<String> = value
        .lines()
        .map(|line| {
            if line.is_empty() {
                String::new()
            } else {
                format!("{}{}", pad, line)
            }
        })
        .collect();
    format!("\n{}", lines.join("\n"))
}

/// Fail rendering when a value is none or an empty string
///
/// Usage: {{ app.tags.owner | required("owner tag is required") }}
pub fn required(value: Value, message: Option<String>) -> Result<Value, Error> {
    let missing = value.is_undefined()
        || value.is_none()
        || value.as_str().is_some_and(|s| s.is_empty());

    if missing {
        let msg = message.unwrap_or_else(|| "required value is missing".to_string());
        return Err(Error::new(ErrorKind::InvalidOperation, msg));
    }
    Ok(value)
}
