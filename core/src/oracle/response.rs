//! Total parsing of oracle output.
//!
//! The oracle is free text that is supposed to be a JSON object. Nothing here returns a
//! `CoreError` or panics: unusable output becomes an [`OracleFailure`] value and every
//! expected field is coerced into the shape callers rely on.

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::OnceLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FailureKind {
    /// The oracle could not be reached or errored (network, timeout, quota).
    OracleUnavailable,
    /// The oracle answered but not with a usable JSON object.
    MalformedOutput,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OracleFailure {
    pub kind: FailureKind,
    pub reason: String,
    /// Start of the offending text, bounded for logs and stored documents.
    pub raw_preview: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
}

impl OracleFailure {
    pub fn malformed(reason: impl Into<String>, raw: &str, preview_chars: usize) -> Self {
        Self {
            kind: FailureKind::MalformedOutput,
            reason: reason.into(),
            raw_preview: truncate_chars(raw, preview_chars),
            error_code: None,
        }
    }

    pub fn unavailable(reason: impl Into<String>, error_code: &str) -> Self {
        Self {
            kind: FailureKind::OracleUnavailable,
            reason: reason.into(),
            raw_preview: String::new(),
            error_code: Some(error_code.to_string()),
        }
    }
}

fn fence_open() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^```[A-Za-z0-9_-]*").expect("static regex"))
}

/// Strips whitespace and code fences, then narrows to the outermost `{ ... }` span.
pub fn clean_response_text(raw: &str) -> &str {
    let mut text = raw.trim();
    if let Some(m) = fence_open().find(text) {
        text = text[m.end()..].trim_start();
    }
    if let Some(stripped) = text.strip_suffix("```") {
        text = stripped.trim_end();
    }
    if let (Some(first), Some(last)) = (text.find('{'), text.rfind('}')) {
        if last > first {
            text = &text[first..=last];
        }
    }
    text.trim()
}

/// Parses oracle output into a JSON object or a typed failure carrying a bounded preview.
pub fn parse_json_object(raw: &str, preview_chars: usize) -> Result<Map<String, Value>, OracleFailure> {
    let cleaned = clean_response_text(raw);
    if cleaned.is_empty() {
        return Err(OracleFailure::malformed(
            "oracle returned an empty response",
            raw,
            preview_chars,
        ));
    }
    match serde_json::from_str::<Value>(cleaned) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(OracleFailure::malformed(
            format!("expected a JSON object, found {}", json_kind(&other)),
            raw,
            preview_chars,
        )),
        Err(e) => Err(OracleFailure::malformed(
            format!("invalid JSON: {}", e),
            raw,
            preview_chars,
        )),
    }
}

fn json_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Cuts `s` to at most `max_chars` characters without splitting a code point.
pub fn truncate_chars(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => s[..idx].to_string(),
        None => s.to_string(),
    }
}

/// Nearest string form of a JSON leaf; `None` for null and blank strings.
pub fn coerce_string(v: &Value) -> Option<String> {
    let s = match v {
        Value::Null => return None,
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(_) | Value::Object(_) => v.to_string(),
    };
    if s.trim().is_empty() {
        None
    } else {
        Some(s)
    }
}

/// Array members coerced to strings; anything that is not an array becomes empty.
pub fn coerce_string_list(v: Option<&Value>) -> Vec<String> {
    match v {
        Some(Value::Array(items)) => items.iter().filter_map(coerce_string).collect(),
        _ => Vec::new(),
    }
}

pub fn coerce_object(v: Option<&Value>) -> Map<String, Value> {
    match v {
        Some(Value::Object(map)) => map.clone(),
        _ => Map::new(),
    }
}

/// Scalar text field; missing or null becomes "", other values are stringified.
pub fn coerce_text(v: Option<&Value>) -> String {
    match v {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Looks a key up under each spelling the oracle is known to use.
pub fn lookup<'a>(map: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().find_map(|k| map.get(*k))
}
