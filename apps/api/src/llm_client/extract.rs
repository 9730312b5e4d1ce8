//! Extraction of JSON payloads from raw model text.
//!
//! Models wrap JSON in prose or code fences often enough that every parse site goes through
//! one policy: take the span from the first opening delimiter to the last closing delimiter
//! (inclusive) and parse exactly that. No span, or a span that does not parse, means the
//! response is unusable and the caller falls back to defaults.

use serde_json::{Map, Value};

/// Extracts the JSON object spanning the first `{` to the last `}`.
pub fn extract_json_object(raw: &str) -> Option<Map<String, Value>> {
    match extract_span(raw, '{', '}')? {
        Value::Object(map) => Some(map),
        _ => None,
    }
}

/// Extracts the JSON array spanning the first `[` to the last `]`.
pub fn extract_json_array(raw: &str) -> Option<Vec<Value>> {
    match extract_span(raw, '[', ']')? {
        Value::Array(items) => Some(items),
        _ => None,
    }
}

fn extract_span(raw: &str, open: char, close: char) -> Option<Value> {
    let start = raw.find(open)?;
    let end = raw.rfind(close)?;
    if end < start {
        return None;
    }
    serde_json::from_str(&raw[start..=end]).ok()
}
