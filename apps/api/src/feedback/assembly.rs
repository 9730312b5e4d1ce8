//! Turns raw scoring text into a `FeedbackReport`. Never fails: unusable text yields
//! `FeedbackReport::failure`, partial objects are merged over the defaults.

use serde_json::{Map, Value};
use tracing::warn;

use crate::feedback::report::{FeedbackReport, LIST_KEYS, SCORE_KEYS, SCORE_NOT_AVAILABLE};
use crate::llm_client::extract::extract_json_object;

pub fn assemble_report(raw: &str) -> FeedbackReport {
    match extract_json_object(raw) {
        Some(parsed) => merge_over_defaults(&parsed),
        None => {
            warn!(
                "Scoring response contained no usable JSON object ({} chars)",
                raw.len()
            );
            FeedbackReport::failure(
                "JSON Format Error",
                "The feedback response could not be read as a report.",
            )
        }
    }
}

fn merge_over_defaults(parsed: &Map<String, Value>) -> FeedbackReport {
    let mut report = FeedbackReport::default();

    for key in SCORE_KEYS {
        if let (Some(value), Some(slot)) = (parsed.get(key), report.score_mut(key)) {
            *slot = normalize_score(value);
        }
    }

    for key in LIST_KEYS {
        if let (Some(value), Some(slot)) = (parsed.get(key), report.list_mut(key)) {
            *slot = normalize_list(value);
        }
    }

    match parsed.get("performance_level") {
        None | Some(Value::Null) => {}
        Some(Value::String(level)) => report.performance_level = level.clone(),
        Some(other) => report.performance_level = other.to_string(),
    }

    report
}

/// Numbers become `"<n>/10"`, strings pass through, anything else is `"N/A"`.
fn normalize_score(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => format!("{n}/10"),
        _ => SCORE_NOT_AVAILABLE.to_string(),
    }
}

/// Sequences pass through (items stringified); a truthy scalar becomes a one-element list and
/// a falsy one an empty list.
fn normalize_list(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items.iter().map(value_text).collect(),
        other if is_truthy(other) => vec![value_text(other)],
        _ => Vec::new(),
    }
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}
