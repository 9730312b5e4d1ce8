//! Feedback report model.
//!
//! All five score fields are always present and always strings, even when the scoring call
//! failed: absent values take the documented default, never `null`.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

pub const SCORE_NOT_AVAILABLE: &str = "N/A";
pub const SCORE_ERROR: &str = "Error";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedbackReport {
    /// `"N/M"`, or `"N/A"` / `"Error"`.
    pub total_score: String,
    pub performance_level: String,
    pub key_strengths: Vec<String>,
    pub priority_improvements: Vec<String>,
    pub next_steps: Vec<String>,
    pub clarity_score: String,
    pub relevance_score: String,
    pub confidence_score: String,
    pub depth_score: String,
}

impl Default for FeedbackReport {
    fn default() -> Self {
        Self {
            total_score: SCORE_NOT_AVAILABLE.to_string(),
            performance_level: "Not Provided".to_string(),
            key_strengths: Vec::new(),
            priority_improvements: Vec::new(),
            next_steps: Vec::new(),
            clarity_score: SCORE_NOT_AVAILABLE.to_string(),
            relevance_score: SCORE_NOT_AVAILABLE.to_string(),
            confidence_score: SCORE_NOT_AVAILABLE.to_string(),
            depth_score: SCORE_NOT_AVAILABLE.to_string(),
        }
    }
}

impl FeedbackReport {
    /// A structurally valid report for when no usable feedback could be produced.
    /// Every score is `"Error"`; `reason` is surfaced in `priority_improvements`.
    pub fn failure(performance_level: &str, reason: &str) -> Self {
        Self {
            total_score: SCORE_ERROR.to_string(),
            performance_level: performance_level.to_string(),
            key_strengths: Vec::new(),
            priority_improvements: vec![reason.to_string()],
            next_steps: vec!["Try generating the feedback report again.".to_string()],
            clarity_score: SCORE_ERROR.to_string(),
            relevance_score: SCORE_ERROR.to_string(),
            confidence_score: SCORE_ERROR.to_string(),
            depth_score: SCORE_ERROR.to_string(),
        }
    }

    /// Report for a session in which nothing was answered. No scoring call is made.
    pub fn no_answers() -> Self {
        Self {
            total_score: "0/10".to_string(),
            performance_level: "No answers provided".to_string(),
            priority_improvements: vec!["No answers were recorded for analysis.".to_string()],
            next_steps: vec!["Complete a mock interview with answers.".to_string()],
            ..Self::default()
        }
    }

    pub(crate) fn score_mut(&mut self, key: &str) -> Option<&mut String> {
        match key {
            "total_score" => Some(&mut self.total_score),
            "clarity_score" => Some(&mut self.clarity_score),
            "relevance_score" => Some(&mut self.relevance_score),
            "confidence_score" => Some(&mut self.confidence_score),
            "depth_score" => Some(&mut self.depth_score),
            _ => None,
        }
    }

    pub(crate) fn list_mut(&mut self, key: &str) -> Option<&mut Vec<String>> {
        match key {
            "key_strengths" => Some(&mut self.key_strengths),
            "priority_improvements" => Some(&mut self.priority_improvements),
            "next_steps" => Some(&mut self.next_steps),
            _ => None,
        }
    }
}

pub const SCORE_KEYS: [&str; 5] = [
    "total_score",
    "clarity_score",
    "relevance_score",
    "confidence_score",
    "depth_score",
];

pub const LIST_KEYS: [&str; 3] = ["key_strengths", "priority_improvements", "next_steps"];

/// A report as written to disk, with the session it was derived from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackReportDocument {
    #[serde(default)]
    pub session_file: Option<String>,
    #[serde(default)]
    pub analysis_timestamp: Option<NaiveDateTime>,
    #[serde(default)]
    pub feedback_report: FeedbackReport,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_default_scores_are_not_available() {
        let mut report = FeedbackReport::default();
        for key in SCORE_KEYS {
            assert_eq!(report.score_mut(key).unwrap().as_str(), SCORE_NOT_AVAILABLE);
        }
        assert!(report.key_strengths.is_empty());
    }

    #[test]
    fn test_failure_marks_every_score() {
        let mut report = FeedbackReport::failure("JSON Format Error", "unreadable");
        for key in SCORE_KEYS {
            assert_eq!(report.score_mut(key).unwrap().as_str(), SCORE_ERROR);
        }
        assert_eq!(report.priority_improvements, vec!["unreadable".to_string()]);
    }

    #[test]
    fn test_serializes_all_nine_keys() {
        let value = serde_json::to_value(FeedbackReport::default()).unwrap();
        let map = value.as_object().unwrap();
        assert_eq!(map.len(), 9);
        for key in SCORE_KEYS.iter().chain(LIST_KEYS.iter()) {
            assert!(map.contains_key(*key), "missing {key}");
        }
    }

    #[test]
    fn test_partial_document_deserializes_with_defaults() {
        let doc: FeedbackReportDocument = serde_json::from_value(json!({
            "session_file": "interview_session_20250627_103045.json",
            "feedback_report": {"total_score": "6/10"}
        }))
        .unwrap();
        assert_eq!(doc.feedback_report.total_score, "6/10");
        assert_eq!(doc.feedback_report.depth_score, SCORE_NOT_AVAILABLE);
        assert!(doc.analysis_timestamp.is_none());
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        let report: FeedbackReport =
            serde_json::from_value(json!({"llm_error_message": "boom"})).unwrap();
        assert_eq!(report, FeedbackReport::default());
    }
}
