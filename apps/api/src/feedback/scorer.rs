//! Calls the text-completion collaborator to score answers.
//!
//! Neither entry point fails: a transport error or an unreadable reply degrades to a
//! structurally valid result carrying the reason.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::feedback::assembly::assemble_report;
use crate::feedback::prompts::{
    analysis_system_prompt, analysis_user_prompt, report_system_prompt, report_user_prompt,
    MAX_ANSWERS_CHARS, TRUNCATION_MARKER,
};
use crate::feedback::report::FeedbackReport;
use crate::interview::session::RecordedAnswer;
use crate::llm_client::extract::extract_json_object;
use crate::llm_client::TextCompletion;

/// A question paired with the candidate's answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnsweredQuestion {
    pub question: String,
    pub answer: String,
}

impl From<&RecordedAnswer> for AnsweredQuestion {
    fn from(recorded: &RecordedAnswer) -> Self {
        Self {
            question: recorded.question.clone(),
            answer: recorded.answer.clone(),
        }
    }
}

/// Renders the answers as numbered Q/A blocks, cut at `MAX_ANSWERS_CHARS` characters.
pub fn answers_summary(answers: &[AnsweredQuestion]) -> String {
    let summary = answers
        .iter()
        .enumerate()
        .map(|(i, qa)| {
            format!(
                "--- Question {} ---\nQ: {}\nA: {}\n",
                i + 1,
                qa.question,
                qa.answer
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    match summary.char_indices().nth(MAX_ANSWERS_CHARS) {
        Some((cut, _)) => {
            debug!("Answers summary truncated to {MAX_ANSWERS_CHARS} characters");
            format!("{}{TRUNCATION_MARKER}", &summary[..cut])
        }
        None => summary,
    }
}

pub async fn score_answers(llm: &dyn TextCompletion, answers: &[AnsweredQuestion]) -> FeedbackReport {
    if answers.is_empty() {
        info!("No answers to score; skipping the scoring call");
        return FeedbackReport::no_answers();
    }

    let prompt = report_user_prompt(&answers_summary(answers));
    match llm.complete(&prompt, &report_system_prompt()).await {
        Ok(raw) => {
            debug!("Scoring reply: {} chars", raw.len());
            assemble_report(&raw)
        }
        Err(e) => {
            warn!("Scoring call failed: {e}");
            FeedbackReport::failure(
                "LLM Failure",
                &format!("The feedback service could not be reached: {e}"),
            )
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerScores {
    pub clarity: Option<u8>,
    pub relevance: Option<u8>,
    pub depth: Option<u8>,
    pub confidence: Option<u8>,
}

/// Feedback on a single answer. Scores are `None` when the model gave none usable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerAnalysis {
    pub scores: AnswerScores,
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
    pub suggestions: Vec<String>,
}

impl AnswerAnalysis {
    fn failed(reason: String) -> Self {
        Self {
            improvements: vec![reason],
            ..Self::default()
        }
    }
}

pub async fn analyze_answer(llm: &dyn TextCompletion, qa: &AnsweredQuestion) -> AnswerAnalysis {
    let prompt = analysis_user_prompt(&qa.question, &qa.answer);
    let raw = match llm.complete(&prompt, &analysis_system_prompt()).await {
        Ok(raw) => raw,
        Err(e) => {
            warn!("Answer analysis call failed: {e}");
            return AnswerAnalysis::failed(format!("The analysis service could not be reached: {e}"));
        }
    };

    let Some(parsed) = extract_json_object(&raw) else {
        warn!("Answer analysis reply contained no usable JSON object");
        return AnswerAnalysis::failed("The analysis response could not be read.".to_string());
    };

    let score = |key: &str| {
        parsed
            .get("scores")
            .and_then(|s| s.get(key))
            .and_then(|v| v.as_f64())
            .filter(|n| (0.0..=10.0).contains(n))
            .map(|n| n.round() as u8)
    };
    let list = |key: &str| -> Vec<String> {
        match parsed.get(key) {
            Some(serde_json::Value::Array(items)) => items
                .iter()
                .map(|v| v.as_str().map_or_else(|| v.to_string(), str::to_string))
                .collect(),
            Some(serde_json::Value::String(s)) if !s.is_empty() => vec![s.clone()],
            _ => Vec::new(),
        }
    };

    AnswerAnalysis {
        scores: AnswerScores {
            clarity: score("clarity"),
            relevance: score("relevance"),
            depth: score("depth"),
            confidence: score("confidence"),
        },
        strengths: list("strengths"),
        improvements: list("improvements"),
        suggestions: list("suggestions"),
    }
}
