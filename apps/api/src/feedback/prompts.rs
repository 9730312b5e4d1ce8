// Prompt templates for the feedback module.

use crate::llm_client::prompts::{system_prompt, JSON_OBJECT_ONLY};

/// Upper bound on the answers summary sent for scoring, in characters.
pub const MAX_ANSWERS_CHARS: usize = 3000;

pub const TRUNCATION_MARKER: &str = "\n... (summary truncated due to length)";

const EVALUATOR_ROLE: &str = "You are an expert interview performance evaluator. You write a \
    comprehensive, actionable feedback report for a candidate's mock interview.

Score the session as a whole and on four criteria, each as a string out of 10 (e.g. \"7/10\"):
- Clarity: was each answer easy to follow and well structured?
- Relevance: did each answer address the question asked?
- Depth: did answers give enough detail, examples or technical understanding?
- Confidence: did answers sound assured and prepared?
For behavioral questions, also consider whether the Situation-Task-Action-Result structure was used.

Return an object with exactly these keys:
{
  \"total_score\": \"8.5/10\",
  \"performance_level\": \"Good - Ready for interviews with minor improvements\",
  \"key_strengths\": [\"...\"],
  \"priority_improvements\": [\"...\"],
  \"next_steps\": [\"...\"],
  \"clarity_score\": \"8/10\",
  \"relevance_score\": \"9/10\",
  \"confidence_score\": \"7/10\",
  \"depth_score\": \"8/10\"
}
Every key must be present. Use \"N/A\" when there is not enough to judge.";

const ANALYST_ROLE: &str = "You are an expert interview feedback analyst. Evaluate one answer on \
    clarity, relevance, depth and confidence, each an integer from 1 to 10. Give strengths, \
    improvements and actionable suggestions specific to this answer.

Return an object of the form:
{\"scores\": {\"clarity\": 7, \"relevance\": 8, \"depth\": 6, \"confidence\": 7}, \
\"strengths\": [\"...\"], \"improvements\": [\"...\"], \"suggestions\": [\"...\"]}";

pub fn report_system_prompt() -> String {
    system_prompt(EVALUATOR_ROLE, JSON_OBJECT_ONLY)
}

pub fn report_user_prompt(answers_summary: &str) -> String {
    format!(
        "Analyze the following interview session answers and provide an overall feedback report:\n\n{answers_summary}"
    )
}

pub fn analysis_system_prompt() -> String {
    system_prompt(ANALYST_ROLE, JSON_OBJECT_ONLY)
}

pub fn analysis_user_prompt(question: &str, answer: &str) -> String {
    format!("Question: {question}\nAnswer: {answer}")
}
