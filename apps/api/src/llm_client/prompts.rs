// Shared prompt fragments.
// Each feature module that calls the LLM defines its own prompts.rs alongside it.

/// Appended to every system prompt that expects a JSON object back.
pub const JSON_OBJECT_ONLY: &str = "You MUST respond with a single valid JSON object only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Appended to every system prompt that expects a JSON array back.
pub const JSON_ARRAY_ONLY: &str = "You MUST respond with a single valid JSON array only. \
    Do NOT include any text outside the JSON array. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Joins a role description with one of the JSON-only fragments above.
pub fn system_prompt(role: &str, json_rule: &str) -> String {
    format!("{role}\n\n{json_rule}")
}
