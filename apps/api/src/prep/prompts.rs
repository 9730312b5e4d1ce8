// Prompt templates for question generation.

use crate::llm_client::prompts::{system_prompt, JSON_ARRAY_ONLY};
use crate::prep::research::CompanyProfile;

pub fn questions_system_prompt(role: &str, profile: &CompanyProfile) -> String {
    let interviewer = format!(
        "You are an expert interviewer for a {role} role at {name}.\n\
         Company culture: {culture}.\n\
         Company values: {values}.\n\
         Interview style: {style}.\n\
         Role requirements: {requirements}.",
        name = profile.name,
        culture = profile.culture,
        values = profile.values,
        style = profile.interview_style,
        requirements = profile.role_requirements,
    );
    system_prompt(&interviewer, JSON_ARRAY_ONLY)
}

pub fn questions_user_prompt(num_questions: usize, question_mix: &str) -> String {
    format!(
        "Generate exactly {num_questions} interview questions.\n\
         The questions must be a diverse mix of: {question_mix}.\n\
         Vary the difficulty (easy, medium, hard).\n\
         Return a JSON array of strings, e.g. [\"Question 1?\", \"Question 2?\"]."
    )
}
