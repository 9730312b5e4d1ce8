//! Interview question generation and the stored question set.
//!
//! Generation asks the collaborator for a JSON array of strings. Any failure falls back to
//! template questions built from the role, company and requested question types, so a caller
//! always gets a usable list.

use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::errors::AppError;
use crate::llm_client::extract::extract_json_array;
use crate::llm_client::TextCompletion;
use crate::prep::prompts::{questions_system_prompt, questions_user_prompt};
use crate::prep::research::CompanyProfile;
use crate::store::naming::QUESTIONS_FILE;
use crate::store::{FileStore, StoreError};

pub const MAX_QUESTIONS: usize = 20;

/// Used when no question set has been stored, or the stored one cannot be read.
pub const SAMPLE_QUESTIONS: [&str; 5] = [
    "Tell me about your most significant project and your role in it.",
    "How do you approach learning new programming languages or frameworks?",
    "Describe your experience with cloud platforms like AWS or Azure.",
    "What motivates you to work in software development?",
    "How do you handle code reviews, both giving and receiving?",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    Technical,
    Behavioral,
    CompanySpecific,
}

impl QuestionType {
    fn describe(self, company_name: &str) -> String {
        match self {
            QuestionType::Technical => "technical".to_string(),
            QuestionType::Behavioral => "behavioral".to_string(),
            QuestionType::CompanySpecific => format!("company-specific for {company_name}"),
        }
    }

    /// Template questions of this type placed ahead of the general ones for `n` questions.
    fn template_share(self, n: usize) -> usize {
        match self {
            QuestionType::CompanySpecific => (n / 4).max(1),
            _ => (n / 2).max(1),
        }
    }
}

fn default_num_questions() -> usize {
    5
}

#[derive(Debug, Clone, Deserialize)]
pub struct QuestionRequest {
    pub company_name: String,
    pub role: String,
    #[serde(default = "default_num_questions")]
    pub num_questions: usize,
    /// Empty means technical and behavioral.
    #[serde(default)]
    pub question_types: Vec<QuestionType>,
}

impl QuestionRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.company_name.trim().is_empty() {
            return Err(AppError::Validation("company_name cannot be empty".to_string()));
        }
        if self.role.trim().is_empty() {
            return Err(AppError::Validation("role cannot be empty".to_string()));
        }
        if !(1..=MAX_QUESTIONS).contains(&self.num_questions) {
            return Err(AppError::Validation(format!(
                "num_questions must be between 1 and {MAX_QUESTIONS}"
            )));
        }
        Ok(())
    }

    fn types(&self) -> Vec<QuestionType> {
        if self.question_types.is_empty() {
            vec![QuestionType::Technical, QuestionType::Behavioral]
        } else {
            self.question_types.clone()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionOrigin {
    Model,
    Template,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedQuestions {
    pub questions: Vec<String>,
    pub origin: QuestionOrigin,
}

pub async fn generate_questions(
    llm: &dyn TextCompletion,
    profile: &CompanyProfile,
    request: &QuestionRequest,
) -> GeneratedQuestions {
    let types = request.types();
    let mix = types
        .iter()
        .map(|t| t.describe(&request.company_name))
        .collect::<Vec<_>>()
        .join(", ");

    let system = questions_system_prompt(&request.role, profile);
    let prompt = questions_user_prompt(request.num_questions, &mix);

    match llm.complete(&prompt, &system).await {
        Ok(raw) => {
            debug!("Question generation reply: {} chars", raw.len());
            let questions = parse_questions(&raw, request.num_questions);
            if !questions.is_empty() {
                info!("Generated {} questions for {}", questions.len(), request.role);
                return GeneratedQuestions {
                    questions,
                    origin: QuestionOrigin::Model,
                };
            }
            warn!("Question generation reply held no usable questions; using templates");
        }
        Err(e) => warn!("Question generation call failed: {e}; using templates"),
    }

    GeneratedQuestions {
        questions: template_questions(request, &types),
        origin: QuestionOrigin::Template,
    }
}

/// Non-blank strings from the reply's JSON array, at most `limit` of them.
fn parse_questions(raw: &str, limit: usize) -> Vec<String> {
    extract_json_array(raw)
        .unwrap_or_default()
        .into_iter()
        .filter_map(|item| match item {
            Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
            _ => None,
        })
        .take(limit)
        .collect()
}

/// Deterministic questions built from the request. Each requested type contributes its share
/// first; remaining slots are filled from the rest of the requested pools, then general
/// questions, then the pools of types not requested.
pub fn template_questions(request: &QuestionRequest, types: &[QuestionType]) -> Vec<String> {
    let n = request.num_questions;
    let role = request.role.trim();
    let company = request.company_name.trim();

    let mut pools: Vec<(QuestionType, Vec<String>)> = [
        QuestionType::Technical,
        QuestionType::Behavioral,
        QuestionType::CompanySpecific,
    ]
    .into_iter()
    .map(|t| (t, template_pool(t, role, company)))
    .collect();
    // Requested types first, in request order.
    pools.sort_by_key(|(t, _)| types.iter().position(|r| r == t).unwrap_or(usize::MAX));

    let general = vec![
        format!("Tell me about your background in {role}"),
        format!("Why are you interested in this {role} position?"),
        "What are your career goals for the next 5 years?".to_string(),
        "Describe your ideal work environment".to_string(),
        "How do you handle feedback and criticism?".to_string(),
        "What motivates you in your daily work?".to_string(),
        "What's your greatest professional strength?".to_string(),
        "Describe a challenging project you worked on".to_string(),
        "How do you handle working under pressure?".to_string(),
        "Tell me about a project you're particularly proud of".to_string(),
    ];

    let requested = |t: &QuestionType| types.contains(t);
    let mut ordered = Vec::new();
    for (t, pool) in pools.iter().filter(|(t, _)| requested(t)) {
        ordered.extend(pool.iter().take(t.template_share(n)).cloned());
    }
    for (t, pool) in pools.iter().filter(|(t, _)| requested(t)) {
        ordered.extend(pool.iter().skip(t.template_share(n)).cloned());
    }
    ordered.extend(general);
    for (_, pool) in pools.iter().filter(|(t, _)| !requested(t)) {
        ordered.extend(pool.iter().cloned());
    }

    let mut questions: Vec<String> = Vec::with_capacity(n);
    for question in ordered {
        if questions.len() == n {
            break;
        }
        if !questions.contains(&question) {
            questions.push(question);
        }
    }
    questions
}

fn template_pool(question_type: QuestionType, role: &str, company: &str) -> Vec<String> {
    match question_type {
        QuestionType::Technical => vec![
            format!(
                "Explain how you would architect a {} solution for {company}",
                role.to_lowercase()
            ),
            "Walk me through your debugging process for a complex issue".to_string(),
            "Describe a challenging technical problem you solved recently".to_string(),
            "How do you stay updated with new technologies in your field?".to_string(),
            "What's your approach to code reviews and quality assurance?".to_string(),
        ],
        QuestionType::Behavioral => vec![
            format!("Why do you want to work at {company} specifically?"),
            "Tell me about a time you had to work with a difficult team member".to_string(),
            "Describe a situation where you had to learn something new quickly".to_string(),
            "How do you handle competing priorities and tight deadlines?".to_string(),
            "Give an example of when you had to convince others of your idea".to_string(),
        ],
        QuestionType::CompanySpecific => vec![
            format!("How would you contribute to {company}'s mission?"),
            format!("What do you know about {company}'s recent developments?"),
            format!("How do you see yourself fitting into {company}'s culture?"),
        ],
    }
}

/// `interview_questions.json` on disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionSetRecord {
    #[serde(default)]
    pub timestamp: Option<NaiveDateTime>,
    pub questions: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionSource {
    Stored,
    Fallback,
    /// Supplied by the caller when starting an interview.
    Provided,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuestionSet {
    pub questions: Vec<String>,
    pub source: QuestionSource,
}

impl QuestionSet {
    fn sample() -> Self {
        Self {
            questions: SAMPLE_QUESTIONS.iter().map(|q| q.to_string()).collect(),
            source: QuestionSource::Fallback,
        }
    }
}

pub fn save_question_set(store: &FileStore, questions: &[String]) -> Result<(), AppError> {
    let record = QuestionSetRecord {
        timestamp: Some(Local::now().naive_local()),
        questions: questions.to_vec(),
    };
    store.write_json(QUESTIONS_FILE, &record)?;
    info!("Saved {} interview questions", questions.len());
    Ok(())
}

/// The stored question set. A missing or unreadable set yields the sample questions;
/// only I/O failures are errors.
pub fn load_question_set(store: &FileStore) -> Result<QuestionSet, AppError> {
    match store.read_json::<QuestionSetRecord>(QUESTIONS_FILE) {
        Ok(Some(record)) => {
            debug!("Loaded {} stored questions", record.questions.len());
            Ok(QuestionSet {
                questions: record.questions,
                source: QuestionSource::Stored,
            })
        }
        Ok(None) => {
            info!("No stored question set; using sample questions");
            Ok(QuestionSet::sample())
        }
        Err(StoreError::Format { source, .. }) => {
            warn!("Stored question set is unreadable ({source}); using sample questions");
            Ok(QuestionSet::sample())
        }
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::testing::StubCompletion;
    use crate::prep::research::lookup_company;

    fn request(n: usize, types: Vec<QuestionType>) -> QuestionRequest {
        QuestionRequest {
            company_name: "Google".to_string(),
            role: "Software Engineer".to_string(),
            num_questions: n,
            question_types: types,
        }
    }

    #[test]
    fn test_validate_bounds() {
        assert!(request(1, vec![]).validate().is_ok());
        assert!(request(20, vec![]).validate().is_ok());
        assert!(matches!(
            request(0, vec![]).validate(),
            Err(AppError::Validation(_))
        ));
        assert!(request(21, vec![]).validate().is_err());
        let mut blank = request(5, vec![]);
        blank.role = " ".to_string();
        assert!(blank.validate().is_err());
    }

    #[test]
    fn test_request_defaults() {
        let req: QuestionRequest =
            serde_json::from_str(r#"{"company_name": "Netflix", "role": "Data Scientist"}"#)
                .unwrap();
        assert_eq!(req.num_questions, 5);
        assert_eq!(
            req.types(),
            vec![QuestionType::Technical, QuestionType::Behavioral]
        );

        let req: QuestionRequest = serde_json::from_str(
            r#"{"company_name": "N", "role": "R", "question_types": ["company_specific"]}"#,
        )
        .unwrap();
        assert_eq!(req.types(), vec![QuestionType::CompanySpecific]);
    }

    #[test]
    fn test_template_questions_fill_exactly_n() {
        for n in 1..=MAX_QUESTIONS {
            let req = request(n, vec![QuestionType::CompanySpecific]);
            let questions = template_questions(&req, &req.types());
            assert_eq!(questions.len(), n, "n = {n}");
        }
    }

    #[test]
    fn test_template_questions_mix_types() {
        let req = request(
            6,
            vec![
                QuestionType::Technical,
                QuestionType::Behavioral,
                QuestionType::CompanySpecific,
            ],
        );
        let questions = template_questions(&req, &req.types());
        assert_eq!(questions.len(), 6);
        assert_eq!(
            questions[0],
            "Explain how you would architect a software engineer solution for Google"
        );
        assert_eq!(questions[3], "Why do you want to work at Google specifically?");
    }

    #[tokio::test]
    async fn test_generate_uses_model_array() {
        let llm = StubCompletion::replying(
            "Here you go:\n[\"What is a mutex?\", \"  \", 42, \"Why Google?\", \"Extra?\"]",
        );
        let req = request(2, vec![]);
        let generated = generate_questions(&llm, &lookup_company("Google"), &req).await;

        assert_eq!(generated.origin, QuestionOrigin::Model);
        assert_eq!(
            generated.questions,
            vec!["What is a mutex?".to_string(), "Why Google?".to_string()]
        );
        assert!(llm.last_prompt().unwrap().contains("technical, behavioral"));
    }

    #[tokio::test]
    async fn test_generate_falls_back_on_unusable_reply() {
        let llm = StubCompletion::replying("{\"questions\": \"none\"}");
        let req = request(4, vec![]);
        let generated = generate_questions(&llm, &lookup_company("Google"), &req).await;
        assert_eq!(generated.origin, QuestionOrigin::Template);
        assert_eq!(generated.questions.len(), 4);
    }

    #[tokio::test]
    async fn test_generate_falls_back_on_failure() {
        let llm = StubCompletion::failing(529);
        let req = request(3, vec![QuestionType::Behavioral]);
        let generated = generate_questions(&llm, &lookup_company("Google"), &req).await;
        assert_eq!(generated.origin, QuestionOrigin::Template);
        assert_eq!(generated.questions, template_questions(&req, &req.types()));
    }

    #[test]
    fn test_question_set_round_trip_and_fallbacks() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();

        let missing = load_question_set(&store).unwrap();
        assert_eq!(missing.source, QuestionSource::Fallback);
        assert_eq!(missing.questions.len(), SAMPLE_QUESTIONS.len());

        let questions = vec!["Q1?".to_string(), "Q2?".to_string()];
        save_question_set(&store, &questions).unwrap();
        let stored = load_question_set(&store).unwrap();
        assert_eq!(stored.source, QuestionSource::Stored);
        assert_eq!(stored.questions, questions);

        store.write(QUESTIONS_FILE, "{\"questions\": \"oops\"}").unwrap();
        assert_eq!(
            load_question_set(&store).unwrap().source,
            QuestionSource::Fallback
        );
    }
}
