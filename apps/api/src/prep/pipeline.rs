//! Two-step preparation pipeline: company research, then question generation.
//! Each step persists its output. The question step reads its company context back from
//! `research_data.json`, and an interview can be started from the stored set later.

use serde::Serialize;
use tracing::info;

use crate::errors::AppError;
use crate::llm_client::TextCompletion;
use crate::prep::questions::{
    generate_questions, save_question_set, QuestionOrigin, QuestionRequest,
};
use crate::prep::research::{load_research, lookup_company, save_research, CompanyProfile};
use crate::store::FileStore;

#[derive(Debug, Clone, Serialize)]
pub struct PrepOutcome {
    pub company: CompanyProfile,
    pub questions: Vec<String>,
    pub origin: QuestionOrigin,
}

pub async fn run_prep(
    store: &FileStore,
    llm: &dyn TextCompletion,
    request: &QuestionRequest,
) -> Result<PrepOutcome, AppError> {
    request.validate()?;

    info!("Prep step 1/2: researching {}", request.company_name);
    save_research(store, &lookup_company(&request.company_name))?;

    let company = load_research(store)?;
    info!(
        "Prep step 2/2: generating {} questions for {}",
        request.num_questions, request.role
    );
    let generated = generate_questions(llm, &company, request).await;
    save_question_set(store, &generated.questions)?;

    Ok(PrepOutcome {
        company,
        questions: generated.questions,
        origin: generated.origin,
    })
}
