//! Axum route handlers for interview preparation.

use axum::{extract::State, Json};

use crate::errors::AppError;
use crate::prep::pipeline::{run_prep, PrepOutcome};
use crate::prep::questions::{load_question_set, QuestionRequest, QuestionSet};
use crate::state::AppState;

/// POST /api/v1/prep
///
/// Researches the company, generates questions and stores both.
pub async fn handle_prep(
    State(state): State<AppState>,
    Json(request): Json<QuestionRequest>,
) -> Result<Json<PrepOutcome>, AppError> {
    let outcome = run_prep(&state.store, state.llm.as_ref(), &request).await?;
    Ok(Json(outcome))
}

/// GET /api/v1/questions
///
/// The stored question set, or the sample questions when none is usable.
pub async fn handle_get_questions(
    State(state): State<AppState>,
) -> Result<Json<QuestionSet>, AppError> {
    Ok(Json(load_question_set(&state.store)?))
}
