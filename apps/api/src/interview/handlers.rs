//! Axum route handlers for live interviews and stored sessions.

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::interview::archive::{PersistedSession, SessionStatus};
use crate::interview::session::{CurrentQuestion, RecordedAnswer, Session};
use crate::prep::questions::{load_question_set, QuestionSource};
use crate::state::AppState;
use crate::store::naming::SESSION_PREFIX;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct StartInterviewRequest {
    /// Questions to ask. When absent the stored question set is used.
    pub questions: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
pub struct AnswerRequest {
    pub answer: String,
}

#[derive(Debug, Deserialize)]
pub struct SessionListQuery {
    /// Only the most recent `limit` sessions.
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct QuestionView {
    pub index: usize,
    /// 1-based, for display.
    pub number: usize,
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct InterviewStateResponse {
    pub interview_id: Uuid,
    pub total_questions: usize,
    pub answered: usize,
    pub complete: bool,
    /// `None` once every question has been answered.
    pub current_question: Option<QuestionView>,
}

#[derive(Debug, Serialize)]
pub struct StartInterviewResponse {
    #[serde(flatten)]
    pub interview: InterviewStateResponse,
    pub question_source: QuestionSource,
}

#[derive(Debug, Serialize)]
pub struct AnswerResponse {
    pub recorded: RecordedAnswer,
    #[serde(flatten)]
    pub interview: InterviewStateResponse,
}

#[derive(Debug, Serialize)]
pub struct SaveResponse {
    pub session_file: String,
    pub status: SessionStatus,
    pub answered: usize,
}

#[derive(Debug, Serialize)]
pub struct SessionListResponse {
    pub sessions: Vec<String>,
}

fn parse_start_request(body: &[u8]) -> Result<StartInterviewRequest, AppError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(StartInterviewRequest::default());
    }
    serde_json::from_slice(body)
        .map_err(|e| AppError::Validation(format!("Invalid interview request: {e}")))
}

fn interview_state(interview_id: Uuid, session: &Session) -> InterviewStateResponse {
    let current_question = match session.current() {
        CurrentQuestion::Question { index, text } => Some(QuestionView {
            index,
            number: index + 1,
            text: text.to_string(),
        }),
        CurrentQuestion::Complete => None,
    };

    InterviewStateResponse {
        interview_id,
        total_questions: session.total(),
        answered: session.cursor(),
        complete: session.is_complete(),
        current_question,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Live interviews
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/interviews
///
/// Starts an interview from the questions in the body, or from the stored question set
/// (falling back to the sample questions) when the body is empty or carries none.
/// A body that is not a valid request is rejected with 400.
pub async fn handle_start_interview(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<StartInterviewResponse>, AppError> {
    let request = parse_start_request(&body)?;

    let (questions, question_source) = match request.questions {
        Some(questions) => {
            if questions.iter().any(|q| q.trim().is_empty()) {
                return Err(AppError::Validation("questions cannot be blank".to_string()));
            }
            (questions, QuestionSource::Provided)
        }
        None => {
            let set = load_question_set(&state.store)?;
            (set.questions, set.source)
        }
    };

    let session = Session::new(questions);
    let interview = interview_state(Uuid::nil(), &session);
    let interview_id = state.sessions.insert(session).await;
    info!(
        "Started interview {interview_id} with {} questions",
        interview.total_questions
    );

    Ok(Json(StartInterviewResponse {
        interview: InterviewStateResponse {
            interview_id,
            ..interview
        },
        question_source,
    }))
}

/// GET /api/v1/interviews/:id
pub async fn handle_get_interview(
    State(state): State<AppState>,
    Path(interview_id): Path<Uuid>,
) -> Result<Json<InterviewStateResponse>, AppError> {
    let session = state.sessions.get(interview_id).await?;
    let session = session.lock().await;
    Ok(Json(interview_state(interview_id, &session)))
}

/// POST /api/v1/interviews/:id/answers
///
/// Records an answer to the current question. 409 once the interview is complete.
pub async fn handle_record_answer(
    State(state): State<AppState>,
    Path(interview_id): Path<Uuid>,
    Json(request): Json<AnswerRequest>,
) -> Result<Json<AnswerResponse>, AppError> {
    let answer = request.answer.trim();
    if answer.is_empty() {
        return Err(AppError::Validation("answer cannot be empty".to_string()));
    }

    let session = state.sessions.get(interview_id).await?;
    let mut session = session.lock().await;
    let recorded = session.record(answer)?.clone();

    Ok(Json(AnswerResponse {
        recorded,
        interview: interview_state(interview_id, &session),
    }))
}

/// POST /api/v1/interviews/:id/restart
pub async fn handle_restart_interview(
    State(state): State<AppState>,
    Path(interview_id): Path<Uuid>,
) -> Result<Json<InterviewStateResponse>, AppError> {
    let session = state.sessions.get(interview_id).await?;
    let mut session = session.lock().await;
    session.restart();
    info!("Restarted interview {interview_id}");
    Ok(Json(interview_state(interview_id, &session)))
}

/// POST /api/v1/interviews/:id/save
///
/// Persists the interview as it stands: `completed` if every question was answered,
/// `paused` otherwise. The interview stays live.
pub async fn handle_save_interview(
    State(state): State<AppState>,
    Path(interview_id): Path<Uuid>,
) -> Result<Json<SaveResponse>, AppError> {
    let session = state.sessions.get(interview_id).await?;
    let session = session.lock().await;
    let saved = state.archive.save_session(&session)?;

    Ok(Json(SaveResponse {
        session_file: saved.session_file,
        status: saved.status,
        answered: session.cursor(),
    }))
}

/// DELETE /api/v1/interviews/:id
pub async fn handle_discard_interview(
    State(state): State<AppState>,
    Path(interview_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if state.sessions.remove(interview_id).await {
        info!("Discarded interview {interview_id}");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("Interview {interview_id} not found")))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Stored sessions
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/sessions?limit=N
///
/// Session identifiers, oldest first. With `limit`, only the most recent N.
pub async fn handle_list_sessions(
    State(state): State<AppState>,
    Query(query): Query<SessionListQuery>,
) -> Result<Json<SessionListResponse>, AppError> {
    let mut sessions = state.archive.list_sessions(SESSION_PREFIX)?;
    if let Some(limit) = query.limit {
        let skip = sessions.len().saturating_sub(limit);
        sessions.drain(..skip);
    }
    Ok(Json(SessionListResponse { sessions }))
}

/// GET /api/v1/sessions/:file
pub async fn handle_get_session(
    State(state): State<AppState>,
    Path(session_file): Path<String>,
) -> Result<Json<PersistedSession>, AppError> {
    Ok(Json(state.archive.load_session(&session_file)?))
}

/// POST /api/v1/sessions/:file/resume
///
/// Rebuilds a live interview from a stored session, positioned after its last answer.
pub async fn handle_resume_session(
    State(state): State<AppState>,
    Path(session_file): Path<String>,
) -> Result<Json<InterviewStateResponse>, AppError> {
    let session = state.archive.load_session(&session_file)?.into_session()?;
    let snapshot = interview_state(Uuid::nil(), &session);
    let interview_id = state.sessions.insert(session).await;
    info!(
        "Resumed {session_file} as interview {interview_id} at question {}",
        snapshot.answered + 1
    );

    Ok(Json(InterviewStateResponse {
        interview_id,
        ..snapshot
    }))
}
