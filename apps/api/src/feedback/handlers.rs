//! Axum route handlers for the Feedback API.

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::errors::AppError;
use crate::feedback::progress::{summarize, ProgressSummary};
use crate::feedback::report::{FeedbackReport, FeedbackReportDocument};
use crate::feedback::scorer::{analyze_answer, score_answers, AnswerAnalysis, AnsweredQuestion};
use crate::interview::archive::ReportSave;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct SessionFeedbackResponse {
    pub report_id: String,
    /// `"saved"`, or `"already_exists"` when an earlier report for the session was kept.
    pub outcome: &'static str,
    pub session_file: String,
    pub feedback_report: FeedbackReport,
}

#[derive(Debug, Deserialize)]
pub struct ScoreAnswersRequest {
    pub answers: Vec<AnsweredQuestion>,
}

#[derive(Debug, Serialize)]
pub struct ScoreAnswersResponse {
    pub report_id: String,
    pub feedback_report: FeedbackReport,
}

#[derive(Debug, Serialize)]
pub struct ReportListResponse {
    pub reports: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct ReportDetailResponse {
    pub report_id: String,
    pub session_file: Option<String>,
    pub analysis_timestamp: Option<NaiveDateTime>,
    pub feedback_report: FeedbackReport,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/sessions/:file/feedback
///
/// Scores a stored session and saves the report next to it. If a report for the session
/// already exists it is returned as is and no scoring call is made.
pub async fn handle_session_feedback(
    State(state): State<AppState>,
    Path(session_file): Path<String>,
) -> Result<Json<SessionFeedbackResponse>, AppError> {
    let persisted = state.archive.load_session(&session_file)?;

    if let Some((report_id, existing)) = state.archive.find_report_for_session(&session_file)? {
        info!("Reusing existing report {report_id} for {session_file}");
        return Ok(Json(SessionFeedbackResponse {
            report_id,
            outcome: "already_exists",
            session_file,
            feedback_report: existing.feedback_report,
        }));
    }

    let answers: Vec<AnsweredQuestion> = persisted
        .recorded_answers
        .iter()
        .map(AnsweredQuestion::from)
        .collect();
    let report = score_answers(state.llm.as_ref(), &answers).await;
    let saved = state.archive.save_report(&report, &session_file)?;

    // A concurrent request may have saved first; report what is actually on disk.
    let feedback_report = match &saved {
        ReportSave::Saved(_) => report,
        ReportSave::AlreadyExists(id) => {
            state.archive.load_report(id)?.feedback_report
        }
    };

    Ok(Json(SessionFeedbackResponse {
        report_id: saved.report_id().to_string(),
        outcome: saved.outcome(),
        session_file,
        feedback_report,
    }))
}

/// POST /api/v1/feedback
///
/// Scores answers supplied in the request body and saves a standalone report.
pub async fn handle_score_answers(
    State(state): State<AppState>,
    Json(request): Json<ScoreAnswersRequest>,
) -> Result<Json<ScoreAnswersResponse>, AppError> {
    let report = score_answers(state.llm.as_ref(), &request.answers).await;
    let report_id = state.archive.save_standalone_report(&report)?;

    Ok(Json(ScoreAnswersResponse {
        report_id,
        feedback_report: report,
    }))
}

/// POST /api/v1/feedback/answer
pub async fn handle_analyze_answer(
    State(state): State<AppState>,
    Json(request): Json<AnsweredQuestion>,
) -> Result<Json<AnswerAnalysis>, AppError> {
    if request.question.trim().is_empty() || request.answer.trim().is_empty() {
        return Err(AppError::Validation(
            "question and answer cannot be empty".to_string(),
        ));
    }

    Ok(Json(analyze_answer(state.llm.as_ref(), &request).await))
}

/// GET /api/v1/reports
pub async fn handle_list_reports(
    State(state): State<AppState>,
) -> Result<Json<ReportListResponse>, AppError> {
    Ok(Json(ReportListResponse {
        reports: state.archive.list_reports()?,
    }))
}

/// GET /api/v1/reports/:file
pub async fn handle_get_report(
    State(state): State<AppState>,
    Path(report_id): Path<String>,
) -> Result<Json<ReportDetailResponse>, AppError> {
    let FeedbackReportDocument {
        session_file,
        analysis_timestamp,
        feedback_report,
    } = state.archive.load_report(&report_id)?;

    Ok(Json(ReportDetailResponse {
        report_id,
        session_file,
        analysis_timestamp,
        feedback_report,
    }))
}

/// GET /api/v1/progress
///
/// Unreadable reports are skipped so one corrupt file does not hide the rest.
pub async fn handle_progress(
    State(state): State<AppState>,
) -> Result<Json<ProgressSummary>, AppError> {
    let mut documents = Vec::new();
    for report_id in state.archive.list_reports()? {
        match state.archive.load_report(&report_id) {
            Ok(document) => documents.push((report_id, document)),
            Err(AppError::Format(msg)) | Err(AppError::NotFound(msg)) => {
                warn!("Skipping report {report_id} in progress summary: {msg}");
            }
            Err(e) => return Err(e),
        }
    }

    Ok(Json(summarize(documents)))
}
