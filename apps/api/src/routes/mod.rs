pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::feedback::handlers as feedback;
use crate::interview::handlers as interview;
use crate::prep::handlers as prep;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Preparation
        .route("/api/v1/prep", post(prep::handle_prep))
        .route("/api/v1/questions", get(prep::handle_get_questions))
        // Live interviews
        .route("/api/v1/interviews", post(interview::handle_start_interview))
        .route(
            "/api/v1/interviews/:id",
            get(interview::handle_get_interview).delete(interview::handle_discard_interview),
        )
        .route(
            "/api/v1/interviews/:id/answers",
            post(interview::handle_record_answer),
        )
        .route(
            "/api/v1/interviews/:id/restart",
            post(interview::handle_restart_interview),
        )
        .route(
            "/api/v1/interviews/:id/save",
            post(interview::handle_save_interview),
        )
        // Stored sessions
        .route("/api/v1/sessions", get(interview::handle_list_sessions))
        .route("/api/v1/sessions/:file", get(interview::handle_get_session))
        .route(
            "/api/v1/sessions/:file/resume",
            post(interview::handle_resume_session),
        )
        .route(
            "/api/v1/sessions/:file/feedback",
            post(feedback::handle_session_feedback),
        )
        // Feedback
        .route("/api/v1/feedback", post(feedback::handle_score_answers))
        .route(
            "/api/v1/feedback/answer",
            post(feedback::handle_analyze_answer),
        )
        .route("/api/v1/reports", get(feedback::handle_list_reports))
        .route("/api/v1/reports/:file", get(feedback::handle_get_report))
        .route("/api/v1/progress", get(feedback::handle_progress))
        .with_state(state)
}
