pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::agents;
use crate::history;
use crate::interview::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Interview simulation
        .route(
            "/api/human_interview/start",
            post(handlers::handle_human_start),
        )
        .route(
            "/api/human_interview/answer",
            post(handlers::handle_human_answer),
        )
        .route("/api/interview/start", post(handlers::handle_hr_start))
        .route("/api/interview/answer", post(handlers::handle_hr_answer))
        // One-shot agents
        .route(
            "/api/analyze/resume/text",
            post(agents::resume::handle_analyze_text),
        )
        .route(
            "/api/analyze/resume/file",
            post(agents::resume::handle_analyze_file),
        )
        .route(
            "/api/review/contract",
            post(agents::contract::handle_review_contract),
        )
        .route(
            "/api/generate/document",
            post(agents::docs::handle_generate_document),
        )
        .route(
            "/api/workflow/execute",
            post(agents::workflow::handle_execute_workflow),
        )
        // History
        .route("/api/history/:user_id", get(history::handle_get_history))
        .with_state(state)
}
