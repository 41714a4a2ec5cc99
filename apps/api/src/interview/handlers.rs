//! Axum route handlers for the two interview workflows.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::interview::orchestrator::{AnswerOutcome, SessionOrchestrator};
use crate::interview::session::ExperienceTier;
use crate::state::AppState;

// ----------------------------------------------------------------------------
// Request / Response types
// ----------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct InterviewStartRequest {
    pub role: String,
    pub experience_level: String,
}

#[derive(Debug, Deserialize)]
pub struct InterviewAnswerRequest {
    pub session_id: Uuid,
    pub answer_text: String,
}

#[derive(Debug, Serialize)]
pub struct InterviewStartResponse {
    pub session_id: Uuid,
    pub question_text: String,
    pub status: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum InterviewAnswerResponse {
    Continue {
        session_id: Uuid,
        status: &'static str,
        question_text: String,
    },
    Complete {
        session_id: Uuid,
        status: &'static str,
        final_score: u8,
        overall_feedback: String,
        strengths: Vec<String>,
        weaknesses: Vec<String>,
    },
}

// ----------------------------------------------------------------------------
// Handlers
// ----------------------------------------------------------------------------

async fn start(
    orchestrator: &SessionOrchestrator,
    request: InterviewStartRequest,
) -> Result<Json<InterviewStartResponse>, AppError> {
    if request.role.trim().is_empty() {
        return Err(AppError::Validation("role cannot be empty".to_string()));
    }

    let tier = ExperienceTier::parse(&request.experience_level);
    let started = orchestrator.start_session(request.role.trim(), tier).await?;

    Ok(Json(InterviewStartResponse {
        session_id: started.session_id,
        question_text: started.question,
        status: "continue",
    }))
}

async fn answer(
    orchestrator: &SessionOrchestrator,
    request: InterviewAnswerRequest,
) -> Result<Json<InterviewAnswerResponse>, AppError> {
    if request.answer_text.trim().is_empty() {
        return Err(AppError::Validation(
            "answer_text cannot be empty".to_string(),
        ));
    }

    let outcome = orchestrator
        .submit_answer(request.session_id, &request.answer_text)
        .await?;

    let response = match outcome {
        AnswerOutcome::NextQuestion { question } => InterviewAnswerResponse::Continue {
            session_id: request.session_id,
            status: "continue",
            question_text: question,
        },
        AnswerOutcome::Complete { verdict } => InterviewAnswerResponse::Complete {
            session_id: request.session_id,
            status: "complete",
            final_score: verdict.final_score,
            overall_feedback: verdict.overall_feedback,
            strengths: verdict.strengths,
            weaknesses: verdict.weaknesses,
        },
    };

    Ok(Json(response))
}

/// POST /api/human_interview/start
pub async fn handle_human_start(
    State(state): State<AppState>,
    Json(request): Json<InterviewStartRequest>,
) -> Result<Json<InterviewStartResponse>, AppError> {
    start(&state.human_interview, request).await
}

/// POST /api/human_interview/answer
pub async fn handle_human_answer(
    State(state): State<AppState>,
    Json(request): Json<InterviewAnswerRequest>,
) -> Result<Json<InterviewAnswerResponse>, AppError> {
    answer(&state.human_interview, request).await
}

/// POST /api/interview/start
pub async fn handle_hr_start(
    State(state): State<AppState>,
    Json(request): Json<InterviewStartRequest>,
) -> Result<Json<InterviewStartResponse>, AppError> {
    start(&state.hr_interview, request).await
}

/// POST /api/interview/answer
pub async fn handle_hr_answer(
    State(state): State<AppState>,
    Json(request): Json<InterviewAnswerRequest>,
) -> Result<Json<InterviewAnswerResponse>, AppError> {
    answer(&state.hr_interview, request).await
}
