use std::sync::Arc;

use sqlx::PgPool;

use crate::interview::orchestrator::SessionOrchestrator;
use crate::llm_client::GeminiClient;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub llm: GeminiClient,
    /// Human-like interview workflow: 7 turns, canned openers, decision-table
    /// follow-ups by default (LLM follow-ups via ENABLE_LLM_FOLLOWUPS).
    pub human_interview: Arc<SessionOrchestrator>,
    /// HR-specialist interview workflow: 5 turns, model-driven throughout.
    pub hr_interview: Arc<SessionOrchestrator>,
}
