mod agents;
mod config;
mod db;
mod errors;
mod history;
mod interview;
mod llm_client;
mod models;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::create_pool;
use crate::interview::feedback::{hr_verdict, human_verdict};
use crate::interview::orchestrator::SessionOrchestrator;
use crate::interview::selector::{HeuristicSelector, ModelDrivenSelector, QuestionStrategy};
use crate::interview::store::InterviewSessionStore;
use crate::interview::{HR_INTERVIEW_TURNS, HUMAN_INTERVIEW_TURNS};
use crate::llm_client::GeminiClient;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (panics on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting CareerFlow API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL (history store)
    let db = create_pool(&config.database_url).await?;

    // Initialize LLM client
    let llm = GeminiClient::new(config.gemini_api_key.clone());
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    let session_ttl = Duration::from_secs(config.session_ttl_secs);

    // Human-like workflow: canned decision tables by default,
    // swappable to LLM follow-ups via ENABLE_LLM_FOLLOWUPS.
    let human_strategy: Arc<dyn QuestionStrategy> = if config.llm_followups {
        info!("Human-like interview using model-driven follow-ups");
        Arc::new(ModelDrivenSelector::new(llm.clone()))
    } else {
        info!("Human-like interview using heuristic follow-ups");
        Arc::new(HeuristicSelector)
    };
    let human_interview = Arc::new(SessionOrchestrator::new(
        "human_interview",
        InterviewSessionStore::new(session_ttl),
        human_strategy,
        HUMAN_INTERVIEW_TURNS,
        human_verdict,
    ));

    // HR-specialist workflow is model-driven end to end.
    let hr_interview = Arc::new(SessionOrchestrator::new(
        "hr_interview",
        InterviewSessionStore::new(session_ttl),
        Arc::new(ModelDrivenSelector::new(llm.clone())),
        HR_INTERVIEW_TURNS,
        hr_verdict,
    ));

    // Build app state
    let state = AppState {
        db,
        llm,
        human_interview,
        hr_interview,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS in production

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
