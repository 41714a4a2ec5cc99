//! Multi-agent workflows - fixed compositions of the one-shot agents.
//!
//! `job_application` pairs a resume analysis with interview preparation;
//! `offer_review` pairs a contract review with a counter-offer letter.

use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use tracing::info;

use crate::agents::contract::review_contract;
use crate::agents::docs::generate_document;
use crate::agents::prompts::INTERVIEW_PREP_TEMPLATE;
use crate::agents::resume::analyze_resume;
use crate::errors::AppError;
use crate::llm_client::normalize::normalize;
use crate::llm_client::GeminiClient;
use crate::state::AppState;

const PREP_REQUIRED_KEYS: &[&str] = &[
    "topics",
    "technical_questions",
    "behavioral_questions",
    "examples",
];

#[derive(Debug, Deserialize)]
pub struct WorkflowRequest {
    pub workflow: String,
    #[serde(default)]
    pub context: Map<String, Value>,
}

fn context_str<'a>(context: &'a Map<String, Value>, key: &str) -> &'a str {
    context.get(key).and_then(|v| v.as_str()).unwrap_or("")
}

/// Default interview-prep payload when the model's reply is unreadable.
fn fallback_prep() -> Map<String, Value> {
    let value = json!({
        "topics": ["Your most recent role and its responsibilities"],
        "technical_questions": ["Walk me through a project you are proud of."],
        "behavioral_questions": ["Tell me about a time you disagreed with a teammate."],
        "examples": ["Pick one concrete accomplishment from your resume and practice telling it as a story."]
    });
    match value {
        Value::Object(map) => map,
        _ => unreachable!("fallback literal is an object"),
    }
}

async fn prepare_interview(
    llm: &GeminiClient,
    job_description: &str,
    resume_content: &str,
) -> Result<Map<String, Value>, AppError> {
    let prompt = INTERVIEW_PREP_TEMPLATE
        .replace("{job_description}", job_description)
        .replace("{resume_content}", resume_content);

    let raw = llm
        .generate(&prompt)
        .await
        .map_err(|e| AppError::Llm(format!("Interview preparation failed: {e}")))?;

    Ok(normalize(&raw, PREP_REQUIRED_KEYS, fallback_prep()))
}

/// POST /api/workflow/execute
pub async fn handle_execute_workflow(
    State(state): State<AppState>,
    Json(request): Json<WorkflowRequest>,
) -> Result<Json<Value>, AppError> {
    info!("Executing workflow {:?}", request.workflow);

    match request.workflow.as_str() {
        "job_application" => {
            let resume_content = context_str(&request.context, "resume_content");
            let job_description = context_str(&request.context, "job_description");
            if resume_content.is_empty() {
                return Err(AppError::Validation(
                    "job_application workflow requires resume_content in context".to_string(),
                ));
            }

            let resume_analysis =
                analyze_resume(&state.llm, resume_content, job_description).await?;
            let interview_prep =
                prepare_interview(&state.llm, job_description, resume_content).await?;

            Ok(Json(json!({
                "workflow": "job_application",
                "results": {
                    "resume_analysis": resume_analysis,
                    "interview_prep": interview_prep,
                }
            })))
        }
        "offer_review" => {
            let contract_text = context_str(&request.context, "contract_text");
            if contract_text.is_empty() {
                return Err(AppError::Validation(
                    "offer_review workflow requires contract_text in context".to_string(),
                ));
            }

            let contract_review = review_contract(&state.llm, contract_text).await?;
            let counter_offer = generate_document(
                &state.llm,
                "counter_offer_letter",
                &json!({
                    "contract_issues": contract_review.get("issues").cloned().unwrap_or(json!([])),
                    "recommendations": contract_review.get("recommendations").cloned().unwrap_or(json!([])),
                }),
            )
            .await?;

            Ok(Json(json!({
                "workflow": "offer_review",
                "results": {
                    "contract_review": contract_review,
                    "counter_offer_letter": counter_offer,
                }
            })))
        }
        other => Err(AppError::Validation(format!(
            "Unknown workflow: {other}. Supported: job_application, offer_review"
        ))),
    }
}
