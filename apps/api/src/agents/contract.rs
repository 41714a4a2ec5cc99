//! Contract Guardian Agent - employment contract review.

use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use uuid::Uuid;

use crate::agents::prompts::CONTRACT_REVIEW_TEMPLATE;
use crate::errors::AppError;
use crate::history;
use crate::llm_client::normalize::normalize;
use crate::llm_client::GeminiClient;
use crate::state::AppState;

const REQUIRED_KEYS: &[&str] = &["issues", "explanations", "recommendations", "risk_level"];

#[derive(Debug, Deserialize)]
pub struct ContractReviewRequest {
    pub contract_text: String,
    #[serde(default)]
    pub user_id: Option<Uuid>,
}

/// Default payload when the model's reply cannot be normalized. Errs on the
/// side of sending the user to a human reviewer.
fn fallback_review() -> Map<String, Value> {
    let value = json!({
        "issues": ["Automated review could not be completed for this contract"],
        "explanations": [
            "The analysis service returned an unreadable result, so no clause-level findings are available"
        ],
        "recommendations": [
            "Have the contract reviewed by a qualified professional before signing"
        ],
        "risk_level": "Medium"
    });
    match value {
        Value::Object(map) => map,
        _ => unreachable!("fallback literal is an object"),
    }
}

pub async fn review_contract(
    llm: &GeminiClient,
    contract_text: &str,
) -> Result<Map<String, Value>, AppError> {
    let prompt = CONTRACT_REVIEW_TEMPLATE.replace("{contract_text}", contract_text);
    let raw = llm
        .generate(&prompt)
        .await
        .map_err(|e| AppError::Llm(format!("Contract review failed: {e}")))?;

    Ok(normalize(&raw, REQUIRED_KEYS, fallback_review()))
}

/// POST /api/review/contract
pub async fn handle_review_contract(
    State(state): State<AppState>,
    Json(request): Json<ContractReviewRequest>,
) -> Result<Json<Map<String, Value>>, AppError> {
    if request.contract_text.trim().is_empty() {
        return Err(AppError::Validation(
            "contract_text cannot be empty".to_string(),
        ));
    }

    let review = review_contract(&state.llm, &request.contract_text).await?;

    if let Some(user_id) = request.user_id {
        let summary = format!(
            "Risk level: {}",
            review
                .get("risk_level")
                .and_then(|v| v.as_str())
                .unwrap_or("unknown")
        );
        history::record(
            &state.db,
            user_id,
            "Contract Guardian",
            &summary,
            Value::Object(review.clone()),
        )
        .await;
    }

    Ok(Json(review))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_carries_every_required_key() {
        let fallback = fallback_review();
        for key in REQUIRED_KEYS {
            assert!(fallback.contains_key(*key), "fallback missing {key}");
        }
    }

    #[test]
    fn test_fallback_recommends_human_review() {
        let fallback = fallback_review();
        let recommendations = fallback.get("recommendations").unwrap();
        assert!(recommendations.to_string().contains("qualified professional"));
    }
}
