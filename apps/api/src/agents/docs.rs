//! Auto-Docs Agent - cover letters, counter offers, and similar documents.
//!
//! Unlike the other agents this one wants prose, not JSON, so there is no
//! normalization step; an empty reply is the only failure mode.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::agents::prompts::DOC_GENERATION_TEMPLATE;
use crate::errors::AppError;
use crate::history;
use crate::llm_client::GeminiClient;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct DocumentGenerationRequest {
    pub document_type: String,
    pub content_data: Value,
    #[serde(default)]
    pub user_id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct DocumentGenerationResponse {
    pub document_type: String,
    pub document: String,
    pub status: &'static str,
}

pub async fn generate_document(
    llm: &GeminiClient,
    document_type: &str,
    content_data: &Value,
) -> Result<String, AppError> {
    let content_json = serde_json::to_string_pretty(content_data)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to serialize content data: {e}")))?;

    let prompt = DOC_GENERATION_TEMPLATE
        .replace("{document_type}", document_type)
        .replace("{content_data}", &content_json);

    let document = llm
        .generate(&prompt)
        .await
        .map_err(|e| AppError::Llm(format!("Document generation failed: {e}")))?;

    if document.trim().is_empty() {
        return Err(AppError::Llm(
            "Document generation returned no content".to_string(),
        ));
    }
    Ok(document)
}

/// POST /api/generate/document
pub async fn handle_generate_document(
    State(state): State<AppState>,
    Json(request): Json<DocumentGenerationRequest>,
) -> Result<Json<DocumentGenerationResponse>, AppError> {
    if request.document_type.trim().is_empty() {
        return Err(AppError::Validation(
            "document_type cannot be empty".to_string(),
        ));
    }

    let document =
        generate_document(&state.llm, &request.document_type, &request.content_data).await?;

    if let Some(user_id) = request.user_id {
        let summary = format!("Generated {}", request.document_type);
        history::record(
            &state.db,
            user_id,
            "Auto-Docs",
            &summary,
            serde_json::json!({ "document": document }),
        )
        .await;
    }

    Ok(Json(DocumentGenerationResponse {
        document_type: request.document_type,
        document,
        status: "success",
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_deserializes_with_nested_content() {
        let json = r#"{
            "document_type": "cover_letter",
            "content_data": {"position": "Software Engineer", "company": "Tech Corp"}
        }"#;
        let request: DocumentGenerationRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.document_type, "cover_letter");
        assert_eq!(request.content_data["company"], "Tech Corp");
    }
}
