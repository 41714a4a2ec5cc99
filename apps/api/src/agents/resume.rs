//! Resume Intelligence Agent - ATS scoring plus a Gen-Z roast.
//!
//! Two entry points: raw text, and a PDF upload whose text is extracted in
//! memory. Both converge on one LLM call whose reply is normalized; a
//! malformed reply degrades to a fixed payload so the caller still gets a
//! score.

use axum::extract::{Multipart, State};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use tracing::info;
use uuid::Uuid;

use crate::agents::prompts::RESUME_ANALYSIS_SYSTEM;
use crate::errors::AppError;
use crate::history;
use crate::llm_client::normalize::normalize;
use crate::llm_client::GeminiClient;
use crate::state::AppState;

const REQUIRED_KEYS: &[&str] = &["ats_score", "gen_z_roast", "professional_fixes", "status"];

#[derive(Debug, Deserialize)]
pub struct ResumeAnalysisRequest {
    pub resume_content: String,
    #[serde(default)]
    pub job_description: String,
    /// When present, the analysis is recorded in the user's history.
    #[serde(default)]
    pub user_id: Option<Uuid>,
}

/// Default payload when the model's reply cannot be normalized.
fn fallback_analysis() -> Map<String, Value> {
    let value = json!({
        "ats_score": 70,
        "gen_z_roast": "Oops! My circuits are fried trying to parse this resume. But hey, at least you submitted something!",
        "professional_fixes": [
            "Ensure your resume is well-formatted for easy parsing",
            "Use standard section headings (Experience, Education, Skills)",
            "Avoid complex layouts that might confuse ATS systems"
        ],
        "status": "success"
    });
    match value {
        Value::Object(map) => map,
        _ => unreachable!("fallback literal is an object"),
    }
}

/// Runs the resume analysis call and normalizes the reply.
/// Transport failures propagate; malformed replies degrade to the fallback.
pub async fn analyze_resume(
    llm: &GeminiClient,
    resume_text: &str,
    job_description: &str,
) -> Result<Map<String, Value>, AppError> {
    let mut prompt = format!("{RESUME_ANALYSIS_SYSTEM}\n\n{resume_text}");
    if !job_description.trim().is_empty() {
        prompt.push_str("\n\nTarget job description:\n");
        prompt.push_str(job_description);
    }

    let raw = llm
        .generate(&prompt)
        .await
        .map_err(|e| AppError::Llm(format!("Resume analysis failed: {e}")))?;

    Ok(normalize(&raw, REQUIRED_KEYS, fallback_analysis()))
}

/// POST /api/analyze/resume/text
pub async fn handle_analyze_text(
    State(state): State<AppState>,
    Json(request): Json<ResumeAnalysisRequest>,
) -> Result<Json<Map<String, Value>>, AppError> {
    if request.resume_content.trim().is_empty() {
        return Err(AppError::Validation(
            "resume_content cannot be empty".to_string(),
        ));
    }

    let analysis =
        analyze_resume(&state.llm, &request.resume_content, &request.job_description).await?;

    if let Some(user_id) = request.user_id {
        let summary = format!(
            "ATS score: {}",
            analysis.get("ats_score").cloned().unwrap_or(json!(null))
        );
        history::record(
            &state.db,
            user_id,
            "Resume Analyzer",
            &summary,
            Value::Object(analysis.clone()),
        )
        .await;
    }

    Ok(Json(analysis))
}

/// POST /api/analyze/resume/file
///
/// Accepts a multipart PDF upload, extracts its text in memory, and runs
/// the same analysis as the text endpoint.
pub async fn handle_analyze_file(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<Map<String, Value>>, AppError> {
    let mut pdf_bytes: Option<Vec<u8>> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart payload: {e}")))?
    {
        let is_pdf = field
            .content_type()
            .map(|ct| ct.starts_with("application/pdf"))
            .unwrap_or(false);
        if !is_pdf {
            return Err(AppError::Validation(
                "Only PDF files are allowed".to_string(),
            ));
        }
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Failed to read upload: {e}")))?;
        pdf_bytes = Some(bytes.to_vec());
        break;
    }

    let pdf_bytes = pdf_bytes
        .ok_or_else(|| AppError::Validation("Request contained no file field".to_string()))?;

    let resume_text = extract_pdf_text(&pdf_bytes)?;
    info!("Extracted {} characters of resume text", resume_text.len());

    let analysis = analyze_resume(&state.llm, &resume_text, "").await?;
    Ok(Json(analysis))
}

/// Extracts text from an in-memory PDF, rejecting unreadable or empty files.
fn extract_pdf_text(bytes: &[u8]) -> Result<String, AppError> {
    let text = pdf_extract::extract_text_from_mem(bytes)
        .map_err(|e| AppError::Validation(format!("Error processing PDF file: {e}")))?;
    let text = text.trim().to_string();
    if text.is_empty() {
        return Err(AppError::Validation(
            "Could not extract text from the PDF file. Please ensure it's a valid PDF with text content.".to_string(),
        ));
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_carries_every_required_key() {
        let fallback = fallback_analysis();
        for key in REQUIRED_KEYS {
            assert!(fallback.contains_key(*key), "fallback missing {key}");
        }
        assert_eq!(fallback["ats_score"], 70);
        assert_eq!(fallback["status"], "success");
    }

    #[test]
    fn test_extract_pdf_text_rejects_garbage() {
        assert!(extract_pdf_text(b"definitely not a pdf").is_err());
    }

    #[test]
    fn test_request_accepts_minimal_body() {
        let request: ResumeAnalysisRequest =
            serde_json::from_str(r#"{"resume_content": "text"}"#).unwrap();
        assert_eq!(request.resume_content, "text");
        assert!(request.job_description.is_empty());
        assert!(request.user_id.is_none());
    }
}
