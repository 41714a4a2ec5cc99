//! History/audit sink.
//!
//! Writes are best-effort: a failed insert is logged and swallowed so an
//! audit hiccup never fails the request that produced the payload. Reads
//! back the paginated per-user history for the history endpoint.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::PgPool;
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::history::HistoryRow;
use crate::state::AppState;

/// Inserts one history record.
async fn save_history(
    pool: &PgPool,
    user_id: Uuid,
    agent_name: &str,
    summary_text: &str,
    full_output: &Value,
) -> Result<Uuid, sqlx::Error> {
    let id = Uuid::new_v4();
    sqlx::query(
        r#"
        INSERT INTO history (id, user_id, agent_name, action_type, summary_text, full_output)
        VALUES ($1, $2, $3, 'analyze', $4, $5)
        "#,
    )
    .bind(id)
    .bind(user_id)
    .bind(agent_name)
    .bind(summary_text)
    .bind(full_output)
    .execute(pool)
    .await?;
    Ok(id)
}

/// Best-effort history write. Failure is logged, never propagated.
pub async fn record(
    pool: &PgPool,
    user_id: Uuid,
    agent_name: &str,
    summary_text: &str,
    full_output: Value,
) {
    match save_history(pool, user_id, agent_name, summary_text, &full_output).await {
        Ok(id) => info!("Saved history record {id} for user {user_id} ({agent_name})"),
        Err(e) => warn!("Failed to save history for user {user_id} ({agent_name}): {e}"),
    }
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_page() -> i64 {
    1
}

fn default_limit() -> i64 {
    20
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub total: i64,
    pub page: i64,
    pub limit: i64,
    pub records: Vec<HistoryRow>,
}

/// GET /api/history/:user_id
pub async fn handle_get_history(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Query(params): Query<HistoryQuery>,
) -> Result<Json<HistoryResponse>, AppError> {
    if params.page < 1 || params.limit < 1 {
        return Err(AppError::Validation(
            "page and limit must be positive".to_string(),
        ));
    }
    let offset = (params.page - 1) * params.limit;

    let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM history WHERE user_id = $1")
        .bind(user_id)
        .fetch_one(&state.db)
        .await?;

    let records = sqlx::query_as::<_, HistoryRow>(
        r#"
        SELECT * FROM history
        WHERE user_id = $1
        ORDER BY created_at DESC
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(user_id)
    .bind(params.limit)
    .bind(offset)
    .fetch_all(&state.db)
    .await?;

    Ok(Json(HistoryResponse {
        total,
        page: params.page,
        limit: params.limit,
        records,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_query_defaults() {
        let query: HistoryQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(query.page, 1);
        assert_eq!(query.limit, 20);
    }

    #[test]
    fn test_history_query_explicit_values() {
        let query: HistoryQuery = serde_json::from_str(r#"{"page": 3, "limit": 5}"#).unwrap();
        assert_eq!(query.page, 3);
        assert_eq!(query.limit, 5);
    }
}
