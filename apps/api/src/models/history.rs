use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One audit record of an agent interaction.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct HistoryRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub agent_name: String,
    pub action_type: String,
    pub summary_text: String,
    pub full_output: serde_json::Value,
    pub created_at: DateTime<Utc>,
}
