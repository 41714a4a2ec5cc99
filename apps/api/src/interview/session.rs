//! Session state for multi-turn mock interviews.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Candidate's stated experience level. Fixes question difficulty,
/// the heuristic decision table, and the feedback templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExperienceTier {
    Beginner,
    Intermediate,
    Expert,
}

impl ExperienceTier {
    /// Parses a client-supplied level string, case-insensitively.
    /// Unrecognized values normalize to `Intermediate` rather than erroring,
    /// so a sloppy client still gets a sensible interview.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "beginner" | "entry" | "entry-level" | "junior" => ExperienceTier::Beginner,
            "expert" | "senior" | "advanced" => ExperienceTier::Expert,
            "intermediate" | "mid" | "mid-level" => ExperienceTier::Intermediate,
            _ => ExperienceTier::Intermediate,
        }
    }

    /// Upper-case label used inside prompt text.
    pub fn label(&self) -> &'static str {
        match self {
            ExperienceTier::Beginner => "BEGINNER",
            ExperienceTier::Intermediate => "INTERMEDIATE",
            ExperienceTier::Expert => "EXPERT",
        }
    }
}

/// One answered question.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnRecord {
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionStatus {
    Active,
    Complete,
}

/// A live interview conversation. Lives in the in-memory store while
/// `Active`; removed at the moment it turns `Complete`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterviewSession {
    pub session_id: Uuid,
    pub role: String,
    pub tier: ExperienceTier,
    /// Append-only, insertion-ordered. `turns_taken == turn_history.len()`
    /// holds after every accepted answer.
    pub turn_history: Vec<TurnRecord>,
    pub turns_taken: u32,
    /// Most recently issued question; the one the next answer responds to.
    pub last_question: String,
    pub status: SessionStatus,
    pub created_at: DateTime<Utc>,
    pub last_touched: DateTime<Utc>,
}

impl InterviewSession {
    pub fn new(role: &str, tier: ExperienceTier, opening_question: String) -> Self {
        let now = Utc::now();
        Self {
            session_id: Uuid::new_v4(),
            role: role.to_string(),
            tier,
            turn_history: Vec::new(),
            turns_taken: 0,
            last_question: opening_question,
            status: SessionStatus::Active,
            created_at: now,
            last_touched: now,
        }
    }

    /// The most recent answered turn, if any.
    pub fn last_turn(&self) -> Option<&TurnRecord> {
        self.turn_history.last()
    }
}
