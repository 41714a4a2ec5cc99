//! Adaptive question selection.
//!
//! Two interchangeable strategies behind one trait:
//! - `HeuristicSelector`: per-tier decision tables over trigger substrings
//!   in the candidate's answer. No network calls; never ends the interview
//!   on its own.
//! - `ModelDrivenSelector`: prompts the LLM with the last dialogue turn and
//!   normalizes its reply, degrading to a fixed follow-up when the reply is
//!   malformed.

use async_trait::async_trait;
use serde_json::json;
use tracing::info;

use crate::errors::AppError;
use crate::interview::prompts::render_interview_prompt;
use crate::interview::session::{ExperienceTier, InterviewSession};
use crate::llm_client::normalize::normalize;
use crate::llm_client::GeminiClient;

/// Strategy output: the question to issue, and whether the strategy
/// declared the interview finished ahead of the turn limit.
#[derive(Debug, Clone)]
pub struct NextQuestion {
    pub question: String,
    pub is_complete: bool,
}

#[async_trait]
pub trait QuestionStrategy: Send + Sync {
    /// Produces the opening question for a fresh session.
    async fn opening_question(
        &self,
        role: &str,
        tier: ExperienceTier,
    ) -> Result<String, AppError>;

    /// Produces the follow-up to the answer just recorded. Selection is
    /// total: every implementation returns a question for every input.
    async fn next_question(
        &self,
        session: &InterviewSession,
        answer: &str,
    ) -> Result<NextQuestion, AppError>;
}

// ----------------------------------------------------------------------------
// Heuristic strategy
// ----------------------------------------------------------------------------

/// One row of a tier's decision table. Rows are evaluated top to bottom
/// against the lower-cased answer; the first match wins.
struct DecisionRule {
    matches: fn(&str) -> bool,
    question: &'static str,
}

/// Answers shorter than this many words count as vague for beginners.
const BEGINNER_MIN_WORDS: usize = 20;

const QUESTION_BEGINNER_CLARIFY: &str = "Could you provide a more specific example? Think about a time when you faced a challenge and how you overcame it.";
const QUESTION_BEGINNER_TEAMWORK: &str = "That's helpful. Can you tell me about a time when you had to work with a difficult team member? How did you handle the situation?";
const QUESTION_INTERMEDIATE_IMPACT: &str = "That's interesting. Can you quantify the impact of that leadership role? What specific results did your team achieve?";
const QUESTION_INTERMEDIATE_RETRO: &str = "You mentioned a challenge. What would you do differently if you faced a similar situation in the future?";
const QUESTION_INTERMEDIATE_PROJECT: &str = "Let's talk about your technical skills. Can you describe a complex project you've worked on and your specific contributions to its success?";
const QUESTION_EXPERT_KPI: &str = "That's a compelling vision. How would you measure the success of that strategy, and what key performance indicators would you track?";
const QUESTION_EXPERT_TALENT: &str = "You've mentioned leading teams. How do you approach developing talent and building high-performing teams?";
const QUESTION_EXPERT_FRAMEWORK: &str = "Given your experience, how do you approach making decisions when you have incomplete information? Can you walk me through your decision-making framework?";

fn contains_any(answer: &str, phrases: &[&str]) -> bool {
    phrases.iter().any(|p| answer.contains(p))
}

fn beginner_vague(answer: &str) -> bool {
    contains_any(answer, &["don't know", "not sure"])
        || answer.split_whitespace().count() < BEGINNER_MIN_WORDS
}

fn intermediate_leadership(answer: &str) -> bool {
    contains_any(answer, &["led", "managed", "coordinated"])
}

fn intermediate_challenge(answer: &str) -> bool {
    contains_any(answer, &["problem", "challenge"])
}

fn expert_strategy(answer: &str) -> bool {
    contains_any(answer, &["strategy", "vision", "long-term"])
}

fn expert_people(answer: &str) -> bool {
    contains_any(answer, &["team", "people"])
}

const BEGINNER_RULES: &[DecisionRule] = &[DecisionRule {
    matches: beginner_vague,
    question: QUESTION_BEGINNER_CLARIFY,
}];

const INTERMEDIATE_RULES: &[DecisionRule] = &[
    DecisionRule {
        matches: intermediate_leadership,
        question: QUESTION_INTERMEDIATE_IMPACT,
    },
    DecisionRule {
        matches: intermediate_challenge,
        question: QUESTION_INTERMEDIATE_RETRO,
    },
];

const EXPERT_RULES: &[DecisionRule] = &[
    DecisionRule {
        matches: expert_strategy,
        question: QUESTION_EXPERT_KPI,
    },
    DecisionRule {
        matches: expert_people,
        question: QUESTION_EXPERT_TALENT,
    },
];

/// The decision table for a tier: ordered trigger rows plus the mandatory
/// default question used when no row matches.
fn table_for(tier: ExperienceTier) -> (&'static [DecisionRule], &'static str) {
    match tier {
        ExperienceTier::Beginner => (BEGINNER_RULES, QUESTION_BEGINNER_TEAMWORK),
        ExperienceTier::Intermediate => (INTERMEDIATE_RULES, QUESTION_INTERMEDIATE_PROJECT),
        ExperienceTier::Expert => (EXPERT_RULES, QUESTION_EXPERT_FRAMEWORK),
    }
}

/// Picks the canned follow-up for an answer. Total: always yields a
/// question.
pub fn select_canned_question(tier: ExperienceTier, answer: &str) -> &'static str {
    let lowered = answer.to_lowercase();
    let (rules, default) = table_for(tier);
    rules
        .iter()
        .find(|rule| (rule.matches)(&lowered))
        .map(|rule| rule.question)
        .unwrap_or(default)
}

/// Fixed opener per tier, used by the human-like workflow.
pub fn opening_question_for(tier: ExperienceTier) -> &'static str {
    match tier {
        ExperienceTier::Beginner => "Thank you for coming in today. To start, could you tell me a little about yourself and what drew you to this field?",
        ExperienceTier::Intermediate => "Thanks for joining us today. Can you walk me through your background and highlight a couple of accomplishments you're particularly proud of in your career so far?",
        ExperienceTier::Expert => "Thank you for your time today. Given your extensive experience, I'd love to hear about a significant challenge you've faced in your career and how you approached solving it.",
    }
}

/// Canned decision-table strategy. Never declares completion; the
/// orchestrator's turn limit ends the interview.
pub struct HeuristicSelector;

#[async_trait]
impl QuestionStrategy for HeuristicSelector {
    async fn opening_question(
        &self,
        _role: &str,
        tier: ExperienceTier,
    ) -> Result<String, AppError> {
        Ok(opening_question_for(tier).to_string())
    }

    async fn next_question(
        &self,
        session: &InterviewSession,
        answer: &str,
    ) -> Result<NextQuestion, AppError> {
        Ok(NextQuestion {
            question: select_canned_question(session.tier, answer).to_string(),
            is_complete: false,
        })
    }
}

// ----------------------------------------------------------------------------
// Model-driven strategy
// ----------------------------------------------------------------------------

/// Fallback opener when the model's opening reply cannot be normalized.
pub const FALLBACK_OPENING_QUESTION: &str =
    "Can you tell me about your experience in this field and what interests you most about it?";

/// Fallback follow-up when the model's reply cannot be normalized.
pub const FALLBACK_FOLLOW_UP_QUESTION: &str =
    "What strategies would you use to improve employee engagement in an organization?";

/// Converts a raw model reply into a `NextQuestion`, substituting
/// `fallback_question` with continue status when normalization fails.
/// Exposed for tests; carries no I/O.
pub fn interpret_model_reply(raw: &str, fallback_question: &str) -> NextQuestion {
    let mut fallback = serde_json::Map::new();
    fallback.insert("question".to_string(), json!(fallback_question));
    fallback.insert("interview_status".to_string(), json!("continue"));

    let map = normalize(raw, &["question", "interview_status"], fallback);

    let question = map
        .get("question")
        .and_then(|v| v.as_str())
        .unwrap_or(fallback_question)
        .to_string();
    let is_complete = map
        .get("interview_status")
        .and_then(|v| v.as_str())
        .is_some_and(|s| s.eq_ignore_ascii_case("complete"));

    NextQuestion {
        question,
        is_complete,
    }
}

/// Strategy that asks the LLM for each question. Transport failures
/// propagate; malformed replies degrade to the fixed fallbacks.
pub struct ModelDrivenSelector {
    llm: GeminiClient,
}

impl ModelDrivenSelector {
    pub fn new(llm: GeminiClient) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl QuestionStrategy for ModelDrivenSelector {
    async fn opening_question(
        &self,
        role: &str,
        tier: ExperienceTier,
    ) -> Result<String, AppError> {
        let prompt = render_interview_prompt(role, tier, None);
        let raw = self
            .llm
            .generate(&prompt)
            .await
            .map_err(|e| AppError::Llm(format!("Opening question generation failed: {e}")))?;

        let next = interpret_model_reply(&raw, FALLBACK_OPENING_QUESTION);
        // A "complete" verdict before any answer makes no sense; keep the
        // question and let the session run.
        Ok(next.question)
    }

    async fn next_question(
        &self,
        session: &InterviewSession,
        _answer: &str,
    ) -> Result<NextQuestion, AppError> {
        let prompt = render_interview_prompt(&session.role, session.tier, session.last_turn());
        let raw = self
            .llm
            .generate(&prompt)
            .await
            .map_err(|e| AppError::Llm(format!("Follow-up generation failed: {e}")))?;

        let next = interpret_model_reply(&raw, FALLBACK_FOLLOW_UP_QUESTION);
        if next.is_complete {
            info!(
                "Model declared interview {} complete after {} turns",
                session.session_id, session.turns_taken
            );
        }
        Ok(next)
    }
}
