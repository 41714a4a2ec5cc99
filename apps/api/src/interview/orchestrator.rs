//! Session orchestration - the state machine tying store, selector, and
//! feedback templates together.
//!
//! A session moves ACTIVE -> COMPLETE exactly once, at the workflow's turn
//! limit (or earlier when the model-driven strategy declares completion).
//! Completion removes the session from the store in the same atomic store
//! operation that records the final answer, so exactly one verdict is ever
//! produced and the identifier is unreadable afterwards.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::interview::feedback::Verdict;
use crate::interview::selector::QuestionStrategy;
use crate::interview::session::ExperienceTier;
use crate::interview::store::{InterviewSessionStore, RecordOutcome};

/// A freshly started session.
#[derive(Debug)]
pub struct StartedSession {
    pub session_id: Uuid,
    pub question: String,
}

/// Result of submitting one answer.
#[derive(Debug)]
pub enum AnswerOutcome {
    /// Interview continues with this question.
    NextQuestion { question: String },
    /// Interview finished; the session no longer exists.
    Complete { verdict: Verdict },
}

pub struct SessionOrchestrator {
    /// Workflow name used in logs ("human_interview" / "hr_interview").
    name: &'static str,
    store: InterviewSessionStore,
    strategy: Arc<dyn QuestionStrategy>,
    turn_limit: u32,
    verdict_for: fn(ExperienceTier) -> Verdict,
}

impl SessionOrchestrator {
    pub fn new(
        name: &'static str,
        store: InterviewSessionStore,
        strategy: Arc<dyn QuestionStrategy>,
        turn_limit: u32,
        verdict_for: fn(ExperienceTier) -> Verdict,
    ) -> Self {
        Self {
            name,
            store,
            strategy,
            turn_limit,
            verdict_for,
        }
    }

    /// Starts a new session and returns its identifier plus the opening
    /// question. Not idempotent: every call creates an independent session.
    pub async fn start_session(
        &self,
        role: &str,
        tier: ExperienceTier,
    ) -> Result<StartedSession, AppError> {
        let question = self.strategy.opening_question(role, tier).await?;
        let session_id = self.store.create(role, tier, question.clone());

        info!(
            "{}: started session {} for role {:?} at tier {:?}",
            self.name, session_id, role, tier
        );

        Ok(StartedSession {
            session_id,
            question,
        })
    }

    /// Records an answer and returns either the next question or the final
    /// verdict. Retransmitting the most recent answer re-returns the
    /// previously issued question without consuming a turn or calling the
    /// model.
    pub async fn submit_answer(
        &self,
        session_id: Uuid,
        answer: &str,
    ) -> Result<AnswerOutcome, AppError> {
        match self
            .store
            .record_answer(session_id, answer, self.turn_limit)?
        {
            RecordOutcome::Duplicate { last_question } => {
                info!(
                    "{}: session {} retransmitted its last answer, re-issuing question",
                    self.name, session_id
                );
                Ok(AnswerOutcome::NextQuestion {
                    question: last_question,
                })
            }
            RecordOutcome::Completed { session } => {
                info!(
                    "{}: session {} complete after {} turns",
                    self.name, session_id, session.turns_taken
                );
                Ok(AnswerOutcome::Complete {
                    verdict: (self.verdict_for)(session.tier),
                })
            }
            RecordOutcome::Recorded { session } => {
                // The model call happens here, outside any store lock.
                let next = self.strategy.next_question(&session, answer).await?;

                if next.is_complete {
                    let removed = self.store.complete_and_remove(session_id)?;
                    info!(
                        "{}: session {} ended early by strategy after {} turns",
                        self.name, session_id, removed.turns_taken
                    );
                    return Ok(AnswerOutcome::Complete {
                        verdict: (self.verdict_for)(removed.tier),
                    });
                }

                self.store.set_last_question(session_id, &next.question)?;
                Ok(AnswerOutcome::NextQuestion {
                    question: next.question,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interview::feedback::human_verdict;
    use crate::interview::selector::HeuristicSelector;
    use std::time::Duration;

    fn orchestrator(turn_limit: u32) -> SessionOrchestrator {
        SessionOrchestrator::new(
            "test_interview",
            InterviewSessionStore::new(Duration::from_secs(1800)),
            Arc::new(HeuristicSelector),
            turn_limit,
            human_verdict,
        )
    }

    /// A long, trigger-free answer that lands on default branches.
    fn distinct_answer(i: usize) -> String {
        format!(
            "Answer number {i}: over the last year I delivered several projects across \
             different departments and learned a great deal about planning, estimation, \
             and communicating clearly with stakeholders at every level."
        )
    }

    #[tokio::test]
    async fn test_start_session_returns_fresh_id_and_opener() {
        let orch = orchestrator(7);
        let a = orch
            .start_session("Software Engineer", ExperienceTier::Beginner)
            .await
            .unwrap();
        let b = orch
            .start_session("Software Engineer", ExperienceTier::Beginner)
            .await
            .unwrap();

        assert_ne!(a.session_id, b.session_id);
        assert!(!a.question.is_empty());
        assert!(a.question.contains("tell me a little about yourself"));
    }

    #[tokio::test]
    async fn test_vague_beginner_answer_gets_clarification() {
        let orch = orchestrator(7);
        let started = orch
            .start_session("Software Engineer", ExperienceTier::Beginner)
            .await
            .unwrap();

        let outcome = orch
            .submit_answer(started.session_id, "I don't know")
            .await
            .unwrap();
        let AnswerOutcome::NextQuestion { question } = outcome else {
            panic!("expected a follow-up question");
        };
        assert!(
            question.contains("more specific example"),
            "hedging answer must trigger the clarification branch, got: {question}"
        );
    }

    #[tokio::test]
    async fn test_duplicate_answer_is_idempotent() {
        let orch = orchestrator(7);
        let started = orch
            .start_session("Software Engineer", ExperienceTier::Beginner)
            .await
            .unwrap();

        let first = orch
            .submit_answer(started.session_id, "I don't know")
            .await
            .unwrap();
        let second = orch
            .submit_answer(started.session_id, "I don't know")
            .await
            .unwrap();

        let (AnswerOutcome::NextQuestion { question: q1 },
             AnswerOutcome::NextQuestion { question: q2 }) = (first, second)
        else {
            panic!("both submissions must yield questions");
        };
        assert_eq!(q1, q2, "retry must re-return the identical question");
    }

    #[tokio::test]
    async fn test_session_completes_at_turn_limit() {
        let limit = 7;
        let orch = orchestrator(limit);
        let started = orch
            .start_session("Software Engineer", ExperienceTier::Intermediate)
            .await
            .unwrap();

        for i in 0..(limit - 1) as usize {
            let outcome = orch
                .submit_answer(started.session_id, &distinct_answer(i))
                .await
                .unwrap();
            assert!(
                matches!(outcome, AnswerOutcome::NextQuestion { .. }),
                "turn {i} must continue"
            );
        }

        let outcome = orch
            .submit_answer(started.session_id, &distinct_answer(99))
            .await
            .unwrap();
        let AnswerOutcome::Complete { verdict } = outcome else {
            panic!("final turn must complete the session");
        };
        assert_eq!(verdict.final_score, 88);
        assert_eq!(verdict.strengths.len(), 3);

        // Session is gone: further submissions are a client error
        let err = orch
            .submit_answer(started.session_id, "one more")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::SessionNotFound(_)));
    }

    #[tokio::test]
    async fn test_unknown_session_is_client_error() {
        let orch = orchestrator(7);
        let err = orch
            .submit_answer(Uuid::new_v4(), "hello")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::SessionNotFound(_)));
    }

    #[tokio::test]
    async fn test_hr_workflow_limit_is_five() {
        let orch = SessionOrchestrator::new(
            "hr_interview",
            InterviewSessionStore::new(Duration::from_secs(1800)),
            Arc::new(HeuristicSelector),
            5,
            crate::interview::feedback::hr_verdict,
        );
        let started = orch
            .start_session("HR Analyst", ExperienceTier::Expert)
            .await
            .unwrap();

        for i in 0..4 {
            let outcome = orch
                .submit_answer(started.session_id, &distinct_answer(i))
                .await
                .unwrap();
            assert!(matches!(outcome, AnswerOutcome::NextQuestion { .. }));
        }
        let outcome = orch
            .submit_answer(started.session_id, &distinct_answer(42))
            .await
            .unwrap();
        let AnswerOutcome::Complete { verdict } = outcome else {
            panic!("fifth answer must complete the HR session");
        };
        assert_eq!(verdict.final_score, 85);
    }
}
