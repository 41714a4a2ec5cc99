//! In-memory lifecycle store for interview sessions.
//!
//! Sessions are keyed by a 128-bit random identifier. Each operation is
//! atomic with respect to a single key: the dashmap shard write guard is
//! held for the whole mutation and never across an await point, so two
//! concurrent submissions for the same session cannot interleave their
//! counter increments or history appends.
//!
//! Abandoned sessions are evicted lazily: any access past the idle TTL
//! treats the session as gone, and a full sweep runs at most once per
//! minute, gated by a cleanup-hint mutex.

use chrono::{DateTime, Duration, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use parking_lot::Mutex;
use tracing::debug;
use uuid::Uuid;

use crate::errors::AppError;
use crate::interview::session::{ExperienceTier, InterviewSession, SessionStatus, TurnRecord};

const SWEEP_INTERVAL_SECS: i64 = 60;

/// Outcome of recording an answer. The composite check-append-complete
/// runs under one per-key guard so callers observe a single transition.
#[derive(Debug)]
pub enum RecordOutcome {
    /// The answer text equals the most recently recorded answer. Nothing
    /// was mutated; the previously issued question is returned so client
    /// retries are idempotent.
    Duplicate { last_question: String },
    /// The turn was appended and the session stays active. Carries a
    /// snapshot taken after the append.
    Recorded { session: InterviewSession },
    /// The turn was appended and reached the workflow's turn limit. The
    /// session has been removed from the store and cannot be read again.
    Completed { session: InterviewSession },
}

pub struct InterviewSessionStore {
    sessions: DashMap<Uuid, InterviewSession>,
    ttl: Duration,
    cleanup_hint: Mutex<DateTime<Utc>>,
}

impl InterviewSessionStore {
    pub fn new(ttl: std::time::Duration) -> Self {
        Self {
            sessions: DashMap::new(),
            ttl: Duration::from_std(ttl).unwrap_or_else(|_| Duration::seconds(1800)),
            cleanup_hint: Mutex::new(Utc::now()),
        }
    }

    fn is_expired(&self, session: &InterviewSession, now: DateTime<Utc>) -> bool {
        now - session.last_touched >= self.ttl
    }

    /// Evicts every expired session, at most once per sweep interval.
    fn maybe_sweep(&self, now: DateTime<Utc>) {
        let mut guard = self.cleanup_hint.lock();
        if now - *guard < Duration::seconds(SWEEP_INTERVAL_SECS) {
            return;
        }
        *guard = now;
        drop(guard);

        let stale: Vec<Uuid> = self
            .sessions
            .iter()
            .filter(|entry| self.is_expired(entry.value(), now))
            .map(|entry| *entry.key())
            .collect();

        for id in &stale {
            self.sessions.remove(id);
        }
        if !stale.is_empty() {
            debug!("Evicted {} expired interview sessions", stale.len());
        }
    }

    /// Inserts a fresh ACTIVE session and returns its identifier.
    pub fn create(&self, role: &str, tier: ExperienceTier, opening_question: String) -> Uuid {
        let now = Utc::now();
        self.maybe_sweep(now);

        let session = InterviewSession::new(role, tier, opening_question);
        let id = session.session_id;
        self.sessions.insert(id, session);
        id
    }

    /// Returns a snapshot of an active session.
    pub fn get_snapshot(&self, id: Uuid) -> Result<InterviewSession, AppError> {
        let now = Utc::now();
        self.maybe_sweep(now);

        match self.sessions.entry(id) {
            Entry::Occupied(occ) if self.is_expired(occ.get(), now) => {
                occ.remove();
                Err(AppError::SessionNotFound(id.to_string()))
            }
            Entry::Occupied(occ) => Ok(occ.get().clone()),
            Entry::Vacant(_) => Err(AppError::SessionNotFound(id.to_string())),
        }
    }

    /// Records an answer: duplicate check, append, counter increment, and
    /// the limit check all happen under the same per-key guard.
    ///
    /// `turn_limit` is the workflow's session length; reaching it removes
    /// the session and yields `RecordOutcome::Completed`.
    pub fn record_answer(
        &self,
        id: Uuid,
        answer: &str,
        turn_limit: u32,
    ) -> Result<RecordOutcome, AppError> {
        let now = Utc::now();
        self.maybe_sweep(now);

        match self.sessions.entry(id) {
            Entry::Occupied(occ) if self.is_expired(occ.get(), now) => {
                occ.remove();
                Err(AppError::SessionNotFound(id.to_string()))
            }
            Entry::Occupied(mut occ) => {
                let session = occ.get_mut();

                // Retransmission guard: identical answer text means a client
                // retry, not a new turn.
                if session
                    .last_turn()
                    .is_some_and(|turn| turn.answer == answer)
                {
                    return Ok(RecordOutcome::Duplicate {
                        last_question: session.last_question.clone(),
                    });
                }

                session.turn_history.push(TurnRecord {
                    question: session.last_question.clone(),
                    answer: answer.to_string(),
                });
                session.turns_taken += 1;
                session.last_touched = now;
                let reached_limit = session.turns_taken >= turn_limit;

                if reached_limit {
                    let mut completed = occ.remove();
                    completed.status = SessionStatus::Complete;
                    Ok(RecordOutcome::Completed { session: completed })
                } else {
                    Ok(RecordOutcome::Recorded {
                        session: occ.get().clone(),
                    })
                }
            }
            Entry::Vacant(_) => Err(AppError::SessionNotFound(id.to_string())),
        }
    }

    /// Stores the newly issued question so the next answer (and any
    /// retransmission of the current one) resolves against it.
    pub fn set_last_question(&self, id: Uuid, question: &str) -> Result<(), AppError> {
        match self.sessions.get_mut(&id) {
            Some(mut session) => {
                session.last_question = question.to_string();
                session.last_touched = Utc::now();
                Ok(())
            }
            None => Err(AppError::SessionNotFound(id.to_string())),
        }
    }

    /// Atomically reads and deletes a session. Used when the model-driven
    /// strategy declares the interview finished ahead of the turn limit.
    /// The identifier is unreadable after this returns.
    pub fn complete_and_remove(&self, id: Uuid) -> Result<InterviewSession, AppError> {
        match self.sessions.remove(&id) {
            Some((_, mut session)) => {
                session.status = SessionStatus::Complete;
                Ok(session)
            }
            None => Err(AppError::SessionNotFound(id.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration as StdDuration;

    fn store() -> InterviewSessionStore {
        InterviewSessionStore::new(StdDuration::from_secs(1800))
    }

    #[test]
    fn test_create_issues_fresh_ids() {
        let store = store();
        let a = store.create("Engineer", ExperienceTier::Beginner, "Q1".to_string());
        let b = store.create("Engineer", ExperienceTier::Beginner, "Q1".to_string());
        assert_ne!(a, b, "every session must get a fresh identifier");
        assert!(store.get_snapshot(a).is_ok());
        assert!(store.get_snapshot(b).is_ok());
    }

    #[test]
    fn test_get_snapshot_unknown_id_fails() {
        let store = store();
        let err = store.get_snapshot(Uuid::new_v4()).unwrap_err();
        assert!(matches!(err, AppError::SessionNotFound(_)));
    }

    #[test]
    fn test_record_answer_appends_and_counts() {
        let store = store();
        let id = store.create("Engineer", ExperienceTier::Beginner, "Q1".to_string());

        let outcome = store.record_answer(id, "my answer", 7).unwrap();
        let RecordOutcome::Recorded { session } = outcome else {
            panic!("expected Recorded");
        };
        assert_eq!(session.turns_taken, 1);
        assert_eq!(session.turn_history.len(), 1);
        assert_eq!(session.turn_history[0].question, "Q1");
        assert_eq!(session.turn_history[0].answer, "my answer");
    }

    #[test]
    fn test_turns_taken_tracks_history_length() {
        let store = store();
        let id = store.create("Engineer", ExperienceTier::Expert, "Q1".to_string());

        for i in 0..5 {
            store.set_last_question(id, &format!("Q{}", i + 2)).unwrap();
            let outcome = store.record_answer(id, &format!("answer {i}"), 100).unwrap();
            let RecordOutcome::Recorded { session } = outcome else {
                panic!("expected Recorded");
            };
            assert_eq!(
                session.turns_taken as usize,
                session.turn_history.len(),
                "counter must equal history length after every answer"
            );
        }
    }

    #[test]
    fn test_duplicate_answer_does_not_mutate() {
        let store = store();
        let id = store.create("Engineer", ExperienceTier::Beginner, "Q1".to_string());

        store.record_answer(id, "same answer", 7).unwrap();
        store.set_last_question(id, "Q2").unwrap();

        let outcome = store.record_answer(id, "same answer", 7).unwrap();
        let RecordOutcome::Duplicate { last_question } = outcome else {
            panic!("expected Duplicate");
        };
        assert_eq!(last_question, "Q2");

        let snapshot = store.get_snapshot(id).unwrap();
        assert_eq!(snapshot.turns_taken, 1, "duplicate must not increment");
        assert_eq!(snapshot.turn_history.len(), 1);
    }

    #[test]
    fn test_reaching_limit_completes_and_removes() {
        let store = store();
        let id = store.create("Engineer", ExperienceTier::Beginner, "Q1".to_string());

        let outcome = store.record_answer(id, "a1", 2).unwrap();
        assert!(matches!(outcome, RecordOutcome::Recorded { .. }));

        let outcome = store.record_answer(id, "a2", 2).unwrap();
        let RecordOutcome::Completed { session } = outcome else {
            panic!("expected Completed at the limit");
        };
        assert_eq!(session.status, SessionStatus::Complete);
        assert_eq!(session.turns_taken, 2);

        // The id must be unreadable after completion
        assert!(store.get_snapshot(id).is_err());
        assert!(store.record_answer(id, "a3", 2).is_err());
    }

    #[test]
    fn test_complete_and_remove_is_single_shot() {
        let store = store();
        let id = store.create("Engineer", ExperienceTier::Expert, "Q1".to_string());

        let session = store.complete_and_remove(id).unwrap();
        assert_eq!(session.status, SessionStatus::Complete);

        let err = store.complete_and_remove(id).unwrap_err();
        assert!(matches!(err, AppError::SessionNotFound(_)));
    }

    #[test]
    fn test_expired_session_behaves_as_not_found() {
        let store = InterviewSessionStore::new(StdDuration::from_secs(0));
        let id = store.create("Engineer", ExperienceTier::Beginner, "Q1".to_string());

        let err = store.get_snapshot(id).unwrap_err();
        assert!(matches!(err, AppError::SessionNotFound(_)));
        assert!(store.record_answer(id, "answer", 7).is_err());
    }

    #[test]
    fn test_live_session_survives_access() {
        let store = store();
        let id = store.create("Engineer", ExperienceTier::Beginner, "Q1".to_string());
        assert!(store.get_snapshot(id).is_ok());
        assert!(store.get_snapshot(id).is_ok());
    }

    #[test]
    fn test_concurrent_distinct_answers_both_commit() {
        let store = Arc::new(store());
        let id = store.create("Engineer", ExperienceTier::Beginner, "Q1".to_string());

        let handles: Vec<_> = ["first answer", "second answer"]
            .into_iter()
            .map(|answer| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || store.record_answer(id, answer, 100))
            })
            .collect();
        for handle in handles {
            handle.join().unwrap().unwrap();
        }

        let snapshot = store.get_snapshot(id).unwrap();
        assert_eq!(snapshot.turns_taken, 2, "both answers must commit exactly once");
        assert_eq!(snapshot.turn_history.len(), 2);
        let answers: Vec<&str> = snapshot
            .turn_history
            .iter()
            .map(|t| t.answer.as_str())
            .collect();
        assert!(answers.contains(&"first answer"));
        assert!(answers.contains(&"second answer"));
    }
}
