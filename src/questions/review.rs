//! Review operations exposed to presentation code
//!
//! These are the only entry points a front end needs: the due set, dashboard
//! stats, answering a question and walking through a review session. The
//! store is always passed in explicitly.

use thiserror::Error;

use super::algorithm::{apply_answer, SchedulerError};
use super::models::{AnswerToken, QuestionId, QuestionRecord, QuestionStatus, ReviewStats, Timestamp};
use super::storage::{QuestionStore, QuestionStoreError};

#[derive(Error, Debug)]
pub enum ReviewError {
    #[error(transparent)]
    Store(#[from] QuestionStoreError),

    #[error(transparent)]
    Scheduler(#[from] SchedulerError),

    #[error("Review session has no current question")]
    SessionFinished,
}

pub type Result<T> = std::result::Result<T, ReviewError>;

/// Questions to present now, in presentation order
pub fn due_today(store: &dyn QuestionStore, now: Timestamp) -> Result<Vec<QuestionRecord>> {
    Ok(store.scan_due(now)?)
}

/// Count active, completed and currently due questions
pub fn compute_stats(store: &dyn QuestionStore, now: Timestamp) -> Result<ReviewStats> {
    let mut stats = ReviewStats::default();

    for record in store.get_all()? {
        match record.status {
            QuestionStatus::Active => stats.active += 1,
            QuestionStatus::Completed => stats.completed += 1,
        }
        if record.is_due(now) {
            stats.due_now += 1;
        }
    }

    Ok(stats)
}

/// Apply an answer outcome to a stored question and persist the new state.
///
/// Read, schedule and write happen under one store lock, so concurrent
/// answers to the same question each build on the previous one.
pub fn answer_question(
    store: &dyn QuestionStore,
    id: QuestionId,
    is_correct: bool,
    now: Timestamp,
) -> Result<QuestionRecord> {
    let mut refused = None;
    let written = store.modify(id, &mut |record| match apply_answer(record, is_correct, now) {
        Ok(next) => Some(next),
        Err(e) => {
            refused = Some(e);
            None
        }
    })?;

    match (written, refused) {
        (Some(next), _) => Ok(next),
        (None, Some(e)) => Err(e.into()),
        (None, None) => Err(QuestionStoreError::NotFound(id).into()),
    }
}

/// Result of answering the current question of a session
#[derive(Debug, Clone)]
pub struct AnswerOutcome {
    pub given: AnswerToken,
    pub is_correct: bool,
    /// Question state after rescheduling
    pub record: QuestionRecord,
}

/// Running totals for a session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionSummary {
    pub answered: usize,
    pub correct: usize,
    pub deleted: usize,
}

/// A pass over the questions that were due when the session started.
///
/// The due set is loaded once; questions answered during the session are
/// not presented again even if an incorrect answer makes them due tomorrow.
pub struct ReviewSession<'a> {
    store: &'a dyn QuestionStore,
    queue: Vec<QuestionRecord>,
    position: usize,
    summary: SessionSummary,
}

impl<'a> ReviewSession<'a> {
    /// Load the due set, optionally capped at `limit` questions
    pub fn start(store: &'a dyn QuestionStore, now: Timestamp, limit: Option<usize>) -> Result<Self> {
        let mut queue = due_today(store, now)?;
        if let Some(limit) = limit {
            queue.truncate(limit);
        }
        log::debug!("Starting review session with {} questions", queue.len());

        Ok(Self {
            store,
            queue,
            position: 0,
            summary: SessionSummary::default(),
        })
    }

    pub fn current(&self) -> Option<&QuestionRecord> {
        self.queue.get(self.position)
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn is_finished(&self) -> bool {
        self.position >= self.queue.len()
    }

    /// 1-based position of the current question and the session size
    pub fn progress(&self) -> (usize, usize) {
        ((self.position + 1).min(self.queue.len()), self.queue.len())
    }

    pub fn summary(&self) -> SessionSummary {
        self.summary
    }

    /// Grade `given` against the current question, reschedule it and move on
    pub fn answer(&mut self, given: AnswerToken, now: Timestamp) -> Result<AnswerOutcome> {
        let current = self.current().ok_or(ReviewError::SessionFinished)?;
        let is_correct = given == current.correct_answer;
        let record = answer_question(self.store, current.id, is_correct, now)?;

        self.queue[self.position] = record.clone();
        self.position += 1;
        self.summary.answered += 1;
        if is_correct {
            self.summary.correct += 1;
        }

        Ok(AnswerOutcome {
            given,
            is_correct,
            record,
        })
    }

    /// Permanently delete the current question; the next one becomes current
    pub fn delete_current(&mut self) -> Result<QuestionRecord> {
        let id = self.current().ok_or(ReviewError::SessionFinished)?.id;
        self.store.delete(id)?;
        self.summary.deleted += 1;
        Ok(self.queue.remove(self.position))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::questions::memory::MemoryQuestionStore;
    use crate::questions::models::{NewQuestion, DAY_MS};

    const NOW: Timestamp = 1_700_000_000_000;

    fn store_with(answers: &[AnswerToken]) -> (MemoryQuestionStore, Vec<QuestionId>) {
        let store = MemoryQuestionStore::new();
        let questions: Vec<NewQuestion> = answers
            .iter()
            .enumerate()
            .map(|(i, answer)| NewQuestion::new(format!("Question {}", i + 1), *answer))
            .collect();
        let ids = store.insert(&questions, NOW).unwrap();
        (store, ids)
    }

    #[test]
    fn test_three_correct_answers_follow_ladder() {
        let (store, ids) = store_with(&[AnswerToken::Two]);
        let id = ids[0];

        let mut now = NOW;
        for (expected_streak, days) in [(1, 1), (2, 3), (3, 7)] {
            let record = answer_question(&store, id, true, now).unwrap();
            assert_eq!(record.streak, expected_streak);
            assert_eq!(record.status, QuestionStatus::Active);
            assert_eq!(record.next_review_date - now, days * DAY_MS);
            assert_eq!(store.get(id).unwrap(), record);
            now = record.next_review_date;
        }
    }

    #[test]
    fn test_miss_after_hit_is_not_cumulative() {
        let (store, ids) = store_with(&[AnswerToken::O]);
        let id = ids[0];

        let first = answer_question(&store, id, true, NOW).unwrap();
        assert_eq!(first.streak, 1);
        assert_eq!(first.next_review_date, NOW + DAY_MS);

        let second_now = NOW + DAY_MS + 60_000;
        let second = answer_question(&store, id, false, second_now).unwrap();
        assert_eq!(second.streak, 0);
        assert_eq!(second.next_review_date, second_now + DAY_MS);
    }

    #[test]
    fn test_completion_after_full_ladder() {
        let (store, ids) = store_with(&[AnswerToken::X]);
        let id = ids[0];

        let mut now = NOW;
        for _ in 0..5 {
            now = answer_question(&store, id, true, now).unwrap().next_review_date;
        }
        let done = answer_question(&store, id, true, now).unwrap();
        assert_eq!(done.status, QuestionStatus::Completed);
        assert_eq!(done.streak, 6);

        // Completed questions stay stored but are never due again
        assert!(due_today(&store, now + 365 * DAY_MS).unwrap().is_empty());
        assert!(store.get(id).is_ok());

        match answer_question(&store, id, true, now) {
            Err(ReviewError::Scheduler(SchedulerError::AlreadyCompleted(err_id))) => assert_eq!(err_id, id),
            other => panic!("expected completed error, got {:?}", other),
        }
        assert_eq!(store.get(id).unwrap().status, QuestionStatus::Completed);
    }

    #[test]
    fn test_answer_missing_question() {
        let store = MemoryQuestionStore::new();
        match answer_question(&store, QuestionId(3), true, NOW) {
            Err(ReviewError::Store(err)) => assert!(err.is_not_found()),
            other => panic!("expected not found, got {:?}", other),
        }
    }

    #[test]
    fn test_concurrent_answers_to_one_question_all_count() {
        use std::sync::Arc;
        use std::thread;

        let store = Arc::new(MemoryQuestionStore::new());
        let id = store.insert(&[NewQuestion::new("q", AnswerToken::One)], NOW).unwrap()[0];

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    answer_question(store.as_ref(), id, true, NOW).unwrap();
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(store.get(id).unwrap().streak, 4);
    }

    #[test]
    fn test_compute_stats() {
        let (store, ids) = store_with(&[AnswerToken::One, AnswerToken::Two, AnswerToken::Three]);

        let stats = compute_stats(&store, NOW).unwrap();
        assert_eq!(stats, ReviewStats { active: 3, completed: 0, due_now: 3 });

        answer_question(&store, ids[0], true, NOW).unwrap();
        let mut done = store.get(ids[1]).unwrap();
        done.status = QuestionStatus::Completed;
        store.update(&done).unwrap();

        let stats = compute_stats(&store, NOW).unwrap();
        assert_eq!(stats, ReviewStats { active: 2, completed: 1, due_now: 1 });

        let tomorrow = compute_stats(&store, NOW + DAY_MS).unwrap();
        assert_eq!(tomorrow.due_now, 2);
    }

    #[test]
    fn test_session_walks_due_set() {
        let (store, ids) = store_with(&[AnswerToken::O, AnswerToken::Three]);
        let mut session = ReviewSession::start(&store, NOW, None).unwrap();

        assert_eq!(session.len(), 2);
        assert_eq!(session.progress(), (1, 2));
        assert_eq!(session.current().unwrap().id, ids[0]);

        let outcome = session.answer(AnswerToken::O, NOW).unwrap();
        assert!(outcome.is_correct);
        assert_eq!(outcome.record.streak, 1);

        let outcome = session.answer(AnswerToken::Four, NOW).unwrap();
        assert!(!outcome.is_correct);
        assert_eq!(outcome.record.next_review_date, NOW + DAY_MS);

        assert!(session.is_finished());
        assert!(session.current().is_none());
        assert_eq!(session.summary(), SessionSummary { answered: 2, correct: 1, deleted: 0 });
        assert!(matches!(
            session.answer(AnswerToken::O, NOW),
            Err(ReviewError::SessionFinished)
        ));

        // Both were rescheduled into the future
        assert!(due_today(&store, NOW).unwrap().is_empty());
    }

    #[test]
    fn test_session_delete_keeps_position() {
        let (store, ids) = store_with(&[AnswerToken::O, AnswerToken::X, AnswerToken::One]);
        let mut session = ReviewSession::start(&store, NOW, None).unwrap();

        session.answer(AnswerToken::O, NOW).unwrap();
        let deleted = session.delete_current().unwrap();
        assert_eq!(deleted.id, ids[1]);
        assert!(store.get(ids[1]).unwrap_err().is_not_found());

        assert_eq!(session.current().unwrap().id, ids[2]);
        assert_eq!(session.progress(), (2, 2));

        session.delete_current().unwrap();
        assert!(session.is_finished());
        assert_eq!(session.summary().deleted, 2);
        assert!(matches!(session.delete_current(), Err(ReviewError::SessionFinished)));
    }

    #[test]
    fn test_session_limit() {
        let (store, _ids) = store_with(&[AnswerToken::O, AnswerToken::X, AnswerToken::One]);
        let session = ReviewSession::start(&store, NOW, Some(2)).unwrap();
        assert_eq!(session.len(), 2);

        let empty = ReviewSession::start(&store, NOW - 1, None).unwrap();
        assert!(empty.is_empty());
        assert!(empty.is_finished());
        assert_eq!(empty.progress(), (0, 0));
    }
}
