//! Fixed-ladder review scheduling
//!
//! Every consecutive correct answer moves a question one step up a ladder of
//! review intervals:
//! - 1st correct: 1 day
//! - 2nd correct: 3 days
//! - 3rd correct: 7 days
//! - 4th correct: 14 days
//! - 5th correct: 30 days
//! - 6th correct: completed, never scheduled again
//!
//! An incorrect answer resets the streak and brings the question back the next day.

use thiserror::Error;

use super::models::{QuestionId, QuestionRecord, QuestionStatus, Timestamp, DAY_MS};

/// Review intervals in days, indexed by `streak - 1`
pub const LADDER: [i64; 5] = [1, 3, 7, 14, 30];

/// Interval after an incorrect answer
const RELEARN_DAYS: i64 = 1;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchedulerError {
    #[error("Question {0} is already completed")]
    AlreadyCompleted(QuestionId),
}

/// Days until the next review for a question whose streak just became `streak`.
///
/// Returns `None` once the ladder is exhausted.
pub fn interval_for_streak(streak: u32) -> Option<i64> {
    match streak {
        0 => Some(RELEARN_DAYS),
        n => LADDER.get(n as usize - 1).copied(),
    }
}

/// Compute the record state after the learner answers it.
///
/// The record must still be active; answering a completed question is a
/// caller bug and is reported as [`SchedulerError::AlreadyCompleted`].
pub fn apply_answer(
    record: &QuestionRecord,
    is_correct: bool,
    now: Timestamp,
) -> Result<QuestionRecord, SchedulerError> {
    if record.status == QuestionStatus::Completed {
        return Err(SchedulerError::AlreadyCompleted(record.id));
    }

    let mut next = record.clone();

    if is_correct {
        let streak = record.streak.saturating_add(1);
        match interval_for_streak(streak) {
            Some(days) => next.next_review_date = due_after(record, now, days),
            // Past the last rung: keep the old due date, it no longer matters
            None => next.status = QuestionStatus::Completed,
        }
        next.streak = streak;
    } else {
        next.streak = 0;
        next.next_review_date = due_after(record, now, RELEARN_DAYS);
    }

    Ok(next)
}

/// Due date `days` after `now`, never earlier than the record's creation
fn due_after(record: &QuestionRecord, now: Timestamp, days: i64) -> Timestamp {
    now.saturating_add(days * DAY_MS).max(record.created_at)
}

/// Intervals the learner would get for each outcome: `(correct, incorrect)`.
///
/// The correct interval is `None` when a correct answer completes the question.
pub fn preview_intervals(record: &QuestionRecord) -> (Option<i64>, i64) {
    let correct = interval_for_streak(record.streak.saturating_add(1));
    (correct, RELEARN_DAYS)
}

/// Format an interval in days to a human-readable string
pub fn format_interval(days: i64) -> String {
    match days {
        i64::MIN..=0 => "now".to_string(),
        1..=6 => format!("{}d", days),
        7..=29 => format!("{}w", days / 7),
        30..=364 => format!("{}mo", days / 30),
        _ => format!("{}y", days / 365),
    }
}

/// Describe when a question becomes due relative to `now`, rounding up to whole days
pub fn format_due(next_review_date: Timestamp, now: Timestamp) -> String {
    let remaining = next_review_date.saturating_sub(now);
    if remaining <= 0 {
        return "due now".to_string();
    }
    let days = (remaining + DAY_MS - 1) / DAY_MS;
    format!("in {}", format_interval(days))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::questions::models::{AnswerToken, NewQuestion};

    const NOW: Timestamp = 1_700_000_000_000;

    fn record_with_streak(streak: u32) -> QuestionRecord {
        let mut record =
            QuestionRecord::from_new(QuestionId(1), NewQuestion::new("Q", AnswerToken::Two), NOW - DAY_MS);
        record.streak = streak;
        record
    }

    #[test]
    fn test_correct_answer_climbs_ladder() {
        for (k, days) in LADDER.iter().enumerate() {
            let record = record_with_streak(k as u32);
            let result = apply_answer(&record, true, NOW).unwrap();

            assert_eq!(result.streak, k as u32 + 1);
            assert_eq!(result.status, QuestionStatus::Active);
            assert_eq!(result.next_review_date, NOW + days * DAY_MS);
        }
    }

    #[test]
    fn test_clearing_last_rung_completes() {
        let record = record_with_streak(5);
        let result = apply_answer(&record, true, NOW).unwrap();

        assert_eq!(result.status, QuestionStatus::Completed);
        assert_eq!(result.streak, 6);
        assert_eq!(result.next_review_date, record.next_review_date);
    }

    #[test]
    fn test_incorrect_resets_regardless_of_streak() {
        for streak in [0, 1, 4, 5] {
            let record = record_with_streak(streak);
            let result = apply_answer(&record, false, NOW).unwrap();

            assert_eq!(result.streak, 0);
            assert_eq!(result.status, QuestionStatus::Active);
            assert_eq!(result.next_review_date, NOW + DAY_MS);
        }
    }

    #[test]
    fn test_content_fields_unchanged() {
        let mut record = record_with_streak(2);
        record.explanation = "Article 9".to_string();
        record.source = "past-exam.csv".to_string();

        let result = apply_answer(&record, true, NOW).unwrap();
        assert_eq!(result.id, record.id);
        assert_eq!(result.text, record.text);
        assert_eq!(result.correct_answer, record.correct_answer);
        assert_eq!(result.explanation, record.explanation);
        assert_eq!(result.source, record.source);
        assert_eq!(result.created_at, record.created_at);
    }

    #[test]
    fn test_completed_record_is_rejected() {
        let mut record = record_with_streak(6);
        record.status = QuestionStatus::Completed;

        assert_eq!(
            apply_answer(&record, true, NOW),
            Err(SchedulerError::AlreadyCompleted(QuestionId(1)))
        );
        assert!(apply_answer(&record, false, NOW).is_err());
    }

    #[test]
    fn test_due_date_never_before_creation() {
        let record = record_with_streak(0);
        // Clock went backwards by more than a day
        let skewed = record.created_at - 3 * DAY_MS;

        let result = apply_answer(&record, false, skewed).unwrap();
        assert_eq!(result.next_review_date, record.created_at);
    }

    #[test]
    fn test_preview_intervals() {
        assert_eq!(preview_intervals(&record_with_streak(0)), (Some(1), 1));
        assert_eq!(preview_intervals(&record_with_streak(2)), (Some(7), 1));
        assert_eq!(preview_intervals(&record_with_streak(5)), (None, 1));
    }

    #[test]
    fn test_format_interval() {
        assert_eq!(format_interval(0), "now");
        assert_eq!(format_interval(1), "1d");
        assert_eq!(format_interval(3), "3d");
        assert_eq!(format_interval(7), "1w");
        assert_eq!(format_interval(14), "2w");
        assert_eq!(format_interval(30), "1mo");
        assert_eq!(format_interval(90), "3mo");
        assert_eq!(format_interval(730), "2y");
    }

    #[test]
    fn test_format_due() {
        assert_eq!(format_due(NOW, NOW), "due now");
        assert_eq!(format_due(NOW - 5, NOW), "due now");
        assert_eq!(format_due(NOW + 1, NOW), "in 1d");
        assert_eq!(format_due(NOW + 3 * DAY_MS, NOW), "in 3d");
        assert_eq!(format_due(NOW + 14 * DAY_MS, NOW), "in 2w");
    }
}
