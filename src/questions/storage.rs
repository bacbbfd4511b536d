//! Question store interface
//!
//! The store exclusively owns persistence of question records. The scheduler
//! and the stats aggregator only compute values that are handed back here.
//!
//! Implementations:
//! - [`SqliteQuestionStore`](super::SqliteQuestionStore): durable, on-disk database
//! - [`MemoryQuestionStore`](super::MemoryQuestionStore): in-process table for tests
//!   and throwaway sessions

use thiserror::Error;

use super::models::{NewQuestion, QuestionId, QuestionRecord, Timestamp};

#[derive(Error, Debug)]
pub enum QuestionStoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Question not found: {0}")]
    NotFound(QuestionId),

    #[error("Corrupt question {id}: {reason}")]
    Corrupt { id: i64, reason: String },

    #[error("Unsupported schema version: {0}")]
    UnsupportedSchema(i64),

    #[error("Question store lock poisoned")]
    Poisoned,
}

impl QuestionStoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

pub type Result<T> = std::result::Result<T, QuestionStoreError>;

/// Persistent keyed collection of question records.
///
/// Every operation is serialized against the others, so a reader never
/// observes a half-applied update and an update followed by a get on the
/// same id always sees the update.
pub trait QuestionStore: Send + Sync {
    /// Persist new questions as active and immediately due.
    ///
    /// Returns the assigned ids in input order. The batch is atomic: on error
    /// nothing is inserted.
    fn insert(&self, questions: &[NewQuestion], now: Timestamp) -> Result<Vec<QuestionId>>;

    fn get(&self, id: QuestionId) -> Result<QuestionRecord>;

    /// Overwrite the record stored under `record.id`.
    ///
    /// `created_at` is immutable and keeps its stored value.
    fn update(&self, record: &QuestionRecord) -> Result<()>;

    /// Read, transform and write back one record under a single lock.
    ///
    /// `f` sees the stored record and returns its replacement, or `None` to
    /// leave it untouched. Returns what was written (`created_at` keeps its
    /// stored value), `None` if `f` declined, or `NotFound` for a missing id.
    fn modify(
        &self,
        id: QuestionId,
        f: &mut dyn FnMut(&QuestionRecord) -> Option<QuestionRecord>,
    ) -> Result<Option<QuestionRecord>>;

    /// Remove a record permanently. Deleting a missing id is a no-op.
    fn delete(&self, id: QuestionId) -> Result<()>;

    /// Active records with `next_review_date <= now`, oldest due date first,
    /// ties broken by id.
    fn scan_due(&self, now: Timestamp) -> Result<Vec<QuestionRecord>>;

    /// Every record, ordered by id.
    fn get_all(&self) -> Result<Vec<QuestionRecord>>;
}
