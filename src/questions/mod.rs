//! Question store and review scheduling
//!
//! This module provides:
//! - Question records and canonical answer tokens
//! - The store interface with SQLite and in-memory implementations
//! - Fixed-ladder spaced repetition scheduling
//! - Due-set query, dashboard stats and review sessions

pub mod algorithm;
pub mod memory;
pub mod models;
pub mod review;
pub mod sqlite;
pub mod storage;

pub use algorithm::{apply_answer, SchedulerError, LADDER};
pub use memory::MemoryQuestionStore;
pub use models::*;
pub use review::{answer_question, compute_stats, due_today, ReviewError, ReviewSession};
pub use sqlite::SqliteQuestionStore;
pub use storage::{QuestionStore, QuestionStoreError};
