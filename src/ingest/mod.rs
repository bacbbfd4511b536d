//! Ingestion of questions from external sources
//!
//! Upstream producers (spreadsheets, generated quizzes, document
//! extraction) each have their own shape. Adapters here turn them into
//! [`NewQuestion`]s with canonical answers, dropping rows that cannot be
//! stored and keeping count of them so callers can report partial imports.

pub mod generated;
pub mod normalize;
pub mod spreadsheet;

use std::path::Path;

use serde::Serialize;
use thiserror::Error;

use crate::questions::{NewQuestion, QuestionId, QuestionStore, QuestionStoreError, Timestamp};

pub use normalize::{normalize_correct_answer, parse_answer, RawAnswer};

/// Why a single row could not become a question
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "camelCase")]
pub enum ValidationError {
    #[error("missing correct answer")]
    MissingAnswer,

    #[error("unrecognized correct answer {0:?}")]
    UnrecognizedAnswer(String),

    #[error("correct option index {index} is out of range for {options} options")]
    ChoiceOutOfRange { index: i64, options: usize },

    #[error("malformed item: {0}")]
    MalformedItem(String),
}

/// Failure to read a source as a whole
#[derive(Error, Debug)]
pub enum IngestError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),
}

/// A source row that was dropped during normalization
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RejectedRow {
    /// 1-based row or item number within the source
    pub row: usize,
    pub reason: ValidationError,
}

/// Normalized output of an adapter, ready for the store
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngestBatch {
    pub questions: Vec<NewQuestion>,
    /// Rows without question text, dropped silently
    pub skipped: usize,
    pub rejected: Vec<RejectedRow>,
}

impl IngestBatch {
    /// Record a rejected row and log it
    pub(crate) fn reject(&mut self, row: usize, reason: ValidationError) {
        log::warn!("Skipping row {}: {}", row, reason);
        self.rejected.push(RejectedRow { row, reason });
    }
}

/// Outcome of handing a batch to the store
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportReport {
    pub imported: Vec<QuestionId>,
    pub skipped: usize,
    pub rejected: Vec<RejectedRow>,
}

impl ImportReport {
    /// Rows that carried a question, whether imported or rejected
    pub fn total(&self) -> usize {
        self.imported.len() + self.rejected.len()
    }

    pub fn summary(&self) -> String {
        format!("{} of {} imported", self.imported.len(), self.total())
    }
}

/// Insert every normalized question of `batch` into the store
pub fn import_batch(
    store: &dyn QuestionStore,
    batch: IngestBatch,
    now: Timestamp,
) -> Result<ImportReport, QuestionStoreError> {
    let imported = store.insert(&batch.questions, now)?;

    let report = ImportReport {
        imported,
        skipped: batch.skipped,
        rejected: batch.rejected,
    };
    log::info!(
        "Import finished: {} ({} rejected, {} blank)",
        report.summary(),
        report.rejected.len(),
        report.skipped
    );
    Ok(report)
}

/// Read a source file, choosing the adapter by extension.
///
/// `source` labels the questions; it defaults to the file name.
pub fn load_file(path: &Path, source: Option<&str>) -> Result<IngestBatch, IngestError> {
    let source = source
        .map(str::to_string)
        .or_else(|| path.file_name().map(|name| name.to_string_lossy().into_owned()))
        .unwrap_or_default();

    let extension = path
        .extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "csv" | "tsv" => {
            let delimiter = if extension == "tsv" { b'\t' } else { b',' };
            let file = std::fs::File::open(path)?;
            let rows = spreadsheet::read_delimited(file, delimiter)?;
            Ok(spreadsheet::rows_to_questions(&rows, &source))
        }
        "json" => {
            let content = std::fs::read_to_string(path)?;
            generated::parse_generated_json(&content, &source)
        }
        other => Err(IngestError::UnsupportedFormat(other.to_string())),
    }
}
