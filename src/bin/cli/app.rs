use std::path::Path;

use anyhow::{Context, Result};

use recall_lib::config::Config;
use recall_lib::ingest::{self, ImportReport};
use recall_lib::questions::{
    self, now_millis, QuestionId, QuestionRecord, QuestionStore, ReviewSession, ReviewStats,
    SqliteQuestionStore,
};

/// Shared application state for CLI commands
pub struct App {
    pub config: Config,
    pub store: SqliteQuestionStore,
}

impl App {
    /// Load configuration and open the question database
    pub fn new(config_path: Option<&Path>) -> Result<Self> {
        let config = Config::load(config_path).context("Failed to load config")?;
        let db_path = config
            .database_path()
            .context("Failed to resolve database path")?;
        let store = SqliteQuestionStore::open(&db_path)
            .with_context(|| format!("Failed to open question database at {}", db_path.display()))?;

        Ok(Self { config, store })
    }

    /// Normalize a source file and insert its questions
    pub fn import_file(&self, path: &Path, source: Option<&str>) -> Result<ImportReport> {
        let source = source.or(self.config.import.default_source.as_deref());
        let batch = ingest::load_file(path, source)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        ingest::import_batch(&self.store, batch, now_millis()).context("Failed to store questions")
    }

    pub fn due_questions(&self) -> Result<Vec<QuestionRecord>> {
        questions::due_today(&self.store, now_millis()).context("Failed to load due questions")
    }

    pub fn stats(&self) -> Result<ReviewStats> {
        questions::compute_stats(&self.store, now_millis()).context("Failed to compute stats")
    }

    pub fn get_question(&self, id: i64) -> Result<QuestionRecord> {
        self.store
            .get(QuestionId(id))
            .with_context(|| format!("Failed to load question {}", id))
    }

    pub fn answer(&self, id: i64, is_correct: bool) -> Result<QuestionRecord> {
        questions::answer_question(&self.store, QuestionId(id), is_correct, now_millis())
            .with_context(|| format!("Failed to record answer for question {}", id))
    }

    pub fn delete_question(&self, id: i64) -> Result<()> {
        self.store
            .delete(QuestionId(id))
            .with_context(|| format!("Failed to delete question {}", id))
    }

    /// Start a review session, falling back to the configured session limit
    pub fn start_review(&self, limit: Option<usize>) -> Result<ReviewSession<'_>> {
        let limit = limit.or(self.config.review.session_limit);
        ReviewSession::start(&self.store, now_millis(), limit).context("Failed to start review session")
    }
}
