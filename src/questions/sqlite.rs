//! SQLite-backed question store.
//!
//! One `questions` table keyed by an autoincrement id, so ids are never
//! reused after deletion. The `(status, next_review_date, id)` index serves
//! both the due scan and status filtering without a full table scan.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use rusqlite::{params, Connection, OptionalExtension, Row};

use super::models::{AnswerToken, NewQuestion, QuestionId, QuestionRecord, QuestionStatus, Timestamp};
use super::storage::{QuestionStore, QuestionStoreError, Result};

const SCHEMA_VERSION: i64 = 1;

const SCHEMA_V1: &str = r#"
BEGIN;

CREATE TABLE IF NOT EXISTS questions (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    text TEXT NOT NULL,
    correct_answer TEXT NOT NULL
        CHECK (correct_answer IN ('O', 'X', '1', '2', '3', '4', '5')),
    explanation TEXT NOT NULL DEFAULT '',
    source TEXT NOT NULL DEFAULT '',
    status TEXT NOT NULL DEFAULT 'active'
        CHECK (status IN ('active', 'completed')),
    streak INTEGER NOT NULL DEFAULT 0 CHECK (streak >= 0),
    next_review_date INTEGER NOT NULL,
    created_at INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_questions_due
    ON questions(status, next_review_date, id);

PRAGMA user_version = 1;

COMMIT;
"#;

const COLUMNS: &str =
    "id, text, correct_answer, explanation, source, status, streak, next_review_date, created_at";

/// Row as stored, before the text columns are parsed back into enums
struct StoredRow {
    id: i64,
    text: String,
    correct_answer: String,
    explanation: String,
    source: String,
    status: String,
    streak: i64,
    next_review_date: i64,
    created_at: i64,
}

impl StoredRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            text: row.get(1)?,
            correct_answer: row.get(2)?,
            explanation: row.get(3)?,
            source: row.get(4)?,
            status: row.get(5)?,
            streak: row.get(6)?,
            next_review_date: row.get(7)?,
            created_at: row.get(8)?,
        })
    }

    fn into_record(self) -> Result<QuestionRecord> {
        let id = self.id;
        let corrupt = |reason: String| QuestionStoreError::Corrupt { id, reason };

        let correct_answer = AnswerToken::try_from(self.correct_answer.as_str())
            .map_err(|e| corrupt(e.to_string()))?;
        let status = QuestionStatus::parse(&self.status)
            .ok_or_else(|| corrupt(format!("unknown status {:?}", self.status)))?;
        let streak = u32::try_from(self.streak)
            .map_err(|_| corrupt(format!("streak out of range: {}", self.streak)))?;

        Ok(QuestionRecord {
            id: QuestionId(id),
            text: self.text,
            correct_answer,
            explanation: self.explanation,
            source: self.source,
            status,
            streak,
            next_review_date: self.next_review_date,
            created_at: self.created_at,
        })
    }
}

/// Durable question store on a single SQLite database file
pub struct SqliteQuestionStore {
    conn: Mutex<Connection>,
    db_path: Option<PathBuf>,
}

impl SqliteQuestionStore {
    /// Open (or create) the store at the given path.
    pub fn open(db_path: impl Into<PathBuf>) -> Result<Self> {
        let db_path = db_path.into();

        // Ensure parent directory exists
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(&db_path)?;
        migrate(&conn)?;
        log::info!("Opened question store at {:?}", db_path);

        Ok(Self {
            conn: Mutex::new(conn),
            db_path: Some(db_path),
        })
    }

    /// Open a private store that lives only as long as this value
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        migrate(&conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
            db_path: None,
        })
    }

    /// Location of the database file, `None` for in-memory stores
    pub fn path(&self) -> Option<&Path> {
        self.db_path.as_deref()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| QuestionStoreError::Poisoned)
    }

    fn query_records(&self, sql: &str, params: impl rusqlite::Params) -> Result<Vec<QuestionRecord>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(sql)?;
        let rows = stmt
            .query_map(params, StoredRow::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        rows.into_iter().map(StoredRow::into_record).collect()
    }
}

/// Bring the schema up to [`SCHEMA_VERSION`]
fn migrate(conn: &Connection) -> Result<()> {
    let version: i64 = conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;

    match version {
        0 => {
            conn.execute_batch(SCHEMA_V1)?;
            log::info!("Created question schema version {}", SCHEMA_VERSION);
            Ok(())
        }
        SCHEMA_VERSION => Ok(()),
        other => Err(QuestionStoreError::UnsupportedSchema(other)),
    }
}

fn read_record(conn: &Connection, id: QuestionId) -> Result<Option<QuestionRecord>> {
    conn.query_row(
        &format!("SELECT {} FROM questions WHERE id = ?1", COLUMNS),
        params![id.0],
        StoredRow::from_row,
    )
    .optional()?
    .map(StoredRow::into_record)
    .transpose()
}

/// Overwrite every mutable column; returns the number of rows changed
fn write_record(conn: &Connection, record: &QuestionRecord) -> Result<usize> {
    let changed = conn.execute(
        "UPDATE questions
         SET text = ?2, correct_answer = ?3, explanation = ?4, source = ?5,
             status = ?6, streak = ?7, next_review_date = ?8
         WHERE id = ?1",
        params![
            record.id.0,
            record.text,
            record.correct_answer.as_str(),
            record.explanation,
            record.source,
            record.status.as_str(),
            i64::from(record.streak),
            record.next_review_date,
        ],
    )?;
    Ok(changed)
}

impl QuestionStore for SqliteQuestionStore {
    fn insert(&self, questions: &[NewQuestion], now: Timestamp) -> Result<Vec<QuestionId>> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;

        let mut ids = Vec::with_capacity(questions.len());
        {
            let mut stmt = tx.prepare(
                "INSERT INTO questions
                    (text, correct_answer, explanation, source, status, streak, next_review_date, created_at)
                 VALUES (?1, ?2, ?3, ?4, 'active', 0, ?5, ?5)",
            )?;
            for question in questions {
                let id = stmt.insert(params![
                    question.text,
                    question.correct_answer.as_str(),
                    question.explanation,
                    question.source,
                    now,
                ])?;
                ids.push(QuestionId(id));
            }
        }

        tx.commit()?;
        log::debug!("Inserted {} questions", ids.len());
        Ok(ids)
    }

    fn get(&self, id: QuestionId) -> Result<QuestionRecord> {
        let conn = self.lock()?;
        read_record(&conn, id)?.ok_or(QuestionStoreError::NotFound(id))
    }

    fn update(&self, record: &QuestionRecord) -> Result<()> {
        let conn = self.lock()?;
        if write_record(&conn, record)? == 0 {
            return Err(QuestionStoreError::NotFound(record.id));
        }

        log::debug!(
            "Updated question {} (streak {}, {})",
            record.id,
            record.streak,
            record.status.as_str()
        );
        Ok(())
    }

    fn modify(
        &self,
        id: QuestionId,
        f: &mut dyn FnMut(&QuestionRecord) -> Option<QuestionRecord>,
    ) -> Result<Option<QuestionRecord>> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;

        let existing = read_record(&tx, id)?.ok_or(QuestionStoreError::NotFound(id))?;
        let Some(mut updated) = f(&existing) else {
            return Ok(None);
        };
        updated.id = id;
        updated.created_at = existing.created_at;

        write_record(&tx, &updated)?;
        tx.commit()?;

        log::debug!(
            "Modified question {} (streak {}, {})",
            id,
            updated.streak,
            updated.status.as_str()
        );
        Ok(Some(updated))
    }

    fn delete(&self, id: QuestionId) -> Result<()> {
        let conn = self.lock()?;
        let removed = conn.execute("DELETE FROM questions WHERE id = ?1", params![id.0])?;
        if removed > 0 {
            log::debug!("Deleted question {}", id);
        }
        Ok(())
    }

    fn scan_due(&self, now: Timestamp) -> Result<Vec<QuestionRecord>> {
        self.query_records(
            &format!(
                "SELECT {} FROM questions
                 WHERE status = 'active' AND next_review_date <= ?1
                 ORDER BY next_review_date ASC, id ASC",
                COLUMNS
            ),
            params![now],
        )
    }

    fn get_all(&self) -> Result<Vec<QuestionRecord>> {
        self.query_records(&format!("SELECT {} FROM questions ORDER BY id ASC", COLUMNS), [])
    }
}
