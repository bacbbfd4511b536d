//! In-memory question store.
//!
//! Mirrors the SQLite store's semantics on a `BTreeMap`, with a sorted
//! `(next_review_date, id)` set over active records standing in for the due
//! index. Nothing is written to disk.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Mutex, MutexGuard};

use super::models::{NewQuestion, QuestionId, QuestionRecord, QuestionStatus, Timestamp};
use super::storage::{QuestionStore, QuestionStoreError, Result};

#[derive(Default)]
struct Table {
    records: BTreeMap<QuestionId, QuestionRecord>,
    /// Active records only
    due_index: BTreeSet<(Timestamp, QuestionId)>,
    last_id: i64,
}

impl Table {
    fn index(&mut self, record: &QuestionRecord) {
        if record.status == QuestionStatus::Active {
            self.due_index.insert((record.next_review_date, record.id));
        }
    }

    fn unindex(&mut self, record: &QuestionRecord) {
        self.due_index.remove(&(record.next_review_date, record.id));
    }
}

#[derive(Default)]
pub struct MemoryQuestionStore {
    table: Mutex<Table>,
}

impl MemoryQuestionStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Table>> {
        self.table.lock().map_err(|_| QuestionStoreError::Poisoned)
    }
}

impl QuestionStore for MemoryQuestionStore {
    fn insert(&self, questions: &[NewQuestion], now: Timestamp) -> Result<Vec<QuestionId>> {
        let mut table = self.lock()?;

        let mut ids = Vec::with_capacity(questions.len());
        for question in questions {
            table.last_id += 1;
            let id = QuestionId(table.last_id);
            let record = QuestionRecord::from_new(id, question.clone(), now);
            table.index(&record);
            table.records.insert(id, record);
            ids.push(id);
        }

        Ok(ids)
    }

    fn get(&self, id: QuestionId) -> Result<QuestionRecord> {
        let table = self.lock()?;
        table
            .records
            .get(&id)
            .cloned()
            .ok_or(QuestionStoreError::NotFound(id))
    }

    fn update(&self, record: &QuestionRecord) -> Result<()> {
        let mut table = self.lock()?;
        let existing = table
            .records
            .get(&record.id)
            .cloned()
            .ok_or(QuestionStoreError::NotFound(record.id))?;

        let mut updated = record.clone();
        updated.created_at = existing.created_at;

        table.unindex(&existing);
        table.index(&updated);
        table.records.insert(updated.id, updated);
        Ok(())
    }

    fn modify(
        &self,
        id: QuestionId,
        f: &mut dyn FnMut(&QuestionRecord) -> Option<QuestionRecord>,
    ) -> Result<Option<QuestionRecord>> {
        let mut table = self.lock()?;
        let existing = table
            .records
            .get(&id)
            .cloned()
            .ok_or(QuestionStoreError::NotFound(id))?;

        let Some(mut updated) = f(&existing) else {
            return Ok(None);
        };
        updated.id = id;
        updated.created_at = existing.created_at;

        table.unindex(&existing);
        table.index(&updated);
        table.records.insert(id, updated.clone());
        Ok(Some(updated))
    }

    fn delete(&self, id: QuestionId) -> Result<()> {
        let mut table = self.lock()?;
        if let Some(record) = table.records.remove(&id) {
            table.unindex(&record);
        }
        Ok(())
    }

    fn scan_due(&self, now: Timestamp) -> Result<Vec<QuestionRecord>> {
        let table = self.lock()?;
        let due = table
            .due_index
            .range(..=(now, QuestionId(i64::MAX)))
            .filter_map(|(_, id)| table.records.get(id).cloned())
            .collect();
        Ok(due)
    }

    fn get_all(&self) -> Result<Vec<QuestionRecord>> {
        let table = self.lock()?;
        Ok(table.records.values().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::questions::models::{AnswerToken, DAY_MS};
    use crate::questions::storage::contract;

    #[test]
    fn test_store_contract() {
        contract::run_all(MemoryQuestionStore::new);
    }

    #[test]
    fn test_index_tracks_status_changes() {
        let store = MemoryQuestionStore::new();
        let ids = store
            .insert(&[NewQuestion::new("q", AnswerToken::Four)], contract::NOW)
            .unwrap();

        let mut record = store.get(ids[0]).unwrap();
        record.status = QuestionStatus::Completed;
        store.update(&record).unwrap();
        assert!(store.scan_due(contract::NOW + DAY_MS).unwrap().is_empty());

        // Reactivated records are indexed again under their new due date
        record.status = QuestionStatus::Active;
        record.next_review_date = contract::NOW + DAY_MS;
        store.update(&record).unwrap();
        assert!(store.scan_due(contract::NOW).unwrap().is_empty());
        assert_eq!(store.scan_due(contract::NOW + DAY_MS).unwrap().len(), 1);

        let table = store.lock().unwrap();
        assert_eq!(table.due_index.len(), 1);
    }
}
