//! Record store: the in-memory list of submitted form data.
//!
//! Records are `{id, ...fields}` objects keyed by a numeric id. List, view,
//! update, and delete address records by id only. The store also tracks the
//! currently selected record for the VIEW, UPDATE, and record-JSON modes.

#[cfg(test)]
#[path = "records_test.rs"]
mod records_test;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{EditorError, TargetKind};

pub type RecordId = u64;

/// One submitted record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: RecordId,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Record {
    /// Compact one-line JSON of the whole record.
    #[must_use]
    pub fn summary(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    records: Vec<Record>,
    selected: Option<RecordId>,
}

impl RecordStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn from_records(records: Vec<Record>) -> Self {
        Self { records, selected: None }
    }

    #[must_use]
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[must_use]
    pub fn get(&self, id: RecordId) -> Option<&Record> {
        self.records.iter().find(|r| r.id == id)
    }

    /// Append a record with the next free id (one past the current maximum).
    pub fn insert(&mut self, fields: Map<String, Value>) -> RecordId {
        let id = self.records.iter().map(|r| r.id).max().map_or(1, |max| max + 1);
        self.records.push(Record { id, fields });
        id
    }

    /// Replace the fields of record `id`.
    ///
    /// # Errors
    ///
    /// Returns `MissingTarget` if no record has `id`.
    pub fn update(&mut self, id: RecordId, fields: Map<String, Value>) -> Result<(), EditorError> {
        let record = self
            .records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| EditorError::missing(TargetKind::Record, id.to_string()))?;
        record.fields = fields;
        Ok(())
    }

    /// Replace the stored record sharing `record.id`.
    ///
    /// # Errors
    ///
    /// Returns `MissingTarget` if no record has that id.
    pub fn replace(&mut self, record: Record) -> Result<(), EditorError> {
        self.update(record.id, record.fields)
    }

    /// Remove record `id`, clearing the selection if it pointed there.
    pub fn delete(&mut self, id: RecordId) -> Option<Record> {
        let index = self.records.iter().position(|r| r.id == id)?;
        if self.selected == Some(id) {
            self.clear_selection();
        }
        Some(self.records.remove(index))
    }

    /// Select record `id`.
    ///
    /// # Errors
    ///
    /// Returns `MissingTarget` if no record has `id`; the selection is unchanged.
    pub fn select(&mut self, id: RecordId) -> Result<&Record, EditorError> {
        let index = self
            .records
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| EditorError::missing(TargetKind::Record, id.to_string()))?;
        self.selected = Some(id);
        Ok(&self.records[index])
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    #[must_use]
    pub fn selected(&self) -> Option<&Record> {
        self.selected.and_then(|id| self.get(id))
    }

    #[must_use]
    pub fn selected_id(&self) -> Option<RecordId> {
        self.selected
    }
}
