//! Data-capture state for the ADD and UPDATE modes.
//!
//! DESIGN
//! ======
//! `EntryState` holds the values typed into the instantiated form, keyed by
//! field id, plus the current validation message per field. It is seeded
//! empty for ADD and from the selected record for UPDATE, and it is thrown
//! away on every mode switch. The document is never touched from here.

#[cfg(test)]
#[path = "entry_test.rs"]
mod entry_test;

use std::collections::BTreeMap;

use regex::Regex;
use serde_json::{Map, Value};
use tracing::warn;

use crate::doc::{FormDefinition, FormField};
use crate::records::Record;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntryState {
    values: Map<String, Value>,
    errors: BTreeMap<String, String>,
}

impl EntryState {
    /// Empty entry for a blank form.
    #[must_use]
    pub fn blank() -> Self {
        Self::default()
    }

    /// Entry pre-bound to an existing record's fields.
    #[must_use]
    pub fn from_record(record: &Record) -> Self {
        Self { values: record.fields.clone(), errors: BTreeMap::new() }
    }

    #[must_use]
    pub fn value(&self, field_id: &str) -> Option<&Value> {
        self.values.get(field_id)
    }

    #[must_use]
    pub fn values(&self) -> &Map<String, Value> {
        &self.values
    }

    #[must_use]
    pub fn error(&self, field_id: &str) -> Option<&str> {
        self.errors.get(field_id).map(String::as_str)
    }

    #[must_use]
    pub fn errors(&self) -> &BTreeMap<String, String> {
        &self.errors
    }

    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Record a value and revalidate that field.
    pub fn set_value(&mut self, field: &FormField, value: Value) {
        self.values.insert(field.base.id.clone(), value);
        self.validate_field(field);
    }

    /// Revalidate every field of `doc`. Returns `true` when no errors remain.
    pub fn validate_all(&mut self, doc: &FormDefinition) -> bool {
        for field in doc.fields() {
            self.validate_field(field);
        }
        !self.has_errors()
    }

    fn validate_field(&mut self, field: &FormField) {
        let id = &field.base.id;
        let Some(rule) = &field.validation else {
            self.errors.remove(id);
            return;
        };
        let regex = match Regex::new(&rule.regex) {
            Ok(regex) => regex,
            Err(e) => {
                warn!(field_id = %id, error = %e, "invalid validation regex; field not validated");
                self.errors.remove(id);
                return;
            }
        };
        let text = self.values.get(id).map(value_text).unwrap_or_default();
        if text.is_empty() || !regex.is_match(&text) {
            self.errors.insert(id.clone(), rule.message.clone());
        } else {
            self.errors.remove(id);
        }
    }
}

/// Text form of a captured value for regex matching.
fn value_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
