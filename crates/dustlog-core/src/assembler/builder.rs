//! Pending record builder
//!
//! Tracks which fields have been seen for the record being assembled. A record is
//! complete when the seen set equals the required set; re-observing a field only
//! overwrites its value.

use std::collections::BTreeMap;

use crate::record::Record;
use crate::schema::{Field, FieldSet};
use crate::timing::Timestamp;

/// The record currently being assembled
#[derive(Debug, Clone)]
pub struct RecordBuilder {
    required: FieldSet,
    seen: FieldSet,
    values: BTreeMap<Field, f64>,
    last_timestamp: Option<Timestamp>,
}

impl RecordBuilder {
    /// Create an empty builder for the given required fields
    pub fn new(required: FieldSet) -> Self {
        Self {
            required,
            seen: FieldSet::empty(),
            values: BTreeMap::new(),
            last_timestamp: None,
        }
    }

    /// Store the values of one matched line
    ///
    /// Returns the finished record when this line completes it; the builder is then
    /// empty again.
    pub fn apply(&mut self, timestamp: Timestamp, values: Vec<(Field, f64)>) -> Option<Record> {
        for (field, value) in values {
            self.seen.insert(field);
            self.values.insert(field, value);
        }
        self.last_timestamp = Some(timestamp);

        if self.is_complete() {
            self.take()
        } else {
            None
        }
    }

    /// Whether every required field has been seen
    pub fn is_complete(&self) -> bool {
        self.seen == self.required
    }

    /// Fields seen so far
    pub fn seen(&self) -> FieldSet {
        self.seen
    }

    /// Fields a record needs
    pub fn required(&self) -> FieldSet {
        self.required
    }

    /// Value currently pending for a field
    pub fn pending(&self, field: Field) -> Option<f64> {
        self.values.get(&field).copied()
    }

    /// Discard the pending record
    pub fn reset(&mut self) {
        self.seen.clear();
        self.values.clear();
        self.last_timestamp = None;
    }

    fn take(&mut self) -> Option<Record> {
        let timestamp = self.last_timestamp.take()?;
        let values = std::mem::take(&mut self.values);
        self.seen.clear();
        Some(Record::new(timestamp, values))
    }
}
