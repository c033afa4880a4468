//! Backup records
//!
//! Every column is widened to text when backed up, whatever its declared
//! type, so a record is simply an ordered list of (field, text) pairs.

use serde::Serialize;

use crate::schema::TableSchema;

/// One row as stored in a backup file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BackupRecord {
    fields: Vec<(String, String)>,
}

impl BackupRecord {
    pub fn new(fields: Vec<(String, String)>) -> Self {
        Self { fields }
    }

    /// Pairs the schema's field names with a row of text values.
    ///
    /// Returns `None` if the value count differs from the field count.
    pub fn from_row(schema: &TableSchema, values: Vec<String>) -> Option<Self> {
        if values.len() != schema.field_count() {
            return None;
        }
        Some(Self {
            fields: schema.field_names().map(String::from).zip(values).collect(),
        })
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, v)| v.as_str())
    }

    pub fn fields(&self) -> &[(String, String)] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
