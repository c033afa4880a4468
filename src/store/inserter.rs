//! Batch inserter
//!
//! Writes one validated batch atomically. The column list comes from the
//! registry schema, never from request text.

use crate::schema::{TableSchema, ValidatedBatch, Value};

use super::backend::RowStore;
use super::errors::{StoreError, StoreResult};
use super::statements;

/// Inserts validated batches for a single table.
pub struct BatchInserter<'a, S: RowStore + ?Sized> {
    store: &'a S,
    schema: &'a TableSchema,
}

impl<'a, S: RowStore + ?Sized> BatchInserter<'a, S> {
    pub fn new(store: &'a S, schema: &'a TableSchema) -> Self {
        Self { store, schema }
    }

    /// Insert every row of `batch` in one transaction.
    ///
    /// Returns the number of rows committed. On error nothing from the
    /// batch is committed and no retry is attempted.
    pub fn insert(&self, batch: &ValidatedBatch) -> StoreResult<usize> {
        if batch.table() != self.schema.name() {
            return Err(StoreError::TableMismatch {
                batch: batch.table().to_string(),
                table: self.schema.name().to_string(),
            });
        }

        let mut params: Vec<Vec<Value>> = Vec::with_capacity(batch.len());
        for (i, row) in batch.rows().iter().enumerate() {
            if !row.field_names().eq(self.schema.field_names()) {
                return Err(StoreError::ColumnMismatch {
                    row: i + 1,
                    table: self.schema.name().to_string(),
                });
            }
            params.push(row.values().cloned().collect());
        }

        self.store
            .execute_in_transaction(&statements::insert(self.schema), &params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{RowValidator, SchemaRegistry};
    use crate::store::DuckDbStore;

    #[test]
    fn test_insert_validated_batch() {
        let registry = SchemaRegistry::builtin().unwrap();
        let jobs = registry.lookup("jobs").unwrap();
        let store = DuckDbStore::open_in_memory().unwrap();
        store.ensure_table(jobs).unwrap();

        let batch = RowValidator::new(jobs)
            .validate_batch(b"1,loc_1\n2,loc_2\n3,loc_3\n")
            .unwrap();
        let inserted = BatchInserter::new(&store, jobs).insert(&batch).unwrap();

        assert_eq!(inserted, 3);
        assert_eq!(store.select_as_text(jobs).unwrap().len(), 3);
    }

    #[test]
    fn test_batch_for_other_table_rejected() {
        let registry = SchemaRegistry::builtin().unwrap();
        let jobs = registry.lookup("jobs").unwrap();
        let departments = registry.lookup("departments").unwrap();
        let store = DuckDbStore::open_in_memory().unwrap();

        let batch = RowValidator::new(departments)
            .validate_batch(b"1,2\n")
            .unwrap();
        let err = BatchInserter::new(&store, jobs).insert(&batch).unwrap_err();
        assert!(matches!(err, StoreError::TableMismatch { .. }));
    }
}
