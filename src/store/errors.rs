//! # Row Store Errors

use thiserror::Error;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Row store errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Store could not be opened or a transaction could not begin/commit
    #[error("Store connection error: {0}")]
    Connection(String),

    /// A row was rejected; the surrounding transaction was rolled back
    #[error("Insert failed at row {row}: {reason}")]
    Insert { row: usize, reason: String },

    /// Statement outside a batch failed
    #[error("Statement failed: {0}")]
    Statement(String),

    /// Read query failed
    #[error("Query failed: {0}")]
    Query(String),

    /// Batch does not belong to the table it is being written to
    #[error("Batch for table '{batch}' cannot be inserted into '{table}'")]
    TableMismatch { batch: String, table: String },

    /// Row fields differ from the schema's column list
    #[error("Row {row} does not match the column list of table '{table}'")]
    ColumnMismatch { row: usize, table: String },
}

impl StoreError {
    /// Whether the failure came from the store itself rather than from
    /// the caller handing over a mismatched batch.
    pub fn is_store_fault(&self) -> bool {
        !matches!(
            self,
            StoreError::TableMismatch { .. } | StoreError::ColumnMismatch { .. }
        )
    }
}
