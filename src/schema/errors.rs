//! Schema and validation errors
//!
//! Validation messages are returned to clients verbatim, so each one names
//! the offending row and, for type errors, the column and expected type.

use thiserror::Error;

use super::types::{FieldType, MAX_BATCH_ROWS};

/// Result type for schema operations
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Schema registry and row validation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// Table name is not in the registry
    #[error("Unknown table: {0}")]
    UnknownTable(String),

    /// Row has the wrong number of columns
    #[error("Row {row}: expected {expected} columns, found {actual}")]
    RowShape {
        row: usize,
        expected: usize,
        actual: usize,
    },

    /// Token cannot be coerced to the declared column type
    #[error("Row {row}, column '{field}': expected {expected}")]
    FieldType {
        row: usize,
        field: String,
        expected: FieldType,
    },

    /// Row count outside 1..=MAX_BATCH_ROWS
    #[error("Row count must be between 1 and {}, got {actual}", MAX_BATCH_ROWS)]
    BatchSize { actual: usize },

    /// Input could not be decoded as delimited text
    #[error("Row {row}: unreadable input: {reason}")]
    Unreadable { row: usize, reason: String },

    /// Registry definition is malformed
    #[error("Invalid schema definition: {0}")]
    InvalidDefinition(String),

    /// Registry file could not be read
    #[error("Failed to load schema file '{path}': {reason}")]
    LoadFailed { path: String, reason: String },
}

impl SchemaError {
    /// Returns true for errors caused by client input rather than
    /// process configuration.
    pub fn is_client_error(&self) -> bool {
        !matches!(
            self,
            SchemaError::InvalidDefinition(_) | SchemaError::LoadFailed { .. }
        )
    }

    /// Row number the error refers to, if any
    pub fn row(&self) -> Option<usize> {
        match self {
            SchemaError::RowShape { row, .. }
            | SchemaError::FieldType { row, .. }
            | SchemaError::Unreadable { row, .. } => Some(*row),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_shape_message() {
        let err = SchemaError::RowShape {
            row: 3,
            expected: 2,
            actual: 4,
        };
        assert_eq!(err.to_string(), "Row 3: expected 2 columns, found 4");
        assert_eq!(err.row(), Some(3));
    }

    #[test]
    fn test_field_type_message_names_field_and_type() {
        let err = SchemaError::FieldType {
            row: 2,
            field: "id".into(),
            expected: FieldType::Integer,
        };
        assert_eq!(err.to_string(), "Row 2, column 'id': expected integer");
    }

    #[test]
    fn test_batch_size_message() {
        let err = SchemaError::BatchSize { actual: 1001 };
        assert_eq!(
            err.to_string(),
            "Row count must be between 1 and 1000, got 1001"
        );
        assert_eq!(err.row(), None);
    }

    #[test]
    fn test_client_classification() {
        assert!(SchemaError::UnknownTable("x".into()).is_client_error());
        assert!(SchemaError::BatchSize { actual: 0 }.is_client_error());
        assert!(!SchemaError::InvalidDefinition("x".into()).is_client_error());
    }
}
