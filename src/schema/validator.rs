//! Row validator for delimited uploads
//!
//! Validation semantics:
//! - Input is comma-delimited, no header row, RFC-4180 quoting
//! - Rows are numbered from 1; an empty line is a row with no columns
//! - Every row must have exactly one token per schema field
//! - Every token must coerce to its field's type
//! - The first failing row aborts the whole request; no partial result

use csv::{ReaderBuilder, StringRecord};

use super::errors::{SchemaError, SchemaResult};
use super::types::{TableSchema, ValidatedBatch, ValidatedRow};

/// Field delimiter for uploaded files
pub const DELIMITER: u8 = b',';

/// Validates raw delimited input against one table schema.
///
/// The validator holds no state of its own and never mutates the schema.
pub struct RowValidator<'a> {
    schema: &'a TableSchema,
}

impl<'a> RowValidator<'a> {
    /// Creates a validator for the given table.
    pub fn new(schema: &'a TableSchema) -> Self {
        Self { schema }
    }

    /// Parses and type-checks every row of `input`.
    ///
    /// # Errors
    ///
    /// - `RowShape` for the first row whose token count differs from the
    ///   schema's field count
    /// - `FieldType` for the first token that does not coerce
    /// - `Unreadable` if the input is not valid UTF-8 delimited text
    pub fn validate(&self, input: &[u8]) -> SchemaResult<Vec<ValidatedRow>> {
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .delimiter(DELIMITER)
            .from_reader(input);

        let expected = self.schema.field_count();
        let mut rows = Vec::new();
        let mut record = StringRecord::new();
        let mut row = 0;
        let mut consumed = 0;

        loop {
            let more = reader
                .read_record(&mut record)
                .map_err(|e| SchemaError::Unreadable {
                    row: row + 1,
                    reason: e.to_string(),
                })?;
            if !more {
                break;
            }

            // The reader skips empty lines; anything between the end of the
            // previous record and this one is a row of zero columns.
            if blank_lines(input, consumed) > 0 {
                return Err(SchemaError::RowShape {
                    row: row + 1,
                    expected,
                    actual: 0,
                });
            }
            row += 1;
            consumed = reader.position().byte() as usize;

            if record.len() != expected {
                return Err(SchemaError::RowShape {
                    row,
                    expected,
                    actual: record.len(),
                });
            }

            let mut values = Vec::with_capacity(expected);
            for (field, token) in self.schema.fields().iter().zip(record.iter()) {
                let value = field.field_type.coerce(token).ok_or_else(|| {
                    SchemaError::FieldType {
                        row,
                        field: field.name.clone(),
                        expected: field.field_type,
                    }
                })?;
                values.push((field.name.clone(), value));
            }

            rows.push(ValidatedRow::new(values));
        }

        if blank_lines(input, consumed) > 0 {
            return Err(SchemaError::RowShape {
                row: row + 1,
                expected,
                actual: 0,
            });
        }

        Ok(rows)
    }

    /// Validates `input` and applies the batch size bound.
    pub fn validate_batch(&self, input: &[u8]) -> SchemaResult<ValidatedBatch> {
        let rows = self.validate(input)?;
        ValidatedBatch::new(self.schema, rows)
    }
}

/// Counts the empty lines starting at byte `start`.
///
/// A `\n` directly after a `\r` at `start` closes the previous record's
/// CRLF terminator and is not counted.
fn blank_lines(input: &[u8], start: usize) -> usize {
    let mut i = start;
    if i > 0 && input.get(i - 1) == Some(&b'\r') && input.get(i) == Some(&b'\n') {
        i += 1;
    }

    let mut count = 0;
    while let Some(&byte) = input.get(i) {
        match byte {
            b'\n' => count += 1,
            b'\r' if input.get(i + 1) != Some(&b'\n') => count += 1,
            b'\r' => {}
            _ => break,
        }
        i += 1;
    }
    count
}
