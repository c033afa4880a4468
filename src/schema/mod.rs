//! Schema subsystem
//!
//! Tables are declared up front with an ordered, typed field list. Every
//! upload is validated against its table before anything reaches the store.
//!
//! # Rules
//!
//! - Table lookup is exact and case-sensitive
//! - Column count must match the schema exactly
//! - Integer fields must parse as base-10 integers
//! - Validation is all-or-nothing per request
//! - Batches hold between 1 and 1000 rows

mod errors;
mod registry;
mod types;
mod validator;

pub use errors::{SchemaError, SchemaResult};
pub use registry::SchemaRegistry;
pub use types::{
    is_identifier, FieldDef, FieldType, TableSchema, ValidatedBatch, ValidatedRow, Value,
    MAX_BATCH_ROWS,
};
pub use validator::{RowValidator, DELIMITER};
