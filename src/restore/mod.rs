//! Restore subsystem
//!
//! Restore locates the newest backup of a table and reads its records back
//! into memory.
//!
//! # Selection
//!
//! 1. List backup blobs named `{table}_{YYYYMMDD_HHMMSS}.avro`
//! 2. Sort by name
//! 3. Take the last one
//!
//! # Important
//!
//! Restore is read-only. It does not write the records back into the
//! table.

mod errors;
mod reader;

pub use errors::{RestoreError, RestoreErrorCode, RestoreResult, Severity};
pub use reader::{RestoreReader, RestoredBackup};
