//! Ingest service
//!
//! Ties the schema registry, row store and blob stores together into the
//! three request-level operations: upload, backup and restore.

mod errors;
mod service;

pub use errors::{ErrorClass, IngestError, IngestResult};
pub use service::{upload_name, BackupReport, IngestReport, IngestService, RestoreReport};
