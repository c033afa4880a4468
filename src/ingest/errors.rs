//! # Ingest Errors
//!
//! Every failure of an upload, backup or restore request surfaces as an
//! [`IngestError`], classified for the request boundary.

use thiserror::Error;

use crate::backup::BackupError;
use crate::blob::BlobError;
use crate::config::ConfigError;
use crate::restore::RestoreError;
use crate::schema::SchemaError;
use crate::store::StoreError;

/// Result type for ingest operations
pub type IngestResult<T> = Result<T, IngestError>;

/// How a failure should be reported to the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Table name not in the registry
    UnknownTable,
    /// Input data rejected
    InvalidInput,
    /// Requested backup does not exist
    NotFound,
    /// Store, file system or configuration failure
    ServerFault,
}

/// Ingest service errors
#[derive(Debug, Error)]
pub enum IngestError {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Failed to store upload: {0}")]
    Upload(BlobError),

    #[error("Failed to open blob store: {0}")]
    BlobStore(BlobError),

    #[error(transparent)]
    Backup(#[from] BackupError),

    #[error(transparent)]
    Restore(#[from] RestoreError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl IngestError {
    /// Classify this error for the caller
    pub fn class(&self) -> ErrorClass {
        match self {
            IngestError::Schema(SchemaError::UnknownTable(_)) => ErrorClass::UnknownTable,
            IngestError::Schema(e) if e.is_client_error() => ErrorClass::InvalidInput,
            IngestError::Schema(_) => ErrorClass::ServerFault,
            // The batch was rolled back; the request can be corrected and resent.
            IngestError::Store(e) if e.is_store_fault() => ErrorClass::InvalidInput,
            IngestError::Store(_) => ErrorClass::ServerFault,
            IngestError::Restore(e) if e.is_not_found() => ErrorClass::NotFound,
            IngestError::Upload(_)
            | IngestError::BlobStore(_)
            | IngestError::Backup(_)
            | IngestError::Restore(_)
            | IngestError::Config(_) => ErrorClass::ServerFault,
        }
    }

    /// Message returned to the caller
    pub fn client_message(&self) -> String {
        match self {
            IngestError::Restore(e) if e.is_not_found() => e.message().to_string(),
            other => other.to_string(),
        }
    }
}
