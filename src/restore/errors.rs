//! Restore-specific error types
//!
//! Restore errors follow the crate's coded error model:
//! - Structured error codes in INGEST_CATEGORY_NAME format
//! - Clear severity levels
//! - No silent failures
//!
//! A missing backup is an expected condition and is classified apart from
//! unreadable or corrupt files.

use std::fmt;

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Operation failed but the service is healthy
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "ERROR"),
        }
    }
}

/// Restore error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestoreErrorCode {
    /// No backup exists for the table
    IngestNoBackup,
    /// Listing or reading the backup failed
    IngestRestoreIo,
    /// Backup file could not be decoded or does not match the table
    IngestRestoreCorrupt,
}

impl RestoreErrorCode {
    /// Returns the string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            RestoreErrorCode::IngestNoBackup => "INGEST_NO_BACKUP",
            RestoreErrorCode::IngestRestoreIo => "INGEST_RESTORE_IO",
            RestoreErrorCode::IngestRestoreCorrupt => "INGEST_RESTORE_CORRUPT",
        }
    }

    /// Returns the severity level for this error code
    pub fn severity(&self) -> Severity {
        Severity::Error
    }
}

impl fmt::Display for RestoreErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Restore error with full context
#[derive(Debug)]
pub struct RestoreError {
    code: RestoreErrorCode,
    message: String,
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl RestoreError {
    fn new(
        code: RestoreErrorCode,
        message: impl Into<String>,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self {
            code,
            message: message.into(),
            source,
        }
    }

    /// No backups available for `table`
    pub fn no_backup(table: &str) -> Self {
        Self::new(
            RestoreErrorCode::IngestNoBackup,
            format!("No backups available for {}", table),
            None,
        )
    }

    /// Creates an I/O error
    pub fn io_error(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::new(RestoreErrorCode::IngestRestoreIo, message, Some(Box::new(source)))
    }

    /// Creates a decode error with an underlying cause
    pub fn corrupt(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::new(
            RestoreErrorCode::IngestRestoreCorrupt,
            message,
            Some(Box::new(source)),
        )
    }

    /// Creates a shape mismatch error
    pub fn mismatch(message: impl Into<String>) -> Self {
        Self::new(RestoreErrorCode::IngestRestoreCorrupt, message, None)
    }

    /// Returns the error code
    pub fn code(&self) -> RestoreErrorCode {
        self.code
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the severity of this error
    pub fn severity(&self) -> Severity {
        self.code.severity()
    }

    /// True when the table simply has no backups yet
    pub fn is_not_found(&self) -> bool {
        self.code == RestoreErrorCode::IngestNoBackup
    }
}

impl fmt::Display for RestoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.code.severity(), self.code, self.message)?;
        if let Some(ref source) = self.source {
            write!(f, " (caused by: {})", source)?;
        }
        Ok(())
    }
}

impl std::error::Error for RestoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Result type for restore operations
pub type RestoreResult<T> = Result<T, RestoreError>;
