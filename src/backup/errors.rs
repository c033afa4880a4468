//! Backup-specific error types
//!
//! Backup errors follow the crate's coded error model:
//! - Structured error codes in INGEST_CATEGORY_NAME format
//! - Clear severity levels
//! - No silent failures
//!
//! Backup failure never touches table contents.

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

/// Backup error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackupErrorCode {
    /// Reading the table contents failed
    IngestBackupSource,
    /// Encoding records into the container failed
    IngestBackupEncode,
    /// Writing the backup file failed
    IngestBackupIo,
}

impl BackupErrorCode {
    /// Returns the string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            BackupErrorCode::IngestBackupSource => "INGEST_BACKUP_SOURCE",
            BackupErrorCode::IngestBackupEncode => "INGEST_BACKUP_ENCODE",
            BackupErrorCode::IngestBackupIo => "INGEST_BACKUP_IO",
        }
    }

    /// Returns the severity level for this error code
    pub fn severity(&self) -> Severity {
        Severity::Error
    }
}

impl fmt::Display for BackupErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Backup error with full context
#[derive(Debug)]
pub struct BackupError {
    code: BackupErrorCode,
    message: String,
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl BackupError {
    fn new(
        code: BackupErrorCode,
        message: impl Into<String>,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self {
            code,
            message: message.into(),
            source,
        }
    }

    /// Creates an error for a failed table read
    pub fn source_failed(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::new(
            BackupErrorCode::IngestBackupSource,
            message,
            Some(Box::new(source)),
        )
    }

    /// Creates an encoding error
    pub fn encode_failed(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::new(
            BackupErrorCode::IngestBackupEncode,
            message,
            Some(Box::new(source)),
        )
    }

    /// Creates an encoding error without an underlying cause
    pub fn invalid_record(message: impl Into<String>) -> Self {
        Self::new(BackupErrorCode::IngestBackupEncode, message, None)
    }

    /// Creates an I/O error while writing the backup
    pub fn io_error(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::new(BackupErrorCode::IngestBackupIo, message, Some(Box::new(source)))
    }

    /// Returns the error code
    pub fn code(&self) -> BackupErrorCode {
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
}

impl fmt::Display for BackupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.code.severity(), self.code, self.message)?;
        if let Some(ref source) = self.source {
            write!(f, " (caused by: {})", source)?;
        }
        Ok(())
    }
}

impl std::error::Error for BackupError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Result type for backup operations
pub type BackupResult<T> = Result<T, BackupError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            BackupErrorCode::IngestBackupSource.as_str(),
            "INGEST_BACKUP_SOURCE"
        );
        assert_eq!(
            BackupErrorCode::IngestBackupEncode.as_str(),
            "INGEST_BACKUP_ENCODE"
        );
        assert_eq!(BackupErrorCode::IngestBackupIo.as_str(), "INGEST_BACKUP_IO");
    }

    #[test]
    fn test_display_contains_code_and_cause() {
        let io_err = io::Error::new(io::ErrorKind::Other, "disk full");
        let err = BackupError::io_error("could not write jobs backup", io_err);

        let display = err.to_string();
        assert!(display.contains("ERROR"));
        assert!(display.contains("INGEST_BACKUP_IO"));
        assert!(display.contains("could not write jobs backup"));
        assert!(display.contains("caused by: disk full"));
        assert_eq!(err.code(), BackupErrorCode::IngestBackupIo);
    }

    #[test]
    fn test_source_is_exposed() {
        use std::error::Error;

        let err = BackupError::invalid_record("missing field");
        assert!(err.source().is_none());

        let io_err = io::Error::new(io::ErrorKind::Other, "boom");
        let err = BackupError::encode_failed("encode", io_err);
        assert!(err.source().is_some());
    }
}
