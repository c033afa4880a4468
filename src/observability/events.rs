//! Observable events
//!
//! Every log line names one of these events.

use std::fmt;

/// Observable events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Lifecycle
    /// Configuration loaded from the environment
    ConfigLoaded,
    /// Schema registry built
    SchemasLoaded,
    /// Store opened and tables ensured
    StoreReady,
    /// HTTP server listening
    ServerStart,
    /// Startup failed, process exits
    StartupFailed,

    // Ingest
    /// Upload accepted for a registered table
    UploadReceived,
    /// Upload rejected (unknown table or validation failure)
    UploadRejected,
    /// Batch committed to the store
    BatchInserted,
    /// Batch insert failed and was rolled back
    InsertFailed,

    // Backup
    /// Backup started
    BackupStart,
    /// Backup file written
    BackupComplete,
    /// Backup failed
    BackupFailed,

    // Restore
    /// Restore started
    RestoreStart,
    /// Backup decoded
    RestoreComplete,
    /// Restore failed
    RestoreFailed,
}

impl Event {
    /// Returns the event name
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::SchemasLoaded => "SCHEMAS_LOADED",
            Event::StoreReady => "STORE_READY",
            Event::ServerStart => "SERVER_START",
            Event::StartupFailed => "STARTUP_FAILED",
            Event::UploadReceived => "UPLOAD_RECEIVED",
            Event::UploadRejected => "UPLOAD_REJECTED",
            Event::BatchInserted => "BATCH_INSERTED",
            Event::InsertFailed => "INSERT_FAILED",
            Event::BackupStart => "BACKUP_START",
            Event::BackupComplete => "BACKUP_COMPLETE",
            Event::BackupFailed => "BACKUP_FAILED",
            Event::RestoreStart => "RESTORE_START",
            Event::RestoreComplete => "RESTORE_COMPLETE",
            Event::RestoreFailed => "RESTORE_FAILED",
        }
    }

    /// Whether this event means the process is going down
    pub fn is_fatal(&self) -> bool {
        matches!(self, Event::StartupFailed)
    }

    /// Whether this event reports a failed operation
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            Event::InsertFailed | Event::BackupFailed | Event::RestoreFailed
        )
    }

    /// Whether this event reports a rejected client request
    pub fn is_rejection(&self) -> bool {
        matches!(self, Event::UploadRejected)
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
