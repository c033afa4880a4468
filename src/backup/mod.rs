//! Backup subsystem
//!
//! A backup is a point-in-time copy of one table's rows in an Avro object
//! container file:
//!
//! ```text
//! backups/
//! ├── jobs_20240309_070503.avro
//! ├── jobs_20240310_120000.avro
//! └── departments_20240310_120001.avro
//! ```
//!
//! The container embeds its schema, so a backup can be read back without
//! consulting the registry. Every column is stored as a string.
//!
//! Backups are never modified or deleted once written.

mod errors;
mod naming;
mod record;
mod writer;

pub use errors::{BackupError, BackupErrorCode, BackupResult, Severity};
pub use naming::{
    backup_name, backup_prefix, parse_backup_name, BackupLocation, BACKUP_EXTENSION,
    TIMESTAMP_FORMAT,
};
pub use record::BackupRecord;
pub use writer::{avro_schema, encode, BackupWriter, BACKUP_NAMESPACE};
