//! Ingest service
//!
//! Request-scoped orchestration of validation, insertion, backup and
//! restore. The service is the only component that turns a caller-supplied
//! table name into a registered schema; a name that is not registered is
//! rejected before any store or blob I/O happens.

use std::sync::Arc;

use chrono::{Local, NaiveDateTime};
use serde::Serialize;

use crate::backup::{BackupError, BackupLocation, BackupRecord, BackupWriter};
use crate::blob::{BlobError, BlobStore, LocalBlobStore};
use crate::config::IngestConfig;
use crate::observability::{log_event_with_fields, Event};
use crate::restore::RestoreReader;
use crate::schema::{RowValidator, SchemaRegistry, TableSchema};
use crate::store::{BatchInserter, DuckDbStore, RowStore};

use super::errors::{IngestError, IngestResult};

/// Name used when an upload arrives without a file name
const DEFAULT_UPLOAD_NAME: &str = "upload.csv";

/// Same-second uploads of one file name tried before giving up
const MAX_UPLOAD_SEQ: u32 = 1000;

/// Outcome of an accepted upload
#[derive(Debug, Clone, Serialize)]
pub struct IngestReport {
    pub table: String,
    pub rows: usize,
    /// Name of the retained upload in the upload store
    pub upload: String,
}

/// Outcome of a backup
#[derive(Debug, Clone, Serialize)]
pub struct BackupReport {
    pub table: String,
    pub location: BackupLocation,
    pub records: usize,
}

/// Outcome of a restore
#[derive(Debug, Clone, Serialize)]
pub struct RestoreReport {
    pub table: String,
    pub location: BackupLocation,
    pub records: usize,
}

/// Validate → insert → backup/restore pipeline over injected collaborators.
#[derive(Clone)]
pub struct IngestService {
    registry: Arc<SchemaRegistry>,
    store: Arc<dyn RowStore>,
    uploads: Arc<dyn BlobStore>,
    backups: Arc<dyn BlobStore>,
}

impl IngestService {
    pub fn new(
        registry: Arc<SchemaRegistry>,
        store: Arc<dyn RowStore>,
        uploads: Arc<dyn BlobStore>,
        backups: Arc<dyn BlobStore>,
    ) -> Self {
        Self {
            registry,
            store,
            uploads,
            backups,
        }
    }

    /// Build the service from configuration.
    ///
    /// Loads the registry, opens the store, creates missing tables and the
    /// upload and backup directories.
    pub fn open(config: &IngestConfig) -> IngestResult<Self> {
        let registry = Self::load_registry(config)?;
        Self::open_with_registry(config, registry)
    }

    /// Load the registry named by `config`, or the built-in tables.
    ///
    /// Touches only the schema file, so callers can reject unknown table
    /// names before any store or blob directory is opened.
    pub fn load_registry(config: &IngestConfig) -> IngestResult<SchemaRegistry> {
        let registry = match &config.schema_file {
            Some(path) => SchemaRegistry::load_file(path)?,
            None => SchemaRegistry::builtin()?,
        };
        let tables = registry.table_names().collect::<Vec<_>>().join(",");
        log_event_with_fields(Event::SchemasLoaded, &[("tables", tables.as_str())]);
        Ok(registry)
    }

    /// Open the store and blob directories around an already loaded registry.
    pub fn open_with_registry(
        config: &IngestConfig,
        registry: SchemaRegistry,
    ) -> IngestResult<Self> {
        let tables = registry.table_names().collect::<Vec<_>>().join(",");

        let store = DuckDbStore::open(&config.database_url)?;
        let uploads = LocalBlobStore::open(&config.upload_dir).map_err(IngestError::BlobStore)?;
        let backups = LocalBlobStore::open(&config.backup_dir).map_err(IngestError::BlobStore)?;

        let service = Self::new(
            Arc::new(registry),
            Arc::new(store),
            Arc::new(uploads),
            Arc::new(backups),
        );
        service.bootstrap()?;
        log_event_with_fields(Event::StoreReady, &[("tables", tables.as_str())]);

        Ok(service)
    }

    /// Create every registered table that does not exist yet
    pub fn bootstrap(&self) -> IngestResult<()> {
        for schema in self.registry.tables() {
            self.store.ensure_table(schema)?;
        }
        Ok(())
    }

    pub fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    fn schema(&self, table: &str) -> IngestResult<&TableSchema> {
        Ok(self.registry.require(table)?)
    }

    /// Validate an uploaded file and insert its rows.
    ///
    /// The body is retained in the upload store first. Validation is
    /// all-or-nothing and the insert is a single transaction, so a failed
    /// request leaves the table untouched.
    pub fn ingest(
        &self,
        table: &str,
        file_name: Option<&str>,
        body: &[u8],
    ) -> IngestResult<IngestReport> {
        let schema = self.schema(table).map_err(|e| {
            reject(table, &e);
            e
        })?;

        let upload = self.retain_upload(table, file_name, Local::now().naive_local(), body)?;
        let size = body.len().to_string();
        log_event_with_fields(
            Event::UploadReceived,
            &[("table", table), ("upload", upload.as_str()), ("bytes", size.as_str())],
        );

        let batch = RowValidator::new(schema)
            .validate_batch(body)
            .map_err(|e| {
                let e = IngestError::from(e);
                reject(table, &e);
                e
            })?;

        let rows = BatchInserter::new(self.store.as_ref(), schema)
            .insert(&batch)
            .map_err(|e| {
                let reason = e.to_string();
                log_event_with_fields(
                    Event::InsertFailed,
                    &[("table", table), ("reason", reason.as_str())],
                );
                IngestError::from(e)
            })?;

        let count = rows.to_string();
        log_event_with_fields(Event::BatchInserted, &[("table", table), ("rows", count.as_str())]);

        Ok(IngestReport {
            table: table.to_string(),
            rows,
            upload,
        })
    }

    /// Store `body` in the upload store under the first free name.
    ///
    /// Uploads of the same file within one second get numbered names
    /// instead of replacing each other.
    fn retain_upload(
        &self,
        table: &str,
        file_name: Option<&str>,
        received_at: NaiveDateTime,
        body: &[u8],
    ) -> IngestResult<String> {
        for seq in 0..MAX_UPLOAD_SEQ {
            let name = upload_name(table, file_name, received_at, seq);
            if self.uploads.create(&name, body).map_err(IngestError::Upload)? {
                return Ok(name);
            }
        }
        Err(IngestError::Upload(BlobError::Io(format!(
            "no free upload name for {} at {}",
            table,
            received_at.format("%Y%m%d_%H%M%S")
        ))))
    }

    /// Back up the current contents of `table`
    pub fn backup(&self, table: &str) -> IngestResult<BackupReport> {
        self.backup_at(table, Local::now().naive_local())
    }

    /// Back up the current contents of `table`, stamped with `taken_at`
    pub fn backup_at(&self, table: &str, taken_at: NaiveDateTime) -> IngestResult<BackupReport> {
        let schema = self.schema(table)?;
        log_event_with_fields(Event::BackupStart, &[("table", table)]);

        let result = self.write_backup(schema, taken_at);
        match &result {
            Ok(report) => {
                let records = report.records.to_string();
                log_event_with_fields(
                    Event::BackupComplete,
                    &[
                        ("table", table),
                        ("path", report.location.path.as_str()),
                        ("records", records.as_str()),
                    ],
                );
            }
            Err(e) => {
                let reason = e.to_string();
                log_event_with_fields(
                    Event::BackupFailed,
                    &[("table", table), ("reason", reason.as_str())],
                );
            }
        }

        Ok(result?)
    }

    fn write_backup(
        &self,
        schema: &TableSchema,
        taken_at: NaiveDateTime,
    ) -> Result<BackupReport, BackupError> {
        let rows = self.store.select_as_text(schema).map_err(|e| {
            BackupError::source_failed(format!("failed to read table {}", schema.name()), e)
        })?;

        let records = rows
            .into_iter()
            .map(|row| {
                BackupRecord::from_row(schema, row).ok_or_else(|| {
                    BackupError::invalid_record(format!(
                        "row of {} does not match its schema",
                        schema.name()
                    ))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let location = BackupWriter::new(self.backups.as_ref()).write(schema, &records, taken_at)?;

        Ok(BackupReport {
            table: schema.name().to_string(),
            location,
            records: records.len(),
        })
    }

    /// Read back the most recent backup of `table`.
    ///
    /// Records are decoded and counted; the table itself is not modified.
    pub fn restore(&self, table: &str) -> IngestResult<RestoreReport> {
        let schema = self.schema(table)?;
        log_event_with_fields(Event::RestoreStart, &[("table", table)]);

        match RestoreReader::new(self.backups.as_ref()).restore(schema) {
            Ok(restored) => {
                let records = restored.record_count().to_string();
                log_event_with_fields(
                    Event::RestoreComplete,
                    &[
                        ("table", table),
                        ("path", restored.location.path.as_str()),
                        ("records", records.as_str()),
                    ],
                );
                Ok(RestoreReport {
                    table: table.to_string(),
                    records: restored.record_count(),
                    location: restored.location,
                })
            }
            Err(e) => {
                let reason = e.to_string();
                log_event_with_fields(
                    Event::RestoreFailed,
                    &[("table", table), ("reason", reason.as_str())],
                );
                Err(e.into())
            }
        }
    }
}

fn reject(table: &str, err: &IngestError) {
    let reason = err.to_string();
    log_event_with_fields(Event::UploadRejected, &[("table", table), ("reason", reason.as_str())]);
}

/// Blob name for a retained upload: `{table}_{timestamp}_{basename}`, or
/// `{table}_{timestamp}_{seq}_{basename}` when `seq` is not zero.
///
/// Only the final path component of the client's file name is kept, with
/// anything outside `[A-Za-z0-9._-]` replaced by `_`.
pub fn upload_name(
    table: &str,
    file_name: Option<&str>,
    received_at: NaiveDateTime,
    seq: u32,
) -> String {
    let base = file_name
        .and_then(|name| name.rsplit(['/', '\\']).next())
        .map(|name| {
            name.chars()
                .map(|c| {
                    if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                        c
                    } else {
                        '_'
                    }
                })
                .collect::<String>()
        })
        .filter(|name| !name.trim_matches('.').is_empty())
        .unwrap_or_else(|| DEFAULT_UPLOAD_NAME.to_string());

    let stamp = received_at.format("%Y%m%d_%H%M%S");
    if seq == 0 {
        format!("{}_{}_{}", table, stamp, base)
    } else {
        format!("{}_{}_{}_{}", table, stamp, seq, base)
    }
}
