//! Backup writer
//!
//! Encodes records into an Avro object container whose embedded schema is
//! a record named after the table, namespace `backup`, with one `string`
//! field per column. The container is written to the backup store in one
//! call.

use apache_avro::types::Record;
use apache_avro::{Schema as AvroSchema, Writer};
use chrono::NaiveDateTime;
use serde_json::json;

use crate::blob::BlobStore;
use crate::schema::TableSchema;

use super::errors::{BackupError, BackupResult};
use super::naming::{backup_name, BackupLocation};
use super::record::BackupRecord;

/// Namespace of every backup record schema
pub const BACKUP_NAMESPACE: &str = "backup";

/// Avro schema for a table's backup, all fields widened to string.
pub fn avro_schema(schema: &TableSchema) -> serde_json::Value {
    let fields: Vec<_> = schema
        .field_names()
        .map(|name| json!({ "name": name, "type": "string" }))
        .collect();

    json!({
        "type": "record",
        "name": schema.name(),
        "namespace": BACKUP_NAMESPACE,
        "doc": format!("Backup of {}", schema.name()),
        "fields": fields,
    })
}

/// Encodes records into an Avro container.
pub fn encode(schema: &TableSchema, records: &[BackupRecord]) -> BackupResult<Vec<u8>> {
    let avro = AvroSchema::parse(&avro_schema(schema))
        .map_err(|e| BackupError::encode_failed("invalid backup schema", e))?;
    let mut writer = Writer::new(&avro, Vec::new());

    for (i, record) in records.iter().enumerate() {
        let mut avro_record = Record::new(writer.schema())
            .ok_or_else(|| BackupError::invalid_record("backup schema is not a record"))?;

        for field in schema.field_names() {
            let value = record.get(field).ok_or_else(|| {
                BackupError::invalid_record(format!("record {} has no field '{}'", i + 1, field))
            })?;
            avro_record.put(field, value.to_string());
        }

        writer
            .append(avro_record)
            .map_err(|e| BackupError::encode_failed(format!("record {}", i + 1), e))?;
    }

    writer
        .into_inner()
        .map_err(|e| BackupError::encode_failed("failed to finish container", e))
}

/// Writes table backups into a blob store.
pub struct BackupWriter<'a> {
    blobs: &'a dyn BlobStore,
}

impl<'a> BackupWriter<'a> {
    pub fn new(blobs: &'a dyn BlobStore) -> Self {
        Self { blobs }
    }

    /// Writes one backup file for `schema` containing `records`.
    ///
    /// A backup taken in the same second as an existing one replaces it.
    pub fn write(
        &self,
        schema: &TableSchema,
        records: &[BackupRecord],
        taken_at: NaiveDateTime,
    ) -> BackupResult<BackupLocation> {
        let bytes = encode(schema, records)?;
        let name = backup_name(schema.name(), taken_at);

        self.blobs
            .write(&name, &bytes)
            .map_err(|e| BackupError::io_error(format!("failed to write {}", name), e))?;

        Ok(BackupLocation {
            path: self.blobs.locate(&name),
            name,
            table: schema.name().to_string(),
            taken_at,
        })
    }
}
