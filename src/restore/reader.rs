//! Restore reader
//!
//! Selects the newest backup of a table and decodes it. Only names of the
//! exact form `{table}_{YYYYMMDD_HHMMSS}.avro` are candidates; among them
//! the lexicographically greatest wins, which is also the most recent.

use apache_avro::types::Value as AvroValue;
use apache_avro::Reader;

use crate::backup::{backup_prefix, parse_backup_name, BackupLocation, BackupRecord};
use crate::blob::BlobStore;
use crate::schema::TableSchema;

use super::errors::{RestoreError, RestoreResult};

/// A decoded backup
#[derive(Debug, Clone)]
pub struct RestoredBackup {
    pub location: BackupLocation,
    pub records: Vec<BackupRecord>,
}

impl RestoredBackup {
    pub fn record_count(&self) -> usize {
        self.records.len()
    }
}

/// Reads table backups back out of a blob store.
pub struct RestoreReader<'a> {
    blobs: &'a dyn BlobStore,
}

impl<'a> RestoreReader<'a> {
    pub fn new(blobs: &'a dyn BlobStore) -> Self {
        Self { blobs }
    }

    /// Every backup of `schema`'s table, oldest first.
    pub fn list(&self, schema: &TableSchema) -> RestoreResult<Vec<BackupLocation>> {
        let table = schema.name();
        let mut names = self
            .blobs
            .list(&backup_prefix(table))
            .map_err(|e| RestoreError::io_error(format!("failed to list backups of {}", table), e))?;
        names.sort();

        Ok(names
            .into_iter()
            .filter_map(|name| {
                let taken_at = parse_backup_name(table, &name)?;
                Some(BackupLocation {
                    path: self.blobs.locate(&name),
                    name,
                    table: table.to_string(),
                    taken_at,
                })
            })
            .collect())
    }

    /// The most recent backup of `schema`'s table.
    pub fn latest(&self, schema: &TableSchema) -> RestoreResult<BackupLocation> {
        self.list(schema)?
            .pop()
            .ok_or_else(|| RestoreError::no_backup(schema.name()))
    }

    /// Decodes the most recent backup of `schema`'s table.
    pub fn restore(&self, schema: &TableSchema) -> RestoreResult<RestoredBackup> {
        let location = self.latest(schema)?;
        let records = self.read(schema, &location)?;
        Ok(RestoredBackup { location, records })
    }

    /// Decodes one backup file.
    pub fn read(
        &self,
        schema: &TableSchema,
        location: &BackupLocation,
    ) -> RestoreResult<Vec<BackupRecord>> {
        let bytes = self
            .blobs
            .read(&location.name)
            .map_err(|e| RestoreError::io_error(format!("failed to read {}", location.name), e))?;

        decode(schema, &location.name, &bytes)
    }
}

fn decode(schema: &TableSchema, name: &str, bytes: &[u8]) -> RestoreResult<Vec<BackupRecord>> {
    let reader = Reader::new(bytes)
        .map_err(|e| RestoreError::corrupt(format!("{} is not a backup container", name), e))?;

    if let Some(record_name) = reader.writer_schema().name() {
        if record_name.name != schema.name() {
            return Err(RestoreError::mismatch(format!(
                "{} holds records of '{}', expected '{}'",
                name,
                record_name.name,
                schema.name()
            )));
        }
    }

    let mut records = Vec::new();
    for (i, value) in reader.enumerate() {
        let value = value
            .map_err(|e| RestoreError::corrupt(format!("{}: record {}", name, i + 1), e))?;
        records.push(to_record(schema, name, i + 1, value)?);
    }

    Ok(records)
}

fn to_record(
    schema: &TableSchema,
    name: &str,
    index: usize,
    value: AvroValue,
) -> RestoreResult<BackupRecord> {
    let AvroValue::Record(fields) = value else {
        return Err(RestoreError::mismatch(format!(
            "{}: record {} is not a record",
            name, index
        )));
    };

    let fields = fields
        .into_iter()
        .map(|(field, value)| match value {
            AvroValue::String(text) => Ok((field, text)),
            other => Err(RestoreError::mismatch(format!(
                "{}: record {} field '{}' is not a string: {:?}",
                name, index, field, other
            ))),
        })
        .collect::<RestoreResult<Vec<_>>>()?;

    if !fields.iter().map(|(f, _)| f.as_str()).eq(schema.field_names()) {
        return Err(RestoreError::mismatch(format!(
            "{}: record {} columns do not match table '{}'",
            name,
            index,
            schema.name()
        )));
    }

    Ok(BackupRecord::new(fields))
}
