//! Backup and restore through the ingest service.

use std::path::Path;
use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};

use tabingest::blob::{BlobStore, LocalBlobStore};
use tabingest::ingest::{ErrorClass, IngestService};
use tabingest::restore::RestoreReader;
use tabingest::schema::SchemaRegistry;
use tabingest::store::DuckDbStore;

fn service(dir: &Path) -> (IngestService, Arc<LocalBlobStore>) {
    let backups = Arc::new(LocalBlobStore::open(dir.join("backups")).unwrap());
    let service = IngestService::new(
        Arc::new(SchemaRegistry::builtin().unwrap()),
        Arc::new(DuckDbStore::open_in_memory().unwrap()),
        Arc::new(LocalBlobStore::open(dir.join("uploads")).unwrap()),
        backups.clone(),
    );
    service.bootstrap().unwrap();
    (service, backups)
}

fn at(day: u32, h: u32, m: u32, s: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 3, day)
        .unwrap()
        .and_hms_opt(h, m, s)
        .unwrap()
}

#[test]
fn test_backup_then_restore_returns_table_rows() {
    let dir = tempfile::tempdir().unwrap();
    let (service, backups) = service(dir.path());

    service
        .ingest("jobs", None, b"1,Recruiter\n2,\"Manager, Sales\"\n3,Analyst\n")
        .unwrap();

    let backup = service.backup_at("jobs", at(1, 9, 0, 0)).unwrap();
    assert_eq!(backup.records, 3);
    assert_eq!(backup.location.name, "jobs_20240301_090000.avro");
    assert!(backups.exists("jobs_20240301_090000.avro").unwrap());

    let restore = service.restore("jobs").unwrap();
    assert_eq!(restore.records, 3);
    assert_eq!(restore.location.name, backup.location.name);

    let schema = service.registry().require("jobs").unwrap();
    let decoded = RestoreReader::new(backups.as_ref()).restore(schema).unwrap();
    assert_eq!(decoded.records[0].get("id"), Some("1"));
    assert_eq!(decoded.records[1].get("location"), Some("Manager, Sales"));
    assert_eq!(decoded.records[2].get("location"), Some("Analyst"));
}

#[test]
fn test_restore_picks_latest_backup() {
    let dir = tempfile::tempdir().unwrap();
    let (service, _) = service(dir.path());

    service.ingest("departments", None, b"1,10\n").unwrap();
    service.backup_at("departments", at(1, 9, 0, 0)).unwrap();

    service.ingest("departments", None, b"2,20\n3,30\n").unwrap();
    service.backup_at("departments", at(2, 8, 0, 0)).unwrap();

    service.ingest("departments", None, b"4,40\n").unwrap();
    service.backup_at("departments", at(1, 23, 59, 59)).unwrap();

    let restore = service.restore("departments").unwrap();
    assert_eq!(restore.location.name, "departments_20240302_080000.avro");
    assert_eq!(restore.records, 3);
}

#[test]
fn test_backup_of_empty_table_restores_zero_records() {
    let dir = tempfile::tempdir().unwrap();
    let (service, _) = service(dir.path());

    let backup = service.backup_at("hired_employees", at(5, 12, 0, 0)).unwrap();
    assert_eq!(backup.records, 0);

    let restore = service.restore("hired_employees").unwrap();
    assert_eq!(restore.records, 0);
}

#[test]
fn test_restore_without_backups_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let (service, _) = service(dir.path());

    let err = service.restore("jobs").unwrap_err();
    assert_eq!(err.class(), ErrorClass::NotFound);
    assert_eq!(err.client_message(), "No backups available for jobs");
}

#[test]
fn test_backups_of_other_tables_are_ignored() {
    let dir = tempfile::tempdir().unwrap();
    let (service, _) = service(dir.path());

    service.ingest("departments", None, b"1,10\n").unwrap();
    service.backup_at("departments", at(1, 9, 0, 0)).unwrap();

    let err = service.restore("jobs").unwrap_err();
    assert_eq!(err.class(), ErrorClass::NotFound);
}

#[test]
fn test_unknown_table_is_rejected_for_backup_and_restore() {
    let dir = tempfile::tempdir().unwrap();
    let (service, backups) = service(dir.path());

    let err = service.backup("../etc").unwrap_err();
    assert_eq!(err.class(), ErrorClass::UnknownTable);

    let err = service.restore("salaries").unwrap_err();
    assert_eq!(err.class(), ErrorClass::UnknownTable);

    assert!(backups.list("").unwrap().is_empty());
}

#[test]
fn test_corrupt_latest_backup_is_a_server_fault() {
    let dir = tempfile::tempdir().unwrap();
    let (service, backups) = service(dir.path());

    service.ingest("jobs", None, b"1,Recruiter\n").unwrap();
    service.backup_at("jobs", at(1, 9, 0, 0)).unwrap();
    backups
        .write("jobs_20240302_000000.avro", b"not an avro file")
        .unwrap();

    let err = service.restore("jobs").unwrap_err();
    assert_eq!(err.class(), ErrorClass::ServerFault);
}
