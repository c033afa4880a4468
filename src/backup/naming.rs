//! Backup file naming
//!
//! Backups are named `{table}_{YYYYMMDD_HHMMSS}.avro`. The fixed-width
//! timestamp makes lexicographic order equal chronological order for the
//! backups of one table.

use chrono::NaiveDateTime;
use serde::Serialize;

/// Backup file extension, without the dot
pub const BACKUP_EXTENSION: &str = "avro";

/// Timestamp format embedded in backup names
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Builds the blob name for a backup of `table` taken at `taken_at`.
pub fn backup_name(table: &str, taken_at: NaiveDateTime) -> String {
    format!(
        "{}_{}.{}",
        table,
        taken_at.format(TIMESTAMP_FORMAT),
        BACKUP_EXTENSION
    )
}

/// Prefix shared by every backup of `table`
pub fn backup_prefix(table: &str) -> String {
    format!("{}_", table)
}

/// Parses the timestamp out of a backup name belonging to `table`.
///
/// Returns `None` for names of other tables, including tables whose name
/// merely starts with `table`.
pub fn parse_backup_name(table: &str, name: &str) -> Option<NaiveDateTime> {
    let stamp = name
        .strip_prefix(table)?
        .strip_prefix('_')?
        .strip_suffix(BACKUP_EXTENSION)?
        .strip_suffix('.')?;
    NaiveDateTime::parse_from_str(stamp, TIMESTAMP_FORMAT).ok()
}

/// Where a backup lives and what it covers
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BackupLocation {
    /// Blob name inside the backup store
    pub name: String,
    /// Full location as reported by the store
    pub path: String,
    pub table: String,
    pub taken_at: NaiveDateTime,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 9)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    #[test]
    fn test_backup_name_format() {
        assert_eq!(backup_name("jobs", at(7, 5, 3)), "jobs_20240309_070503.avro");
    }

    #[test]
    fn test_parse_round_trip() {
        let name = backup_name("hired_employees", at(23, 59, 59));
        assert_eq!(parse_backup_name("hired_employees", &name), Some(at(23, 59, 59)));
    }

    #[test]
    fn test_parse_rejects_other_tables() {
        let name = backup_name("hired_employees", at(1, 2, 3));
        assert_eq!(parse_backup_name("hired", &name), None);
        assert_eq!(parse_backup_name("jobs", &name), None);
    }

    #[test]
    fn test_parse_rejects_foreign_files() {
        assert_eq!(parse_backup_name("jobs", "jobs_20240309_070503.csv"), None);
        assert_eq!(parse_backup_name("jobs", "jobs_latest.avro"), None);
        assert_eq!(parse_backup_name("jobs", "jobs.avro"), None);
    }

    #[test]
    fn test_lexicographic_is_chronological() {
        let earlier = backup_name("jobs", at(9, 59, 59));
        let later = backup_name("jobs", at(10, 0, 0));
        assert!(earlier < later);
    }
}
