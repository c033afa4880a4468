//! # DuckDB Row Store
//!
//! A single DuckDB connection guarded by a mutex. Each batch runs inside
//! its own transaction; dropping the transaction without committing rolls
//! it back.

use std::sync::{Mutex, MutexGuard};

use duckdb::types::{ToSql, ToSqlOutput};
use duckdb::{params_from_iter, Connection};

use crate::schema::Value;

use super::backend::RowStore;
use super::errors::{StoreError, StoreResult};

/// Connection string naming an in-memory database
pub const IN_MEMORY: &str = ":memory:";

impl ToSql for Value {
    fn to_sql(&self) -> duckdb::Result<ToSqlOutput<'_>> {
        match self {
            Value::Text(s) => s.to_sql(),
            Value::Integer(i) => i.to_sql(),
        }
    }
}

/// DuckDB-backed row store
pub struct DuckDbStore {
    conn: Mutex<Connection>,
}

impl DuckDbStore {
    /// Open a store from a connection string.
    ///
    /// Accepts a file path, `duckdb://<path>`, or `:memory:`.
    pub fn open(url: &str) -> StoreResult<Self> {
        let path = url.strip_prefix("duckdb://").unwrap_or(url);
        let conn = if path.is_empty() || path == IN_MEMORY {
            Connection::open_in_memory()
        } else {
            Connection::open(path)
        }
        .map_err(|e| StoreError::Connection(e.to_string()))?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open a fresh in-memory store
    pub fn open_in_memory() -> StoreResult<Self> {
        Self::open(IN_MEMORY)
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| StoreError::Connection("connection lock poisoned".into()))
    }
}

impl RowStore for DuckDbStore {
    fn execute(&self, sql: &str) -> StoreResult<()> {
        self.lock()?
            .execute_batch(sql)
            .map_err(|e| StoreError::Statement(e.to_string()))
    }

    fn execute_in_transaction(&self, sql: &str, rows: &[Vec<Value>]) -> StoreResult<usize> {
        let mut conn = self.lock()?;
        let tx = conn
            .transaction()
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        {
            let mut stmt = tx
                .prepare(sql)
                .map_err(|e| StoreError::Statement(e.to_string()))?;

            for (i, row) in rows.iter().enumerate() {
                stmt.execute(params_from_iter(row.iter()))
                    .map_err(|e| StoreError::Insert {
                        row: i + 1,
                        reason: e.to_string(),
                    })?;
            }
        }

        tx.commit()
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        Ok(rows.len())
    }

    fn query_text(&self, sql: &str, columns: usize) -> StoreResult<Vec<Vec<String>>> {
        let conn = self.lock()?;
        let mut stmt = conn
            .prepare(sql)
            .map_err(|e| StoreError::Query(e.to_string()))?;

        let rows = stmt
            .query_map([], |row| {
                (0..columns)
                    .map(|i| row.get::<_, Option<String>>(i).map(Option::unwrap_or_default))
                    .collect::<duckdb::Result<Vec<_>>>()
            })
            .map_err(|e| StoreError::Query(e.to_string()))?;

        rows.collect::<duckdb::Result<Vec<_>>>()
            .map_err(|e| StoreError::Query(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{FieldDef, TableSchema};

    fn jobs() -> TableSchema {
        TableSchema::new("jobs", vec![FieldDef::integer("id"), FieldDef::string("location")])
            .unwrap()
    }

    fn params(id: i64, location: &str) -> Vec<Value> {
        vec![Value::Integer(id), Value::Text(location.into())]
    }

    #[test]
    fn test_open_variants() {
        assert!(DuckDbStore::open(":memory:").is_ok());
        assert!(DuckDbStore::open("duckdb://:memory:").is_ok());
        assert!(DuckDbStore::open("").is_ok());
    }

    #[test]
    fn test_ensure_table_is_idempotent() {
        let store = DuckDbStore::open_in_memory().unwrap();
        store.ensure_table(&jobs()).unwrap();
        store.ensure_table(&jobs()).unwrap();
        assert!(store.select_as_text(&jobs()).unwrap().is_empty());
    }

    #[test]
    fn test_transaction_commits_all_rows() {
        let store = DuckDbStore::open_in_memory().unwrap();
        store.ensure_table(&jobs()).unwrap();

        let sql = r#"INSERT INTO "jobs" ("id", "location") VALUES (?, ?)"#;
        let written = store
            .execute_in_transaction(sql, &[params(1, "loc_1"), params(2, "loc_2")])
            .unwrap();
        assert_eq!(written, 2);

        let rows = store.select_as_text(&jobs()).unwrap();
        assert_eq!(
            rows,
            vec![
                vec!["1".to_string(), "loc_1".to_string()],
                vec!["2".to_string(), "loc_2".to_string()],
            ]
        );
    }

    #[test]
    fn test_failed_row_rolls_back_batch() {
        let store = DuckDbStore::open_in_memory().unwrap();
        store
            .execute("CREATE TABLE jobs (id BIGINT NOT NULL CHECK (id > 0), location VARCHAR NOT NULL)")
            .unwrap();

        let sql = r#"INSERT INTO "jobs" ("id", "location") VALUES (?, ?)"#;
        let err = store
            .execute_in_transaction(sql, &[params(1, "a"), params(2, "b"), params(0, "c")])
            .unwrap_err();
        assert!(matches!(err, StoreError::Insert { row: 3, .. }));

        assert!(store.select_as_text(&jobs()).unwrap().is_empty());
    }

    #[test]
    fn test_query_on_missing_table_fails() {
        let store = DuckDbStore::open_in_memory().unwrap();
        let err = store.select_as_text(&jobs()).unwrap_err();
        assert!(matches!(err, StoreError::Query(_)));
    }
}
