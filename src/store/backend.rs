//! # Row Store Trait
//!
//! The store is reached through three primitives: a plain statement, a
//! parameterized statement executed once per row inside one transaction,
//! and a text-valued query. Everything table-specific is built on top from
//! registry identifiers in [`statements`](super::statements).

use crate::schema::{TableSchema, Value};

use super::errors::StoreResult;
use super::statements;

/// Transactional row store
pub trait RowStore: Send + Sync {
    /// Execute a statement without parameters
    fn execute(&self, sql: &str) -> StoreResult<()>;

    /// Execute `sql` once per parameter row inside a single transaction.
    ///
    /// Either every row is committed or none is. Returns the number of
    /// rows written.
    fn execute_in_transaction(&self, sql: &str, rows: &[Vec<Value>]) -> StoreResult<usize>;

    /// Run a query whose `columns` result columns are all text
    fn query_text(&self, sql: &str, columns: usize) -> StoreResult<Vec<Vec<String>>>;

    /// Create the table for `schema` if it does not exist
    fn ensure_table(&self, schema: &TableSchema) -> StoreResult<()> {
        self.execute(&statements::create_table(schema))
    }

    /// Read every row of the table with each column cast to text
    fn select_as_text(&self, schema: &TableSchema) -> StoreResult<Vec<Vec<String>>> {
        self.query_text(&statements::select_as_text(schema), schema.field_count())
    }
}
