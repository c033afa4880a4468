//! Row store subsystem
//!
//! The relational store is reached through the [`RowStore`] trait. The
//! bundled implementation is DuckDB; batches are written with
//! [`BatchInserter`], one transaction per batch.

mod backend;
mod duck;
mod errors;
mod inserter;
pub mod statements;

pub use backend::RowStore;
pub use duck::{DuckDbStore, IN_MEMORY};
pub use errors::{StoreError, StoreResult};
pub use inserter::BatchInserter;
