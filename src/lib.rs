//! tabingest - validated CSV ingest into an embedded store, with Avro
//! table backups and read-back restore

pub mod backup;
pub mod blob;
pub mod cli;
pub mod config;
pub mod http_server;
pub mod ingest;
pub mod observability;
pub mod restore;
pub mod schema;
pub mod store;
