//! # Blob Storage
//!
//! Uploads and backups are kept as named blobs in flat stores.

pub mod backend;
pub mod errors;
pub mod local;

pub use backend::BlobStore;
pub use errors::{BlobError, BlobResult};
pub use local::LocalBlobStore;
