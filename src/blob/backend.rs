//! # Blob Store Trait

use super::errors::BlobResult;

/// Flat, name-addressed blob store used for uploads and backups
pub trait BlobStore: Send + Sync + std::fmt::Debug {
    /// Write data under `name`, replacing any existing blob
    fn write(&self, name: &str, data: &[u8]) -> BlobResult<()>;

    /// Write data under `name` only if no blob has that name yet.
    ///
    /// Returns `false`, writing nothing, when the name is taken.
    fn create(&self, name: &str, data: &[u8]) -> BlobResult<bool>;

    /// Read the blob stored under `name`
    fn read(&self, name: &str) -> BlobResult<Vec<u8>>;

    /// Check if a blob exists
    fn exists(&self, name: &str) -> BlobResult<bool>;

    /// Names of all blobs starting with `prefix`, unordered
    fn list(&self, prefix: &str) -> BlobResult<Vec<String>>;

    /// Human-readable location of a blob, for responses and logs
    fn locate(&self, name: &str) -> String;
}
