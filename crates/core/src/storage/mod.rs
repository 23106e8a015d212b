//! Named blob storage.
//!
//! The history log is persisted as one JSON document under a fixed name,
//! so the storage seam is a plain key/value store of strings.

mod memory;
mod sqlite;

pub use memory::InMemoryBlobStore;
pub use sqlite::SqliteBlobStore;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(String),
}

/// Trait for named blob storage.
pub trait BlobStore: Send + Sync {
    /// Read a blob. `Ok(None)` when nothing is stored under `key`.
    fn read(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replace the blob stored under `key`.
    fn write(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove the blob stored under `key`, if any.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}
