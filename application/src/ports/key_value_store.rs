//! Key-value storage port
//!
//! The persistence contract the preference store builds on: string keys,
//! string values, no expiry. Shaped after browser `localStorage`.

use thiserror::Error;

/// Errors reported by key-value storage adapters
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage contents are corrupt: {0}")]
    Corrupt(String),

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// Persistent string key-value storage.
///
/// Writes are synchronous from the caller's perspective: once `set_item`
/// returns `Ok`, a following `get_item` for the same key observes the value.
pub trait KeyValueStore: Send + Sync {
    /// Read a value, `Ok(None)` when the key was never written
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write a value, replacing any previous one
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;
}
