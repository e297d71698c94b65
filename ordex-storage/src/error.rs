//! Storage error types.

use thiserror::Error;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// RocksDB error.
    #[error("RocksDB error: {0}")]
    RocksDb(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Malformed row key.
    #[error("Invalid key format: {0}")]
    InvalidKey(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<rocksdb::Error> for StorageError {
    fn from(e: rocksdb::Error) -> Self {
        StorageError::RocksDb(e.to_string())
    }
}

impl From<ordex_core::SerializationError> for StorageError {
    fn from(e: ordex_core::SerializationError) -> Self {
        StorageError::Serialization(e.to_string())
    }
}
