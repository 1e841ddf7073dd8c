//! Error types for the record store.

use common::record::{RecordError, WriteId};

/// Errors that can occur when storing or loading write records.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The declared digest does not match the ciphertext
    #[error("digest mismatch: declared {declared}, computed {computed}")]
    DigestMismatch { declared: WriteId, computed: WriteId },

    /// A record is already stored under this digest
    #[error("record already exists: {0}")]
    AlreadyExists(WriteId),

    /// The write id is not a 32-byte hex digest
    #[error("malformed write id: {0}")]
    MalformedID(String),

    /// No record is stored under this digest
    #[error("record not found: {0}")]
    NotFound(WriteId),

    /// The stored bytes no longer decode to a record for this digest
    #[error("stored record is corrupted: {0}")]
    Corrupted(WriteId),

    /// Record encoding error
    #[error("serialization error: {0}")]
    Serialization(#[from] bincode::Error),

    /// Database error
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Migration error
    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<RecordError> for StoreError {
    fn from(err: RecordError) -> Self {
        match err {
            RecordError::MalformedID(reason) => StoreError::MalformedID(reason),
            RecordError::Serialization(err) => StoreError::Serialization(err),
        }
    }
}

/// Result type alias for record store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
