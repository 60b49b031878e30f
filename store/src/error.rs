//! Error types for the program store.

use thiserror::Error;

/// Result type alias for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors that can occur in the program store.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Failed to create the storage directory.
    #[error("failed to create directory: {0}")]
    CreateDirectory(String),

    /// Failed to read the collection file.
    #[error("failed to read store: {0}")]
    ReadFile(String),

    /// Failed to write the collection file.
    #[error("failed to write store: {0}")]
    WriteFile(String),

    /// No document with the given id.
    #[error("program not found: {id}")]
    NotFound { id: String },

    /// Record rejected at the adapter boundary.
    #[error("malformed record: {reason}")]
    MalformedRecord { reason: String },

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
