//! Error types for the batch pipeline.

use thiserror::Error;

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Errors that abort a pipeline run.
///
/// Per-document embedding failures are not errors at this level; they are
/// recorded in the run summary and the pipeline continues.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Store read/write failure. Fatal for the run.
    #[error("store error: {0}")]
    Store(#[from] wayfare_store::StoreError),

    /// Failed to read a seed file.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to parse a seed file.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
