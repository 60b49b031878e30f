//! Error types for the ranking engine.

use thiserror::Error;

/// Result type alias for search operations.
pub type Result<T> = std::result::Result<T, SearchError>;

/// Errors that can occur while ranking a query.
#[derive(Error, Debug)]
pub enum SearchError {
    /// Empty or blank query text. Rejected before any provider call.
    #[error("query text is required")]
    EmptyQuery,

    /// Embedding provider failure. Fatal for this call; not retried.
    #[error("embedding error: {0}")]
    Embedding(#[from] wayfare_embeddings::EmbeddingError),

    /// Store failure. Fatal for this call.
    #[error("store error: {0}")]
    Store(#[from] wayfare_store::StoreError),
}
