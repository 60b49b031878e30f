//! Error types for the web-search recommendation flow.

use thiserror::Error;

/// Result type alias for web-search operations.
pub type Result<T> = std::result::Result<T, WebSearchError>;

/// Errors that can occur in the web-search recommendation flow.
#[derive(Error, Debug)]
pub enum WebSearchError {
    /// Search API request failed.
    #[error("search API error: {0}")]
    SearchApi(String),

    /// Text-generation API request failed.
    #[error("generation API error: {0}")]
    GenerationApi(String),

    /// Model reply could not be parsed as a recommendation list.
    #[error("unparseable model reply: {0}")]
    UnparseableReply(String),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// HTTP error.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
}
