//! # Embeddings
//!
//! Embedding generation and vector similarity for the Wayfare program
//! recommendation system.
//!
//! The batch pipeline and the query engine both talk to the external
//! embedding provider through the [`EmbeddingClient`] trait defined here,
//! and compare the resulting vectors with [`cosine_similarity`].

pub mod error;
pub mod provider;
pub mod similarity;

pub use error::{EmbeddingError, Result};
pub use provider::{CohereClient, EmbedPurpose, EmbeddingClient};
pub use similarity::cosine_similarity;

/// A dense vector embedding.
pub type Embedding = Vec<f32>;

/// Embedding model used by the program store (Cohere embed-english-v3.0).
pub const DEFAULT_MODEL: &str = "embed-english-v3.0";

/// Dimension produced by [`DEFAULT_MODEL`].
pub const DEFAULT_DIMENSION: usize = 1024;
