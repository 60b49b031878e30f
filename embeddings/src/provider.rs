//! Embedding provider client.
//!
//! The external provider maps text to fixed-length numeric vectors. Wayfare
//! uses Cohere's embed endpoint; everything above this module only sees the
//! [`EmbeddingClient`] trait.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{EmbeddingError, Result};
use crate::{DEFAULT_MODEL, Embedding};

/// What the embedding will be used for.
///
/// Embedding models distinguish between corpus documents and search
/// queries; mixing the two degrades retrieval quality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmbedPurpose {
    /// A stored document that will be searched over.
    Document,
    /// A query to search with.
    Query,
}

impl EmbedPurpose {
    /// Cohere `input_type` value for this purpose.
    pub fn input_type(self) -> &'static str {
        match self {
            Self::Document => "search_document",
            Self::Query => "search_query",
        }
    }
}

/// Trait for embedding providers.
///
/// Implementations return one vector per input text, in input order. All
/// vectors produced by the same model have the same length; the caller
/// never interprets their contents.
#[async_trait]
pub trait EmbeddingClient: Send + Sync {
    /// Model identifier, used in logs and diagnostics.
    fn model(&self) -> &str;

    /// Generate embeddings for the given texts.
    async fn embed(&self, texts: &[String], purpose: EmbedPurpose) -> Result<Vec<Embedding>>;
}

/// Cohere embedding provider.
pub struct CohereClient {
    /// API key.
    api_key: String,

    /// API base URL.
    base_url: String,

    /// HTTP client.
    client: reqwest::Client,

    /// Model to use.
    model: String,
}

impl CohereClient {
    /// Create a new Cohere client with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: "https://api.cohere.ai".to_string(),
            client: reqwest::Client::new(),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    /// Set the base URL (used to point tests at a mock server).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}

#[async_trait]
impl EmbeddingClient for CohereClient {
    fn model(&self) -> &str {
        &self.model
    }

    async fn embed(&self, texts: &[String], purpose: EmbedPurpose) -> Result<Vec<Embedding>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        debug!(
            "Requesting {} embedding(s) with model {} ({})",
            texts.len(),
            self.model,
            purpose.input_type()
        );

        let body = serde_json::json!({
            "texts": texts,
            "model": self.model,
            "input_type": purpose.input_type(),
        });

        let response = self
            .client
            .post(format!("{}/v1/embed", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse().ok())
                .unwrap_or(60);

            return Err(EmbeddingError::RateLimited {
                retry_after_secs: retry_after,
            });
        }

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(EmbeddingError::ApiRequest(format!(
                "API error: {error_text}"
            )));
        }

        let result: CohereEmbedResponse = response.json().await?;

        if result.embeddings.len() != texts.len() {
            return Err(EmbeddingError::InvalidResponse(format!(
                "expected {} embeddings, got {}",
                texts.len(),
                result.embeddings.len()
            )));
        }

        debug!("Received {} embedding(s)", result.embeddings.len());
        Ok(result.embeddings)
    }
}

/// Cohere API response format.
#[derive(Debug, Deserialize)]
struct CohereEmbedResponse {
    embeddings: Vec<Embedding>,
}
