//! The program document record.

use serde::{Deserialize, Serialize};
use wayfare_embeddings::Embedding;

use crate::error::{Result, StoreError};

/// A work & travel program stored in the collection.
///
/// Created without an embedding by the ingestion loader; the batch pipeline
/// later adds the `embedding` field exactly once. Once present, the
/// embedding is replaced wholesale, never merged, and its length matches
/// every other embedding in the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Program {
    /// Store-assigned unique id.
    pub id: String,

    /// Program title.
    pub title: String,

    /// Program description.
    pub description: String,

    /// Semantic embedding, absent until the batch pipeline computes it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embedding: Option<Embedding>,
}

impl Program {
    /// Whether the batch pipeline has already embedded this document.
    pub fn is_embedded(&self) -> bool {
        self.embedding.is_some()
    }

    /// Text handed to the embedding provider for this document.
    pub fn embedding_input(&self) -> String {
        format!("{}. {}", self.title, self.description)
    }

    /// Validate the record at the store boundary.
    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(StoreError::MalformedRecord {
                reason: "empty id".to_string(),
            });
        }
        validate_fields(&self.title, &self.description)?;
        if let Some(embedding) = &self.embedding {
            if embedding.is_empty() {
                return Err(StoreError::MalformedRecord {
                    reason: format!("empty embedding on '{}'", self.title),
                });
            }
        }
        Ok(())
    }
}

/// A program record as supplied by the ingestion loader, before the store
/// assigns an id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewProgram {
    /// Program title.
    pub title: String,

    /// Program description.
    pub description: String,
}

impl NewProgram {
    /// Create a new program record.
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
        }
    }

    /// Validate the record before insertion.
    pub fn validate(&self) -> Result<()> {
        validate_fields(&self.title, &self.description)
    }
}

fn validate_fields(title: &str, description: &str) -> Result<()> {
    if title.trim().is_empty() {
        return Err(StoreError::MalformedRecord {
            reason: "empty title".to_string(),
        });
    }
    if description.trim().is_empty() {
        return Err(StoreError::MalformedRecord {
            reason: format!("empty description on '{title}'"),
        });
    }
    Ok(())
}
