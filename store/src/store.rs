//! Program store trait and the JSON file adapter.
//!
//! The JSON adapter keeps the whole collection in one file, preserving
//! insertion order. Writes go through a temp file followed by a rename so a
//! crashed write never leaves a truncated collection behind. Insertion
//! order matters: ranking tie-breaks are defined by store iteration order.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use wayfare_embeddings::Embedding;

use crate::error::{Result, StoreError};
use crate::program::{NewProgram, Program};

/// Interface to the persistent program collection.
///
/// Updates are atomic per document: `set_embedding` either writes the whole
/// vector or nothing, so a concurrent reader never observes a partial
/// embedding.
#[async_trait]
pub trait ProgramStore: Send + Sync {
    /// Fetch all documents, in the store's iteration order.
    async fn list_all(&self) -> Result<Vec<Program>>;

    /// Fetch one document by id.
    async fn get(&self, id: &str) -> Result<Option<Program>>;

    /// Insert a new document; the store assigns its id.
    async fn insert(&self, program: NewProgram) -> Result<Program>;

    /// Set the embedding field on an existing document, touching nothing
    /// else.
    async fn set_embedding(&self, id: &str, embedding: Embedding) -> Result<()>;
}

/// JSON file-backed program store.
pub struct JsonProgramStore {
    /// Path of the collection file.
    path: PathBuf,

    /// In-memory copy of the collection, in file order.
    cache: RwLock<Vec<Program>>,
}

impl JsonProgramStore {
    /// Open a store at the given path, creating parent directories as
    /// needed and loading any existing collection.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| StoreError::CreateDirectory(format!("{}: {e}", parent.display())))?;
        }

        let programs = if path.exists() {
            Self::load(&path).await?
        } else {
            Vec::new()
        };

        info!("Opened program store with {} document(s)", programs.len());

        Ok(Self {
            path,
            cache: RwLock::new(programs),
        })
    }

    async fn load(path: &Path) -> Result<Vec<Program>> {
        let content = fs::read_to_string(path)
            .await
            .map_err(|e| StoreError::ReadFile(format!("{}: {e}", path.display())))?;

        let records: Vec<Program> = serde_json::from_str(&content)?;

        // Malformed records are dropped at the boundary so they can never
        // reach the similarity math.
        let mut programs = Vec::with_capacity(records.len());
        for record in records {
            match record.validate() {
                Ok(()) => programs.push(record),
                Err(e) => warn!("Skipping malformed record in {}: {e}", path.display()),
            }
        }

        Ok(programs)
    }

    async fn save(&self, programs: &[Program]) -> Result<()> {
        let content = serde_json::to_string_pretty(programs)?;

        let temp_path = self.path.with_extension("json.tmp");
        fs::write(&temp_path, &content)
            .await
            .map_err(|e| StoreError::WriteFile(format!("{}: {e}", temp_path.display())))?;

        fs::rename(&temp_path, &self.path)
            .await
            .map_err(|e| StoreError::WriteFile(format!("{}: {e}", self.path.display())))?;

        debug!("Saved {} document(s) to {}", programs.len(), self.path.display());
        Ok(())
    }
}

#[async_trait]
impl ProgramStore for JsonProgramStore {
    async fn list_all(&self) -> Result<Vec<Program>> {
        Ok(self.cache.read().await.clone())
    }

    async fn get(&self, id: &str) -> Result<Option<Program>> {
        Ok(self.cache.read().await.iter().find(|p| p.id == id).cloned())
    }

    async fn insert(&self, program: NewProgram) -> Result<Program> {
        program.validate()?;

        let record = Program {
            id: uuid::Uuid::new_v4().to_string(),
            title: program.title,
            description: program.description,
            embedding: None,
        };

        let mut cache = self.cache.write().await;
        cache.push(record.clone());
        self.save(&cache).await?;

        debug!("Inserted program: {}", record.title);
        Ok(record)
    }

    async fn set_embedding(&self, id: &str, embedding: Embedding) -> Result<()> {
        if embedding.is_empty() {
            return Err(StoreError::MalformedRecord {
                reason: format!("empty embedding for '{id}'"),
            });
        }

        let mut cache = self.cache.write().await;
        let record = cache
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| StoreError::NotFound { id: id.to_string() })?;

        record.embedding = Some(embedding);
        self.save(&cache).await
    }
}
