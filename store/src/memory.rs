//! In-memory program store.

use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;

use wayfare_embeddings::Embedding;

use crate::error::{Result, StoreError};
use crate::program::{NewProgram, Program};
use crate::store::ProgramStore;

/// Program store held entirely in memory.
///
/// Used by tests and anywhere a persistent collection is not needed.
/// Iteration order is insertion order, matching the JSON adapter.
#[derive(Default)]
pub struct MemoryProgramStore {
    programs: RwLock<Vec<Program>>,
    next_id: AtomicU64,
}

impl MemoryProgramStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with the given records.
    ///
    /// Records keep their ids, so tests can refer to them directly.
    pub fn with_programs(programs: Vec<Program>) -> Self {
        Self {
            programs: RwLock::new(programs),
            next_id: AtomicU64::new(0),
        }
    }
}

#[async_trait]
impl ProgramStore for MemoryProgramStore {
    async fn list_all(&self) -> Result<Vec<Program>> {
        Ok(self.programs.read().await.clone())
    }

    async fn get(&self, id: &str) -> Result<Option<Program>> {
        Ok(self
            .programs
            .read()
            .await
            .iter()
            .find(|p| p.id == id)
            .cloned())
    }

    async fn insert(&self, program: NewProgram) -> Result<Program> {
        program.validate()?;

        let n = self.next_id.fetch_add(1, Ordering::Relaxed);
        let record = Program {
            id: format!("prog-{n}"),
            title: program.title,
            description: program.description,
            embedding: None,
        };

        self.programs.write().await.push(record.clone());
        Ok(record)
    }

    async fn set_embedding(&self, id: &str, embedding: Embedding) -> Result<()> {
        if embedding.is_empty() {
            return Err(StoreError::MalformedRecord {
                reason: format!("empty embedding for '{id}'"),
            });
        }

        let mut programs = self.programs.write().await;
        let record = programs
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| StoreError::NotFound { id: id.to_string() })?;

        record.embedding = Some(embedding);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_memory_store_round_trip() {
        let store = MemoryProgramStore::new();

        let inserted = store
            .insert(NewProgram::new("Hostel Crew Lisbon", "Front desk and events."))
            .await
            .unwrap();
        store
            .set_embedding(&inserted.id, vec![1.0, 0.0])
            .await
            .unwrap();

        let fetched = store.get(&inserted.id).await.unwrap().unwrap();
        assert!(fetched.is_embedded());
        assert_eq!(store.list_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_with_programs_keeps_given_ids_and_order() {
        let store = MemoryProgramStore::with_programs(vec![
            Program {
                id: "a".to_string(),
                title: "First".to_string(),
                description: "d".to_string(),
                embedding: None,
            },
            Program {
                id: "b".to_string(),
                title: "Second".to_string(),
                description: "d".to_string(),
                embedding: None,
            },
        ]);

        let all = store.list_all().await.unwrap();
        assert_eq!(all[0].id, "a");
        assert_eq!(all[1].id, "b");
    }
}
