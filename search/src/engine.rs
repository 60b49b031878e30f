//! Query ranking engine implementation.

use std::cmp::Reverse;
use std::sync::Arc;

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use wayfare_embeddings::{EmbedPurpose, EmbeddingClient, cosine_similarity};
use wayfare_store::ProgramStore;

use crate::config::SearchConfig;
use crate::error::{Result, SearchError};

/// A ranked search result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedProgram {
    /// Document id.
    pub id: String,

    /// Program title.
    pub title: String,

    /// Program description.
    pub description: String,

    /// Cosine similarity to the query, in [-1, 1]. Transient, never
    /// persisted.
    pub similarity: f32,
}

/// The query-time ranking engine.
///
/// Collaborators are injected so tests can substitute fakes. Each call is
/// independent; the engine holds no mutable state between queries.
pub struct QueryRankingEngine {
    store: Arc<dyn ProgramStore>,
    client: Arc<dyn EmbeddingClient>,
    config: SearchConfig,
}

impl QueryRankingEngine {
    /// Create an engine over the given store and embedding client.
    pub fn new(store: Arc<dyn ProgramStore>, client: Arc<dyn EmbeddingClient>) -> Self {
        Self {
            store,
            client,
            config: SearchConfig::default(),
        }
    }

    /// Override the engine configuration.
    pub fn with_config(mut self, config: SearchConfig) -> Self {
        self.config = config;
        self
    }

    /// Rank all stored programs against the query, using the configured
    /// default result-set size.
    pub async fn rank_default(&self, query: &str) -> Result<Vec<RankedProgram>> {
        self.rank(query, self.config.default_top_k).await
    }

    /// Rank all stored programs against the query and return the top
    /// `top_k`.
    ///
    /// Documents without an embedding are invisible to search: they have
    /// not been processed by the batch pipeline yet. Documents whose
    /// stored embedding cannot be compared (wrong dimension, zero
    /// magnitude) are skipped with a warning rather than poisoning the
    /// ranking with NaN.
    ///
    /// Ties keep store iteration order (stable sort, no secondary key).
    pub async fn rank(&self, query: &str, top_k: usize) -> Result<Vec<RankedProgram>> {
        if query.trim().is_empty() {
            return Err(SearchError::EmptyQuery);
        }

        let query_embedding = self
            .client
            .embed(&[query.to_string()], EmbedPurpose::Query)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| {
                SearchError::Embedding(wayfare_embeddings::EmbeddingError::InvalidResponse(
                    "no embedding for query".to_string(),
                ))
            })?;

        let programs = self.store.list_all().await?;
        debug!("Scoring query against {} document(s)", programs.len());

        let mut scored = Vec::new();
        for program in programs {
            let Some(embedding) = &program.embedding else {
                debug!("Not yet embedded, excluded from search: {}", program.title);
                continue;
            };

            match cosine_similarity(&query_embedding, embedding) {
                Ok(similarity) => scored.push(RankedProgram {
                    id: program.id,
                    title: program.title,
                    description: program.description,
                    similarity,
                }),
                Err(e) => warn!("Skipping '{}': {e}", program.title),
            }
        }

        scored.sort_by_key(|r| Reverse(OrderedFloat(r.similarity)));
        scored.truncate(top_k);
        Ok(scored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use wayfare_embeddings::{Embedding, EmbeddingError};
    use wayfare_store::{MemoryProgramStore, Program};

    /// Client stub that always resolves the query to a fixed vector.
    struct FixedClient {
        vector: Embedding,
        calls: AtomicUsize,
    }

    impl FixedClient {
        fn new(vector: Embedding) -> Self {
            Self {
                vector,
                calls: AtomicUsize::new(0),
            }
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl EmbeddingClient for FixedClient {
        fn model(&self) -> &str {
            "stub"
        }

        async fn embed(
            &self,
            texts: &[String],
            _purpose: EmbedPurpose,
        ) -> wayfare_embeddings::Result<Vec<Embedding>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(texts.iter().map(|_| self.vector.clone()).collect())
        }
    }

    /// Client stub that always fails.
    struct FailingClient;

    #[async_trait]
    impl EmbeddingClient for FailingClient {
        fn model(&self) -> &str {
            "stub"
        }

        async fn embed(
            &self,
            _texts: &[String],
            _purpose: EmbedPurpose,
        ) -> wayfare_embeddings::Result<Vec<Embedding>> {
            Err(EmbeddingError::ApiRequest("provider down".to_string()))
        }
    }

    fn program(id: &str, title: &str, embedding: Option<Embedding>) -> Program {
        Program {
            id: id.to_string(),
            title: title.to_string(),
            description: format!("{title} description"),
            embedding,
        }
    }

    fn engine(programs: Vec<Program>, query_vector: Embedding) -> QueryRankingEngine {
        QueryRankingEngine::new(
            Arc::new(MemoryProgramStore::with_programs(programs)),
            Arc::new(FixedClient::new(query_vector)),
        )
    }

    #[tokio::test]
    async fn test_empty_query_is_rejected_without_a_provider_call() {
        let client = Arc::new(FixedClient::new(vec![1.0, 0.0]));
        let engine = QueryRankingEngine::new(
            Arc::new(MemoryProgramStore::new()),
            client.clone(),
        );

        assert!(matches!(
            engine.rank("", 5).await,
            Err(SearchError::EmptyQuery)
        ));
        assert!(matches!(
            engine.rank("   ", 5).await,
            Err(SearchError::EmptyQuery)
        ));
        assert_eq!(client.call_count(), 0);
    }

    #[tokio::test]
    async fn test_unembedded_documents_are_invisible() {
        let engine = engine(
            vec![
                program("p1", "Embedded", Some(vec![1.0, 0.0])),
                program("p2", "Not embedded", None),
            ],
            vec![1.0, 0.0],
        );

        let results = engine.rank("anything", 5).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, "p1");
    }

    #[tokio::test]
    async fn test_higher_similarity_ranks_first() {
        // Query resolves to [0.9, 0.1]: the [1,0] document scores ~0.994,
        // the [0,1] document ~0.110.
        let engine = engine(
            vec![
                program("p1", "East", Some(vec![0.0, 1.0])),
                program("p2", "North", Some(vec![1.0, 0.0])),
                program("p3", "Pending", None),
            ],
            vec![0.9, 0.1],
        );

        let results = engine.rank("northern placements", 1).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, "p2");
        assert!((results[0].similarity - 0.994).abs() < 1e-3);
    }

    #[tokio::test]
    async fn test_ties_keep_store_order() {
        let engine = engine(
            vec![
                program("d1", "First of tie", Some(vec![2.0, 2.0])),
                program("d2", "Second of tie", Some(vec![1.0, 1.0])),
                program("d3", "Lower score", Some(vec![1.0, 0.0])),
            ],
            vec![1.0, 1.0],
        );

        let results = engine.rank("tie", 2).await.unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].id, "d1");
        assert_eq!(results[1].id, "d2");
    }

    #[tokio::test]
    async fn test_degenerate_embedding_is_skipped() {
        let engine = engine(
            vec![
                program("p1", "Zero vector", Some(vec![0.0, 0.0])),
                program("p2", "Valid", Some(vec![0.5, 0.5])),
            ],
            vec![1.0, 0.0],
        );

        let results = engine.rank("query", 5).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, "p2");
    }

    #[tokio::test]
    async fn test_dimension_mismatch_is_skipped() {
        let engine = engine(
            vec![
                program("p1", "Wrong dims", Some(vec![1.0, 0.0, 0.0])),
                program("p2", "Valid", Some(vec![1.0, 0.0])),
            ],
            vec![1.0, 0.0],
        );

        let results = engine.rank("query", 5).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, "p2");
    }

    #[tokio::test]
    async fn test_top_k_truncates_and_default_is_five() {
        let programs: Vec<Program> = (0..8)
            .map(|n| {
                program(
                    &format!("p{n}"),
                    &format!("Program {n}"),
                    Some(vec![1.0, n as f32 / 10.0]),
                )
            })
            .collect();
        let engine = engine(programs, vec![1.0, 0.0]);

        let results = engine.rank_default("query").await.unwrap();
        assert_eq!(results.len(), 5);

        let all = engine.rank("query", 100).await.unwrap();
        assert_eq!(all.len(), 8);
    }

    #[tokio::test]
    async fn test_provider_failure_is_fatal_for_the_call() {
        let engine = QueryRankingEngine::new(
            Arc::new(MemoryProgramStore::with_programs(vec![program(
                "p1",
                "Anything",
                Some(vec![1.0, 0.0]),
            )])),
            Arc::new(FailingClient),
        );

        assert!(matches!(
            engine.rank("query", 5).await,
            Err(SearchError::Embedding(_))
        ));
    }
}
