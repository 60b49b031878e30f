//! Batch embedding runner.

use std::sync::Arc;

use tokio::time::sleep;
use tracing::{info, warn};

use wayfare_embeddings::{EmbedPurpose, EmbeddingClient};
use wayfare_store::ProgramStore;

use crate::config::PacingConfig;
use crate::error::Result;

/// What happened to a single document during a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemOutcome {
    /// An embedding was generated and persisted.
    Embedded,

    /// The document already had an embedding and was skipped.
    AlreadyEmbedded,

    /// The embedding attempt failed; the document is left unembedded and
    /// will be retried on the next run.
    Failed {
        /// Provider error message.
        error: String,
        /// Whether the failure was a rate-limit response.
        rate_limited: bool,
    },
}

/// Per-document result, keyed by id with the title kept for diagnostics.
#[derive(Debug, Clone)]
pub struct ItemResult {
    /// Document id.
    pub id: String,

    /// Document title.
    pub title: String,

    /// Outcome of this document's attempt.
    pub outcome: ItemOutcome,
}

/// Summary of a full pipeline run.
#[derive(Debug, Default)]
pub struct RunSummary {
    /// Per-document results, in store iteration order.
    pub items: Vec<ItemResult>,
}

impl RunSummary {
    /// Documents embedded during this run.
    pub fn embedded(&self) -> usize {
        self.count(|o| matches!(o, ItemOutcome::Embedded))
    }

    /// Documents skipped because they were already embedded.
    pub fn already_embedded(&self) -> usize {
        self.count(|o| matches!(o, ItemOutcome::AlreadyEmbedded))
    }

    /// Documents whose embedding attempt failed.
    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, ItemOutcome::Failed { .. }))
    }

    /// Whether every document in the store now holds an embedding.
    pub fn is_complete(&self) -> bool {
        self.failed() == 0
    }

    fn count(&self, pred: impl Fn(&ItemOutcome) -> bool) -> usize {
        self.items.iter().filter(|i| pred(&i.outcome)).count()
    }
}

/// The batch embedding pipeline.
///
/// Collaborators are injected so tests can substitute fakes. A run is
/// strictly sequential; operationally at most one run is active at a time
/// (a second concurrent run is safe but may issue duplicate embedding
/// calls for documents neither run has persisted yet).
pub struct BatchEmbedder {
    store: Arc<dyn ProgramStore>,
    client: Arc<dyn EmbeddingClient>,
    pacing: PacingConfig,
}

impl BatchEmbedder {
    /// Create a pipeline over the given store and embedding client.
    pub fn new(store: Arc<dyn ProgramStore>, client: Arc<dyn EmbeddingClient>) -> Self {
        Self {
            store,
            client,
            pacing: PacingConfig::default(),
        }
    }

    /// Override the pacing policy.
    pub fn with_pacing(mut self, pacing: PacingConfig) -> Self {
        self.pacing = pacing;
        self
    }

    /// Run the pipeline over every document in the store.
    ///
    /// Failure to fetch the document list is fatal and nothing runs. A
    /// store write failure aborts the run. Embedding failures are isolated:
    /// they are logged, recorded in the summary, and the run continues with
    /// the next document.
    pub async fn run(&self) -> Result<RunSummary> {
        let programs = self.store.list_all().await?;
        info!("Processing {} document(s)", programs.len());

        let mut summary = RunSummary::default();

        for program in programs {
            if program.is_embedded() {
                info!("Already embedded: {}", program.title);
                summary.items.push(ItemResult {
                    id: program.id,
                    title: program.title,
                    outcome: ItemOutcome::AlreadyEmbedded,
                });
                continue;
            }

            let input = program.embedding_input();

            // Pace every provider call, not just retries after a failure.
            sleep(self.pacing.inter_call_delay).await;

            info!("Embedding: {}", program.title);
            let outcome = match self
                .client
                .embed(std::slice::from_ref(&input), EmbedPurpose::Document)
                .await
            {
                Ok(vectors) => match vectors.into_iter().next() {
                    Some(embedding) => {
                        self.store.set_embedding(&program.id, embedding).await?;
                        info!("Embedded: {}", program.title);
                        ItemOutcome::Embedded
                    }
                    None => {
                        warn!("No embedding returned for '{}'", program.title);
                        ItemOutcome::Failed {
                            error: "provider returned no embedding".to_string(),
                            rate_limited: false,
                        }
                    }
                },
                Err(e) => {
                    warn!("Embedding failed for '{}': {e}", program.title);
                    let rate_limited = e.is_rate_limit();
                    if rate_limited {
                        warn!(
                            "Rate limited, cooling down for {:?}",
                            self.pacing.rate_limit_cooldown
                        );
                        sleep(self.pacing.rate_limit_cooldown).await;
                    }
                    ItemOutcome::Failed {
                        error: e.to_string(),
                        rate_limited,
                    }
                }
            };

            summary.items.push(ItemResult {
                id: program.id,
                title: program.title,
                outcome,
            });
        }

        info!(
            "Batch run finished: {} embedded, {} already embedded, {} failed",
            summary.embedded(),
            summary.already_embedded(),
            summary.failed()
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tokio::time::Instant;

    use wayfare_embeddings::{Embedding, EmbeddingError};
    use wayfare_store::{MemoryProgramStore, NewProgram, Program, StoreError};

    /// Embedding client stub: counts calls and can fail a chosen call with
    /// a rate-limit error.
    struct StubClient {
        calls: AtomicUsize,
        rate_limit_on_call: Option<usize>,
    }

    impl StubClient {
        fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                rate_limit_on_call: None,
            }
        }

        fn rate_limited_on(call: usize) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                rate_limit_on_call: Some(call),
            }
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl EmbeddingClient for StubClient {
        fn model(&self) -> &str {
            "stub"
        }

        async fn embed(
            &self,
            texts: &[String],
            _purpose: EmbedPurpose,
        ) -> wayfare_embeddings::Result<Vec<Embedding>> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            if self.rate_limit_on_call == Some(call) {
                return Err(EmbeddingError::RateLimited {
                    retry_after_secs: 1,
                });
            }
            Ok(texts.iter().map(|_| vec![call as f32, 1.0]).collect())
        }
    }

    async fn seeded_store(count: usize) -> Arc<MemoryProgramStore> {
        let store = Arc::new(MemoryProgramStore::new());
        for n in 0..count {
            store
                .insert(NewProgram::new(
                    format!("Program {n}"),
                    format!("Description {n}"),
                ))
                .await
                .unwrap();
        }
        store
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_embeds_every_unembedded_document() {
        let store = seeded_store(3).await;
        let client = Arc::new(StubClient::new());
        let pipeline = BatchEmbedder::new(store.clone(), client.clone());

        let summary = pipeline.run().await.unwrap();

        assert_eq!(summary.embedded(), 3);
        assert_eq!(summary.failed(), 0);
        assert!(summary.is_complete());
        assert_eq!(client.call_count(), 3);

        for program in store.list_all().await.unwrap() {
            assert!(program.is_embedded());
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_rerun_is_idempotent() {
        let store = seeded_store(2).await;
        let client = Arc::new(StubClient::new());
        let pipeline = BatchEmbedder::new(store.clone(), client.clone());

        pipeline.run().await.unwrap();
        assert_eq!(client.call_count(), 2);

        // Second run makes no further provider calls.
        let summary = pipeline.run().await.unwrap();
        assert_eq!(client.call_count(), 2);
        assert_eq!(summary.embedded(), 0);
        assert_eq!(summary.already_embedded(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rate_limited_item_is_skipped_and_rest_embed() {
        let store = seeded_store(5).await;
        // Call #2 (document #2) gets a rate-limit response.
        let client = Arc::new(StubClient::rate_limited_on(2));
        let pipeline = BatchEmbedder::new(store.clone(), client.clone());

        let summary = pipeline.run().await.unwrap();

        assert_eq!(summary.embedded(), 4);
        assert_eq!(summary.failed(), 1);
        assert!(matches!(
            summary.items[1].outcome,
            ItemOutcome::Failed {
                rate_limited: true,
                ..
            }
        ));

        let programs = store.list_all().await.unwrap();
        assert!(programs[0].is_embedded());
        assert!(!programs[1].is_embedded());
        assert!(programs[2].is_embedded());
        assert!(programs[3].is_embedded());
        assert!(programs[4].is_embedded());
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_item_is_retried_on_next_run() {
        let store = seeded_store(2).await;
        let client = Arc::new(StubClient::rate_limited_on(1));
        let pipeline = BatchEmbedder::new(store.clone(), client.clone());

        let first = pipeline.run().await.unwrap();
        assert_eq!(first.failed(), 1);

        // The failed document is attempted again; the already-embedded one
        // is not.
        let second = pipeline.run().await.unwrap();
        assert_eq!(second.embedded(), 1);
        assert_eq!(second.already_embedded(), 1);
        assert_eq!(client.call_count(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_pacing_delay_precedes_each_call() {
        let store = seeded_store(3).await;
        let client = Arc::new(StubClient::new());
        let pacing = PacingConfig::default().with_inter_call_delay(Duration::from_millis(300));
        let pipeline = BatchEmbedder::new(store, client).with_pacing(pacing);

        let start = Instant::now();
        pipeline.run().await.unwrap();
        assert!(start.elapsed() >= Duration::from_millis(900));
    }

    #[tokio::test(start_paused = true)]
    async fn test_rate_limit_cooldown_is_applied() {
        let store = seeded_store(2).await;
        let client = Arc::new(StubClient::rate_limited_on(1));
        let pacing = PacingConfig::default()
            .with_inter_call_delay(Duration::from_millis(100))
            .with_rate_limit_cooldown(Duration::from_secs(2));
        let pipeline = BatchEmbedder::new(store, client).with_pacing(pacing);

        let start = Instant::now();
        pipeline.run().await.unwrap();
        // Two pacing delays plus one cooldown.
        assert!(start.elapsed() >= Duration::from_millis(2200));
    }

    /// Store whose list operation always fails.
    struct BrokenStore;

    #[async_trait]
    impl ProgramStore for BrokenStore {
        async fn list_all(&self) -> wayfare_store::Result<Vec<Program>> {
            Err(StoreError::ReadFile("collection unavailable".to_string()))
        }

        async fn get(&self, _id: &str) -> wayfare_store::Result<Option<Program>> {
            Ok(None)
        }

        async fn insert(&self, _program: NewProgram) -> wayfare_store::Result<Program> {
            unreachable!("not used in this test")
        }

        async fn set_embedding(
            &self,
            _id: &str,
            _embedding: Embedding,
        ) -> wayfare_store::Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_list_failure_is_fatal() {
        let pipeline = BatchEmbedder::new(Arc::new(BrokenStore), Arc::new(StubClient::new()));
        assert!(pipeline.run().await.is_err());
    }
}
