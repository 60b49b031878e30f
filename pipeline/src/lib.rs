//! # Batch embedding pipeline
//!
//! Brings every document in the program store to a state where it has a
//! current embedding, exactly once, resiliently.
//!
//! The pipeline is a run-scoped, strictly sequential process: documents are
//! embedded one at a time with a pacing delay between provider calls, and a
//! rate-limit response earns an extended cooldown. Individual failures are
//! recorded and skipped; a rerun converges towards "all documents embedded"
//! as long as failures are transient.
//!
//! The crate also ships the one-shot [`loader`] that seeds the store with
//! raw program records, plus the `wayfare-embed` and `wayfare-seed`
//! binaries.

pub mod config;
pub mod error;
pub mod loader;
pub mod runner;

pub use config::PacingConfig;
pub use error::{PipelineError, Result};
pub use runner::{BatchEmbedder, ItemOutcome, ItemResult, RunSummary};
