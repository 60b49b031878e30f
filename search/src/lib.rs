//! # Query ranking engine
//!
//! Answers "which stored programs are most relevant to this query text".
//!
//! One embedding call per query, then a linear scan over every embedded
//! document with cosine similarity, a stable descending sort, and a top-K
//! cut. The store is small, so no index structure is built or maintained.

pub mod config;
pub mod engine;
pub mod error;

pub use config::SearchConfig;
pub use engine::{QueryRankingEngine, RankedProgram};
pub use error::{Result, SearchError};
