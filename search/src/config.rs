//! Configuration for the ranking engine.

use serde::{Deserialize, Serialize};

/// Configuration for query ranking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Result-set size used when the caller does not ask for one.
    pub default_top_k: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self { default_top_k: 5 }
    }
}
