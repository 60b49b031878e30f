//! # Web-search recommendations
//!
//! A simple glue flow, separate from the embedding-based search core: query
//! a web search API for work & travel pages matching the user's prompt,
//! then hand the result snippets to a text-generation model that writes up
//! to three program recommendations.
//!
//! No ranking logic and no retries live here; provider errors surface as
//! service failures.

pub mod client;
pub mod error;
pub mod generator;

pub use client::{SearchHit, WebSearchClient};
pub use error::{Result, WebSearchError};
pub use generator::{Recommendation, RecommendationGenerator};
