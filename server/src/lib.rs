//! # Wayfare HTTP API
//!
//! Thin request layer over the query ranking engine and the web-search
//! recommendation flow. Routing, CORS and bearer-token checking live here;
//! everything with algorithmic content lives in the crates below.

pub mod auth;
pub mod config;
pub mod error;
pub mod routes;
pub mod state;

pub use config::{ConfigError, ServerConfig};
pub use error::ApiError;
pub use routes::router;
pub use state::AppState;
