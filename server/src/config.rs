//! Server configuration from the environment.

use std::net::SocketAddr;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while resolving configuration at startup.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A required variable is not set. There are no fallback values for
    /// secrets; absence is a startup error.
    #[error("required environment variable {0} is not set")]
    MissingVar(&'static str),

    /// The bind address could not be parsed.
    #[error("invalid bind address: {0}")]
    InvalidBindAddr(String),
}

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address the HTTP server listens on.
    pub bind_addr: SocketAddr,

    /// Path of the program collection file.
    pub store_path: PathBuf,

    /// Embedding provider API key.
    pub cohere_api_key: String,

    /// Bearer token expected on authenticated routes.
    pub auth_token: String,

    /// Web-search recommendation configuration, when its providers are
    /// configured.
    pub websearch: Option<WebSearchConfig>,
}

/// Configuration for the web-search recommendation flow.
#[derive(Debug, Clone)]
pub struct WebSearchConfig {
    /// Google Custom Search API key.
    pub google_api_key: String,

    /// Google Custom Search engine id.
    pub google_cx: String,

    /// Text-generation API key.
    pub openai_api_key: String,
}

impl ServerConfig {
    /// Resolve configuration from the environment.
    ///
    /// `COHERE_API_KEY` and `WAYFARE_AUTH_TOKEN` are required. The
    /// recommend route is enabled only when `GOOGLE_API_KEY`, `GOOGLE_CX`
    /// and `OPENAI_API_KEY` are all present.
    pub fn from_env() -> Result<Self, ConfigError> {
        let cohere_api_key =
            std::env::var("COHERE_API_KEY").map_err(|_| ConfigError::MissingVar("COHERE_API_KEY"))?;
        let auth_token = std::env::var("WAYFARE_AUTH_TOKEN")
            .map_err(|_| ConfigError::MissingVar("WAYFARE_AUTH_TOKEN"))?;

        let bind = std::env::var("WAYFARE_BIND").unwrap_or_else(|_| "127.0.0.1:8080".to_string());
        let bind_addr = bind
            .parse()
            .map_err(|_| ConfigError::InvalidBindAddr(bind))?;

        let store_path = std::env::var("WAYFARE_STORE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("data/programs.json"));

        let websearch = match (
            std::env::var("GOOGLE_API_KEY"),
            std::env::var("GOOGLE_CX"),
            std::env::var("OPENAI_API_KEY"),
        ) {
            (Ok(google_api_key), Ok(google_cx), Ok(openai_api_key)) => Some(WebSearchConfig {
                google_api_key,
                google_cx,
                openai_api_key,
            }),
            _ => None,
        };

        Ok(Self {
            bind_addr,
            store_path,
            cohere_api_key,
            auth_token,
            websearch,
        })
    }
}
