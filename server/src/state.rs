//! Shared application state.

use std::sync::Arc;

use wayfare_search::QueryRankingEngine;
use wayfare_websearch::{RecommendationGenerator, WebSearchClient};

/// Web-search recommendation collaborators, bundled.
pub struct WebSearchFlow {
    /// Search API client.
    pub client: WebSearchClient,

    /// Text-generation client.
    pub generator: RecommendationGenerator,
}

/// State shared by all request handlers.
///
/// Everything here is read-only per request; concurrent calls share no
/// mutable state.
#[derive(Clone)]
pub struct AppState {
    /// Query ranking engine.
    pub engine: Arc<QueryRankingEngine>,

    /// Web-search recommendation flow, when configured.
    pub websearch: Option<Arc<WebSearchFlow>>,

    /// Bearer token expected on authenticated routes.
    pub auth_token: Arc<str>,
}

impl AppState {
    /// Create state over the given engine with no recommendation flow.
    pub fn new(engine: Arc<QueryRankingEngine>, auth_token: impl Into<Arc<str>>) -> Self {
        Self {
            engine,
            websearch: None,
            auth_token: auth_token.into(),
        }
    }

    /// Attach the web-search recommendation flow.
    pub fn with_websearch(mut self, flow: WebSearchFlow) -> Self {
        self.websearch = Some(Arc::new(flow));
        self
    }
}
