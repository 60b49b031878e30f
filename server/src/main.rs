//! Wayfare API server binary.

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use wayfare_embeddings::CohereClient;
use wayfare_search::QueryRankingEngine;
use wayfare_server::state::WebSearchFlow;
use wayfare_server::{AppState, ServerConfig, router};
use wayfare_store::JsonProgramStore;
use wayfare_websearch::{RecommendationGenerator, WebSearchClient};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = ServerConfig::from_env()?;

    let store = Arc::new(JsonProgramStore::open(&config.store_path).await?);
    let client = Arc::new(CohereClient::new(config.cohere_api_key.clone()));
    let engine = Arc::new(QueryRankingEngine::new(store, client));

    let mut state = AppState::new(engine, config.auth_token.as_str());
    if let Some(websearch) = &config.websearch {
        state = state.with_websearch(WebSearchFlow {
            client: WebSearchClient::new(&websearch.google_api_key, &websearch.google_cx),
            generator: RecommendationGenerator::new(&websearch.openai_api_key),
        });
        tracing::info!("Web-search recommendations enabled");
    }

    let app = router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!("Listening on {}", config.bind_addr);
    axum::serve(listener, app).await?;

    Ok(())
}
