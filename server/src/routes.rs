//! HTTP routes.

use axum::extract::State;
use axum::http::{Method, header};
use axum::middleware;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info};

use wayfare_search::RankedProgram;
use wayfare_websearch::Recommendation;

use crate::auth::auth_middleware;
use crate::error::ApiError;
use crate::state::AppState;

/// Upper bound on the requested result-set size.
const MAX_TOP_K: usize = 50;

/// Default result-set size, matching the ranking engine.
const DEFAULT_TOP_K: usize = 5;

/// Semantic search request body.
#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    /// Free-text query.
    pub query: Option<String>,

    /// Requested result-set size.
    pub top_k: Option<usize>,
}

/// Semantic search response body.
#[derive(Debug, Serialize)]
pub struct SearchResponse {
    /// Ranked results, best first.
    pub results: Vec<RankedProgram>,
}

/// Recommendation request body.
#[derive(Debug, Deserialize)]
pub struct RecommendRequest {
    /// Free-text description of what the caller is looking for.
    pub prompt: Option<String>,
}

/// Recommendation response body.
#[derive(Debug, Serialize)]
pub struct RecommendResponse {
    /// Generated recommendations.
    pub recommendations: Vec<Recommendation>,
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/search", post(search))
        .route("/recommend", post(recommend))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .route("/health", get(health))
        .merge(protected)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([Method::GET, Method::POST])
                .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]),
        )
        .with_state(state)
}

async fn health() -> &'static str {
    "OK"
}

async fn search(
    State(state): State<AppState>,
    Json(request): Json<SearchRequest>,
) -> Result<Json<SearchResponse>, ApiError> {
    let query = request.query.unwrap_or_default();
    let top_k = request.top_k.unwrap_or(DEFAULT_TOP_K).min(MAX_TOP_K);

    info!("Search request for {top_k} result(s)");

    let results = state.engine.rank(&query, top_k).await.map_err(|e| {
        let api_error = ApiError::from(e);
        if matches!(api_error, ApiError::Internal(_)) {
            error!("Search failed: {api_error}");
        }
        api_error
    })?;

    Ok(Json(SearchResponse { results }))
}

async fn recommend(
    State(state): State<AppState>,
    Json(request): Json<RecommendRequest>,
) -> Result<Json<RecommendResponse>, ApiError> {
    let flow = state
        .websearch
        .as_ref()
        .ok_or(ApiError::RecommendationsDisabled)?;

    let prompt = request.prompt.unwrap_or_default();
    if prompt.trim().is_empty() {
        return Err(ApiError::MissingPrompt);
    }

    let hits = flow.client.search(&prompt).await.inspect_err(|e| {
        error!("Web search failed: {e}");
    })?;
    let recommendations = flow.generator.generate(&prompt, &hits).await.inspect_err(|e| {
        error!("Recommendation generation failed: {e}");
    })?;

    Ok(Json(RecommendResponse { recommendations }))
}
