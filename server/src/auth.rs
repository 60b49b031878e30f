//! Bearer-token gate for authenticated routes.
//!
//! Token verification is a pass/fail check against the configured value;
//! no protocol beyond the `Authorization: Bearer` header is implemented.

use axum::extract::{Request, State};
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::Response;
use tracing::warn;

use crate::error::ApiError;
use crate::state::AppState;

/// Extract the bearer token from the Authorization header, if any.
pub fn extract_bearer(headers: &HeaderMap) -> Option<&str> {
    headers
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
}

/// Middleware guarding authenticated routes.
///
/// Missing token → 401; present but non-matching token → 403.
pub async fn auth_middleware(
    State(state): State<AppState>,
    headers: HeaderMap,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    match extract_bearer(&headers) {
        None => Err(ApiError::MissingToken),
        Some(token) if token == state.auth_token.as_ref() => Ok(next.run(request).await),
        Some(_) => {
            warn!("Rejected request with invalid bearer token");
            Err(ApiError::InvalidToken)
        }
    }
}
