//! API error responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

use wayfare_search::SearchError;

/// Errors surfaced to HTTP callers.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Request body is missing the query text.
    #[error("query text is required")]
    MissingQuery,

    /// Request body is missing the prompt text.
    #[error("prompt text is required")]
    MissingPrompt,

    /// No bearer token on the request.
    #[error("authentication required")]
    MissingToken,

    /// Bearer token did not verify.
    #[error("invalid authentication")]
    InvalidToken,

    /// The recommendation providers are not configured.
    #[error("recommendations are not configured")]
    RecommendationsDisabled,

    /// Provider or store failure.
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            Self::MissingQuery | Self::MissingPrompt => StatusCode::BAD_REQUEST,
            Self::MissingToken => StatusCode::UNAUTHORIZED,
            Self::InvalidToken => StatusCode::FORBIDDEN,
            Self::RecommendationsDisabled => StatusCode::SERVICE_UNAVAILABLE,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(json!({ "error": self.to_string() }));
        (self.status(), body).into_response()
    }
}

impl From<SearchError> for ApiError {
    fn from(e: SearchError) -> Self {
        match e {
            SearchError::EmptyQuery => Self::MissingQuery,
            other => Self::Internal(other.to_string()),
        }
    }
}

impl From<wayfare_websearch::WebSearchError> for ApiError {
    fn from(e: wayfare_websearch::WebSearchError) -> Self {
        Self::Internal(e.to_string())
    }
}
