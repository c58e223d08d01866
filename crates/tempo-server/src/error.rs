//! Error types for the HTTP surface.
//!
//! [`ApiError`] unifies handler failure modes into a single enum that
//! converts into an HTTP response via its
//! [`IntoResponse`](axum::response::IntoResponse) implementation.
//!
//! Note that an illegal move is NOT an [`ApiError`]: the click contract
//! answers `204 No Content` regardless of outcome, and state only
//! travels over the push stream.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Errors that can occur in the HTTP layer.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request payload was malformed (e.g. a square outside 0..64).
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The engine failed underneath a handler.
    #[error("engine error: {0}")]
    Engine(#[from] tempo_engine::EngineError),

    /// A serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Self::InvalidRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            Self::Engine(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
            Self::Serialization(e) => {
                (StatusCode::INTERNAL_SERVER_ERROR, format!("JSON error: {e}"))
            }
        };

        let body = serde_json::json!({
            "error": message,
            "status": status.as_u16(),
        });

        (status, axum::Json(body)).into_response()
    }
}
