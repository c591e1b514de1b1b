//! Uniform error responses for the HTTP surface.
//!
//! Every handler returns `Result<T, ApiError>`; the `IntoResponse` impl
//! converts failures to a JSON body of the shape `{ "error": ... }`.
//!
//! Storage failures are logged with full detail but only a generic message
//! is returned to the caller, so SQL or file paths never leak to clients.
//! Validation failures carry their message verbatim.

use crate::db::DbError;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// All errors that can occur in the request lifecycle.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Propagated from the message store.
    #[error("storage error: {0}")]
    Storage(#[from] DbError),

    /// The caller sent a request outside the operation's input domain.
    #[error("invalid request: {0}")]
    Validation(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, client_message) = match &self {
            // Client-facing: expose the message directly.
            ApiError::Validation(m) => (StatusCode::BAD_REQUEST, m.clone()),

            // Internal: log the full detail, return a generic description.
            ApiError::Storage(e) => {
                error!(error = %e, "storage error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_owned(),
                )
            }
        };
        (status, Json(json!({ "error": client_message }))).into_response()
    }
}
