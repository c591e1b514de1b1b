//! Message queue endpoints.
//!
//! Thin handlers over [`MessageRepository`]: decode the request, run the
//! one query it maps to, return the texts as a JSON array. Inputs that
//! decode are passed to the store untouched, with one exception: enqueue
//! takes a non-empty batch, so an empty `msgs` array is rejected up front.
//!
//! [`MessageRepository`]: crate::db::MessageRepository

use axum::extract::{Path, State};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde::Deserialize;

use super::AppState;
use super::error::ApiError;

/// Request body for `POST /messages`.
#[derive(Debug, Deserialize)]
pub struct EnqueueRequest {
    /// Owning conversation/user; many messages per user.
    pub user_id: String,
    /// Whether the batch starts out queued (undelivered).
    pub queued: bool,
    /// Message texts, inserted in order.
    pub msgs: Vec<String>,
}

/// Register message routes.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/messages", post(enqueue))
        .route("/messages/:user_id", get(list_all))
        .route("/messages/:user_id/queued", get(list_queued))
        .route("/messages/:user_id/unqueue", put(unqueue))
}

/// POST /messages - insert a batch of messages for one user.
async fn enqueue(
    State(state): State<AppState>,
    Json(req): Json<EnqueueRequest>,
) -> Result<Json<Vec<String>>, ApiError> {
    if req.msgs.is_empty() {
        return Err(ApiError::Validation(
            "msgs must be a non-empty array".to_owned(),
        ));
    }

    let inserted = state
        .db
        .messages()
        .enqueue(&req.user_id, req.queued, &req.msgs)
        .await?;
    Ok(Json(inserted))
}

/// GET /messages/:user_id - every message for the user, in delivery order.
async fn list_all(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<String>>, ApiError> {
    let records = state.db.messages().list_for_user(&user_id).await?;
    Ok(Json(records.into_iter().map(|r| r.message).collect()))
}

/// GET /messages/:user_id/queued - messages still awaiting delivery.
async fn list_queued(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<String>>, ApiError> {
    let records = state.db.messages().list_queued(&user_id).await?;
    Ok(Json(records.into_iter().map(|r| r.message).collect()))
}

/// PUT /messages/:user_id/unqueue - mark the user's messages delivered.
async fn unqueue(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<String>>, ApiError> {
    let touched = state.db.messages().unqueue(&user_id).await?;
    Ok(Json(touched))
}
