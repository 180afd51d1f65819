//! Chat endpoint handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
};
use tracing::info;

use crate::api::state::AppState;
use crate::api::types::{ApiError, ChatRequest, Json};
use crate::domain::QueryAnswer;

/// POST /chat
pub async fn chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<QueryAnswer>, ApiError> {
    if request.query.trim().is_empty() {
        return Err(ApiError::bad_request("query is required"));
    }

    let answer = state
        .query_service
        .ask(request.session_id.as_deref(), &request.query)
        .await?;

    Ok(Json(answer))
}

/// DELETE /chat/{session_id}
pub async fn reset_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> StatusCode {
    let existed = state.query_service.reset(&session_id).await;
    info!(session = %session_id, existed, "Conversation reset");

    StatusCode::NO_CONTENT
}
