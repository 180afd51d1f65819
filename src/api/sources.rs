//! Ingested source listing handlers

use axum::extract::{Path, State};

use crate::api::state::AppState;
use crate::api::types::{ApiError, DeleteSourceResponse, Json, SourcesResponse};

/// GET /sources
pub async fn list_sources(State(state): State<AppState>) -> Result<Json<SourcesResponse>, ApiError> {
    let sources = state.ingestion_service.list_sources().await?;
    let total_records = state.ingestion_service.document_count().await?;

    Ok(Json(SourcesResponse {
        collection: state.ingestion_service.collection().to_string(),
        total_records,
        sources,
    }))
}

/// DELETE /sources/{source}
pub async fn delete_source(
    State(state): State<AppState>,
    Path(source): Path<String>,
) -> Result<Json<DeleteSourceResponse>, ApiError> {
    let deleted = state.ingestion_service.delete_by_source(&source).await?;

    Ok(Json(DeleteSourceResponse { source, deleted }))
}
