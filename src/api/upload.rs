//! PDF upload endpoint handler

use axum::extract::{multipart::MultipartRejection, Multipart, State};
use tracing::{debug, info};

use crate::api::state::AppState;
use crate::api::types::{ApiError, Json, UploadResponse};
use crate::infrastructure::services::UploadedFile;

/// Multipart field carrying the uploaded documents
pub const FILES_FIELD: &str = "files";

/// Request body limit for uploads
pub const MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

/// POST /upload
///
/// Every file of the `files` field gets one entry in `results`, in upload
/// order. Only a request without any file fails as a whole.
pub async fn upload(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, ApiError> {
    let mut multipart = multipart
        .map_err(|_| ApiError::bad_request("no files field; use form-data 'files'"))?;

    let mut saw_field = false;
    let mut files = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::new(e.status(), e.body_text()))?
    {
        if field.name() != Some(FILES_FIELD) {
            debug!(field = ?field.name(), "Ignoring multipart field");
            continue;
        }
        saw_field = true;

        let filename = field.file_name().unwrap_or_default().to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::new(e.status(), e.body_text()))?;

        // Browsers send an empty part when no file was chosen
        if filename.is_empty() && bytes.is_empty() {
            continue;
        }

        files.push(UploadedFile::new(filename, bytes));
    }

    if !saw_field {
        return Err(ApiError::bad_request("no files field; use form-data 'files'"));
    }
    if files.is_empty() {
        return Err(ApiError::bad_request("no files uploaded"));
    }

    info!(files = files.len(), "Processing upload");

    let results = state.ingestion_service.ingest_uploads(files).await;

    Ok(Json(UploadResponse {
        ok: true,
        model: state.ingestion_service.embedding_model().to_string(),
        results,
    }))
}
