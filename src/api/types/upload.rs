//! Upload and source listing types

use serde::{Deserialize, Serialize};

use crate::domain::{FileOutcome, SourceSummary};

/// Response of `POST /upload`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    pub ok: bool,
    /// Embedding model used for the stored vectors
    pub model: String,
    pub results: Vec<FileOutcome>,
}

/// Response of `GET /sources`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourcesResponse {
    pub collection: String,
    pub total_records: usize,
    pub sources: Vec<SourceSummary>,
}

/// Response of `DELETE /sources/{source}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteSourceResponse {
    pub source: String,
    pub deleted: usize,
}
