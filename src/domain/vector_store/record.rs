//! Records persisted in the document store

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Metadata attached to every stored chunk.
///
/// `page` holds the chunk index, not a PDF page number. Stores written by
/// earlier deployments only carry `page`, so it is kept alongside the
/// correctly named `chunk_index`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "StoredMetadata")]
pub struct RecordMetadata {
    pub source: String,
    pub page: usize,
    pub chunk_index: usize,
}

/// Wire shape of [`RecordMetadata`]; `chunk_index` falls back to `page`
#[derive(Deserialize)]
struct StoredMetadata {
    source: String,
    page: usize,
    #[serde(default)]
    chunk_index: Option<usize>,
}

impl From<StoredMetadata> for RecordMetadata {
    fn from(stored: StoredMetadata) -> Self {
        Self {
            source: stored.source,
            page: stored.page,
            chunk_index: stored.chunk_index.unwrap_or(stored.page),
        }
    }
}

impl RecordMetadata {
    pub fn new(source: impl Into<String>, chunk_index: usize) -> Self {
        Self {
            source: source.into(),
            page: chunk_index,
            chunk_index,
        }
    }
}

/// The persisted unit of the document store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexedRecord {
    pub id: String,
    pub embedding: Vec<f32>,
    /// Raw chunk text
    pub document: String,
    pub metadata: RecordMetadata,
}

impl IndexedRecord {
    pub fn new(
        id: impl Into<String>,
        embedding: Vec<f32>,
        document: impl Into<String>,
        metadata: RecordMetadata,
    ) -> Self {
        Self {
            id: id.into(),
            embedding,
            document: document.into(),
            metadata,
        }
    }
}

/// A record returned by a similarity query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryMatch {
    pub id: String,
    pub document: String,
    pub metadata: RecordMetadata,
    /// Cosine similarity to the query vector, higher is closer
    pub score: f32,
}

/// Records held for one source file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceSummary {
    pub source: String,
    pub records: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}
