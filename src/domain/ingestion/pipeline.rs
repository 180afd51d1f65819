//! Ingestion pipeline types and configuration

use serde::{Deserialize, Serialize};

use super::chunker::ChunkingConfig;
use crate::domain::DomainError;

/// How stored record identifiers are derived from a chunk
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ChunkIdScheme {
    /// `chunk_<i>`: identifiers are shared across files, so a later
    /// ingestion overwrites records of an earlier one at the same index
    #[default]
    Index,
    /// `<file>_chunk_<i>`: identifiers are unique per source file
    Source,
}

impl ChunkIdScheme {
    pub fn record_id(&self, source: &str, index: usize) -> String {
        match self {
            Self::Index => format!("chunk_{}", index),
            Self::Source => format!("{}_chunk_{}", source, index),
        }
    }
}

/// Configuration for document ingestion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestionConfig {
    #[serde(flatten)]
    pub chunking: ChunkingConfig,
    /// Only the first `max_chunks` chunks are embedded and stored
    pub max_chunks: usize,
    #[serde(default)]
    pub id_scheme: ChunkIdScheme,
}

impl Default for IngestionConfig {
    fn default() -> Self {
        Self {
            chunking: ChunkingConfig::default(),
            max_chunks: 100,
            id_scheme: ChunkIdScheme::default(),
        }
    }
}

impl IngestionConfig {
    pub fn with_chunking(mut self, chunking: ChunkingConfig) -> Self {
        self.chunking = chunking;
        self
    }

    pub fn with_max_chunks(mut self, max_chunks: usize) -> Self {
        self.max_chunks = max_chunks;
        self
    }

    pub fn with_id_scheme(mut self, id_scheme: ChunkIdScheme) -> Self {
        self.id_scheme = id_scheme;
        self
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        self.chunking.validate()?;

        if self.max_chunks == 0 {
            return Err(DomainError::validation("max_chunks must be greater than 0"));
        }

        Ok(())
    }
}

/// Result of ingesting one file.
///
/// `chunks` counts every chunk produced; `added` counts the stored ones,
/// which is at most the configured chunk cap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestionResult {
    pub file: String,
    pub chunks: usize,
    pub added: usize,
    pub collection: String,
}

/// Status of an uploaded file that produced no ingestion result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileStatus {
    Skipped,
    Error,
}

/// Outcome for one file of an upload batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FileOutcome {
    Ingested(IngestionResult),
    Failed {
        file: String,
        status: FileStatus,
        reason: String,
    },
}

impl FileOutcome {
    pub fn skipped(file: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Failed {
            file: file.into(),
            status: FileStatus::Skipped,
            reason: reason.into(),
        }
    }

    pub fn error(file: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Failed {
            file: file.into(),
            status: FileStatus::Error,
            reason: reason.into(),
        }
    }

    pub fn file(&self) -> &str {
        match self {
            Self::Ingested(result) => &result.file,
            Self::Failed { file, .. } => file,
        }
    }

    pub fn is_ingested(&self) -> bool {
        matches!(self, Self::Ingested(_))
    }
}
