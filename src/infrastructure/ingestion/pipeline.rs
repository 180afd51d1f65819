//! Ingestion pipeline: extract, chunk, embed and store one document

use bytes::Bytes;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

use crate::domain::embedding::{embed_one, EmbeddingProvider, EmbeddingRequest, EmbeddingTask};
use crate::domain::ingestion::{
    ChunkingStrategy, DocumentParser, IngestionConfig, IngestionResult, ParsedDocument,
};
use crate::domain::vector_store::{DocumentStore, IndexedRecord, RecordMetadata};
use crate::domain::DomainError;

/// Pipeline turning one uploaded document into stored chunk records.
///
/// Only the first `max_chunks` chunks are embedded and stored; the result
/// still reports the full chunk count, so retrieval coverage of large
/// documents is partial by configuration.
pub struct IngestionPipeline {
    parser: Arc<dyn DocumentParser>,
    chunker: Arc<dyn ChunkingStrategy>,
    embeddings: Arc<dyn EmbeddingProvider>,
    store: Arc<dyn DocumentStore>,
    embedding_model: String,
    config: IngestionConfig,
}

impl std::fmt::Debug for IngestionPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IngestionPipeline")
            .field("parser", &self.parser.name())
            .field("chunker", &self.chunker.name())
            .field("embeddings", &self.embeddings.provider_name())
            .field("collection", &self.store.collection())
            .field("embedding_model", &self.embedding_model)
            .field("config", &self.config)
            .finish()
    }
}

impl IngestionPipeline {
    pub fn new(
        parser: Arc<dyn DocumentParser>,
        chunker: Arc<dyn ChunkingStrategy>,
        embeddings: Arc<dyn EmbeddingProvider>,
        store: Arc<dyn DocumentStore>,
        embedding_model: impl Into<String>,
        config: IngestionConfig,
    ) -> Self {
        Self {
            parser,
            chunker,
            embeddings,
            store,
            embedding_model: embedding_model.into(),
            config,
        }
    }

    pub fn collection(&self) -> &str {
        self.store.collection()
    }

    pub fn embedding_model(&self) -> &str {
        &self.embedding_model
    }

    /// Ingest a document read from disk, recorded under its base name
    pub async fn ingest_file(&self, path: &Path) -> Result<IngestionResult, DomainError> {
        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| {
                DomainError::validation(format!("Invalid file path: {}", path.display()))
            })?
            .to_string();

        let bytes = tokio::fs::read(path).await.map_err(|e| {
            DomainError::extraction(format!("Failed to read {}: {}", path.display(), e))
        })?;

        self.ingest_bytes(&filename, Bytes::from(bytes)).await
    }

    /// Ingest document bytes under the given source name.
    ///
    /// Any embedding or storage failure fails the whole document. Chunks
    /// stored before the failure are left in place.
    pub async fn ingest_bytes(
        &self,
        filename: &str,
        bytes: Bytes,
    ) -> Result<IngestionResult, DomainError> {
        let parsed = self.parse(filename, bytes).await?;
        let text = parsed.text();

        let chunks = self.chunker.chunk(&text, &self.config.chunking)?;
        let total = chunks.len();

        info!(
            file = %filename,
            pages = parsed.metadata.page_count,
            title = parsed.metadata.title.as_deref(),
            author = parsed.metadata.author.as_deref(),
            chars = text.chars().count(),
            chunks = total,
            "Document chunked"
        );

        let mut added = 0;
        for chunk in chunks.into_iter().take(self.config.max_chunks) {
            let request = EmbeddingRequest::single(&self.embedding_model, chunk.content.as_str())
                .with_task(EmbeddingTask::RetrievalDocument);
            let embedding = embed_one(self.embeddings.as_ref(), request).await?;

            let record = IndexedRecord::new(
                self.config.id_scheme.record_id(filename, chunk.index),
                embedding,
                chunk.content,
                RecordMetadata::new(filename, chunk.index),
            );

            debug!(file = %filename, id = %record.id, "Storing chunk");
            self.store.upsert(vec![record]).await?;
            added += 1;
        }

        info!(
            file = %filename,
            chunks = total,
            added,
            collection = %self.store.collection(),
            "Document ingested"
        );

        Ok(IngestionResult {
            file: filename.to_string(),
            chunks: total,
            added,
            collection: self.store.collection().to_string(),
        })
    }

    async fn parse(&self, filename: &str, bytes: Bytes) -> Result<ParsedDocument, DomainError> {
        let parser = Arc::clone(&self.parser);
        let name = filename.to_string();

        tokio::task::spawn_blocking(move || parser.parse(&bytes, &name))
            .await
            .map_err(|e| DomainError::internal(format!("Parser task failed: {}", e)))?
    }
}
