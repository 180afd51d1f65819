//! Upload ingestion service

use std::path::{Path, PathBuf};
use std::sync::Arc;

use bytes::Bytes;
use tracing::{info, warn};

use crate::domain::ingestion::{is_pdf_filename, sanitize_filename};
use crate::domain::{DocumentStore, DomainError, FileOutcome, SourceSummary};
use crate::infrastructure::ingestion::IngestionPipeline;

/// Reason reported for files without a `.pdf` extension
pub const NOT_A_PDF: &str = "not a pdf";

/// One file received in an upload request
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub filename: String,
    pub bytes: Bytes,
}

impl UploadedFile {
    pub fn new(filename: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            filename: filename.into(),
            bytes: bytes.into(),
        }
    }
}

/// Trait for ingestion service (for dependency injection)
#[async_trait::async_trait]
pub trait IngestionServiceTrait: Send + Sync + std::fmt::Debug {
    /// Save and ingest every uploaded file, one outcome per file in order
    async fn ingest_uploads(&self, files: Vec<UploadedFile>) -> Vec<FileOutcome>;

    /// Ingest files already on disk
    async fn ingest_paths(&self, paths: &[PathBuf]) -> Vec<FileOutcome>;

    async fn list_sources(&self) -> Result<Vec<SourceSummary>, DomainError>;

    async fn document_count(&self) -> Result<usize, DomainError>;

    async fn delete_by_source(&self, source: &str) -> Result<usize, DomainError>;

    /// Whether the document store answers
    async fn store_ready(&self) -> Result<bool, DomainError>;

    /// Embedding model name reported to upload clients
    fn embedding_model(&self) -> &str;

    fn collection(&self) -> &str;
}

/// Ingestion service: validates uploads, keeps a copy under the upload
/// directory and runs the ingestion pipeline per file.
#[derive(Debug)]
pub struct IngestionService {
    pipeline: Arc<IngestionPipeline>,
    store: Arc<dyn DocumentStore>,
    upload_dir: PathBuf,
}

impl IngestionService {
    pub fn new(
        pipeline: Arc<IngestionPipeline>,
        store: Arc<dyn DocumentStore>,
        upload_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            pipeline,
            store,
            upload_dir: upload_dir.into(),
        }
    }

    pub fn upload_dir(&self) -> &Path {
        &self.upload_dir
    }

    /// Create the upload directory if it does not exist
    pub async fn ensure_upload_dir(&self) -> Result<(), DomainError> {
        tokio::fs::create_dir_all(&self.upload_dir)
            .await
            .map_err(|e| {
                DomainError::configuration(format!(
                    "Failed to create upload directory {}: {}",
                    self.upload_dir.display(),
                    e
                ))
            })
    }

    /// Skipped and failed entries echo the name the client sent; stored
    /// records and the ingested entry use the sanitised base name
    async fn ingest_upload(&self, file: UploadedFile) -> FileOutcome {
        if !is_pdf_filename(&file.filename) {
            info!(file = %file.filename, "Skipping non-PDF upload");
            return FileOutcome::skipped(file.filename, NOT_A_PDF);
        }

        let filename = match sanitize_filename(&file.filename) {
            Ok(name) => name,
            Err(e) => return FileOutcome::error(file.filename, message(&e)),
        };

        let save_path = self.upload_dir.join(&filename);
        if let Err(e) = tokio::fs::write(&save_path, &file.bytes).await {
            warn!(file = %filename, error = %e, "Failed to save upload");
            return FileOutcome::error(file.filename, format!("Failed to save file: {}", e));
        }

        match self.pipeline.ingest_bytes(&filename, file.bytes).await {
            Ok(result) => FileOutcome::Ingested(result),
            Err(e) => {
                warn!(file = %filename, error = %e, "Ingestion failed");
                FileOutcome::error(file.filename, message(&e))
            }
        }
    }

    async fn ingest_path(&self, path: &Path) -> FileOutcome {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        if !is_pdf_filename(&name) {
            return FileOutcome::skipped(name, NOT_A_PDF);
        }

        match self.pipeline.ingest_file(path).await {
            Ok(result) => FileOutcome::Ingested(result),
            Err(e) => {
                warn!(file = %name, error = %e, "Ingestion failed");
                FileOutcome::error(name, message(&e))
            }
        }
    }
}

/// Error text reported per file, without the variant prefix
fn message(error: &DomainError) -> String {
    match error {
        DomainError::NotFound { message }
        | DomainError::Validation { message }
        | DomainError::Extraction { message }
        | DomainError::Configuration { message }
        | DomainError::Storage { message }
        | DomainError::Internal { message } => message.clone(),
        DomainError::Provider { provider, message } => format!("{}: {}", provider, message),
    }
}

#[async_trait::async_trait]
impl IngestionServiceTrait for IngestionService {
    async fn ingest_uploads(&self, files: Vec<UploadedFile>) -> Vec<FileOutcome> {
        let mut outcomes = Vec::with_capacity(files.len());
        for file in files {
            outcomes.push(self.ingest_upload(file).await);
        }

        info!(
            files = outcomes.len(),
            ingested = outcomes.iter().filter(|o| o.is_ingested()).count(),
            "Upload batch processed"
        );

        outcomes
    }

    async fn ingest_paths(&self, paths: &[PathBuf]) -> Vec<FileOutcome> {
        let mut outcomes = Vec::with_capacity(paths.len());
        for path in paths {
            outcomes.push(self.ingest_path(path).await);
        }
        outcomes
    }

    async fn list_sources(&self) -> Result<Vec<SourceSummary>, DomainError> {
        self.store.list_sources().await
    }

    async fn document_count(&self) -> Result<usize, DomainError> {
        self.store.count().await
    }

    async fn delete_by_source(&self, source: &str) -> Result<usize, DomainError> {
        let deleted = self.store.delete_by_source(source).await?;
        if deleted == 0 {
            return Err(DomainError::not_found(format!("Source '{}'", source)));
        }

        info!(source = %source, deleted, "Source deleted");
        Ok(deleted)
    }

    async fn store_ready(&self) -> Result<bool, DomainError> {
        self.store.health_check().await
    }

    fn embedding_model(&self) -> &str {
        self.pipeline.embedding_model()
    }

    fn collection(&self) -> &str {
        self.pipeline.collection()
    }
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::sync::Mutex;

    /// Ingestion service returning canned outcomes
    #[derive(Debug, Default)]
    pub struct MockIngestionService {
        outcomes: Vec<FileOutcome>,
        sources: Vec<SourceSummary>,
        ready: bool,
        received: Mutex<Vec<String>>,
    }

    impl MockIngestionService {
        pub fn new() -> Self {
            Self {
                ready: true,
                ..Self::default()
            }
        }

        pub fn with_outcomes(mut self, outcomes: Vec<FileOutcome>) -> Self {
            self.outcomes = outcomes;
            self
        }

        pub fn with_sources(mut self, sources: Vec<SourceSummary>) -> Self {
            self.sources = sources;
            self
        }

        pub fn not_ready(mut self) -> Self {
            self.ready = false;
            self
        }

        /// File names passed to `ingest_uploads`
        pub fn received(&self) -> Vec<String> {
            self.received.lock().unwrap().clone()
        }
    }

    #[async_trait::async_trait]
    impl IngestionServiceTrait for MockIngestionService {
        async fn ingest_uploads(&self, files: Vec<UploadedFile>) -> Vec<FileOutcome> {
            self.received
                .lock()
                .unwrap()
                .extend(files.into_iter().map(|f| f.filename));
            self.outcomes.clone()
        }

        async fn ingest_paths(&self, _paths: &[PathBuf]) -> Vec<FileOutcome> {
            self.outcomes.clone()
        }

        async fn list_sources(&self) -> Result<Vec<SourceSummary>, DomainError> {
            Ok(self.sources.clone())
        }

        async fn document_count(&self) -> Result<usize, DomainError> {
            Ok(self.sources.iter().map(|s| s.records).sum())
        }

        async fn delete_by_source(&self, source: &str) -> Result<usize, DomainError> {
            self.sources
                .iter()
                .find(|s| s.source == source)
                .map(|s| s.records)
                .ok_or_else(|| DomainError::not_found(format!("Source '{}'", source)))
        }

        async fn store_ready(&self) -> Result<bool, DomainError> {
            if self.ready {
                Ok(true)
            } else {
                Err(DomainError::storage("store unreachable"))
            }
        }

        fn embedding_model(&self) -> &str {
            "models/text-embedding-004"
        }

        fn collection(&self) -> &str {
            "book_knowledge"
        }
    }
}
