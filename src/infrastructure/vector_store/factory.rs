use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use super::{ChromaDocumentStore, SqliteDocumentStore};
use crate::domain::{DocumentStore, DomainError};
use crate::infrastructure::llm::HttpClient;

/// Where the document store lives
#[derive(Debug, Clone)]
pub struct StoreSettings {
    /// Directory of the local SQLite store
    pub path: PathBuf,
    /// Chroma server URL; when set it takes precedence over `path`
    pub url: Option<String>,
    pub collection: String,
    pub timeout: Duration,
}

/// Factory for creating the configured document store
#[derive(Debug)]
pub struct DocumentStoreFactory;

impl DocumentStoreFactory {
    /// Open the store and make sure its collection exists
    pub async fn create(settings: &StoreSettings) -> Result<Arc<dyn DocumentStore>, DomainError> {
        let store: Arc<dyn DocumentStore> = match settings.url.as_deref() {
            Some(url) if !url.trim().is_empty() => {
                let client = HttpClient::with_timeout(settings.timeout)?;
                Arc::new(ChromaDocumentStore::new(
                    client,
                    url,
                    settings.collection.clone(),
                ))
            }
            _ => Arc::new(
                SqliteDocumentStore::open(&settings.path, settings.collection.clone()).await?,
            ),
        };

        store.ensure_schema().await?;

        info!(
            backend = store.backend(),
            collection = store.collection(),
            "Document store ready"
        );

        Ok(store)
    }
}
