//! Chroma HTTP document store implementation

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tokio::sync::OnceCell;
use tracing::debug;

use crate::domain::vector_store::{
    DocumentStore, IndexedRecord, QueryMatch, RecordMetadata, SourceSummary,
};
use crate::domain::DomainError;
use crate::infrastructure::llm::HttpClientTrait;

/// Document store backed by a Chroma server's REST API.
///
/// The collection is created on first use with cosine distance, so scores
/// are reported as `1 - distance`.
#[derive(Debug)]
pub struct ChromaDocumentStore<C: HttpClientTrait> {
    client: C,
    base_url: String,
    collection: String,
    collection_id: OnceCell<String>,
}

impl<C: HttpClientTrait> ChromaDocumentStore<C> {
    pub fn new(client: C, base_url: impl Into<String>, collection: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            collection: collection.into(),
            collection_id: OnceCell::new(),
        }
    }

    fn headers(&self) -> Vec<(&str, &str)> {
        vec![("Content-Type", "application/json")]
    }

    fn collections_url(&self) -> String {
        format!("{}/api/v1/collections", self.base_url)
    }

    async fn collection_url(&self, action: &str) -> Result<String, DomainError> {
        let id = self.collection_id().await?;
        Ok(format!("{}/{}/{}", self.collections_url(), id, action))
    }

    async fn collection_id(&self) -> Result<&str, DomainError> {
        self.collection_id
            .get_or_try_init(|| async {
                let body = json!({
                    "name": self.collection,
                    "get_or_create": true,
                    "metadata": {"hnsw:space": "cosine"},
                });
                let response = self
                    .client
                    .post_json(&self.collections_url(), self.headers(), &body)
                    .await?;

                let collection: ChromaCollection = parse(response, "collection")?;
                debug!(collection = %self.collection, id = %collection.id, "Resolved Chroma collection");
                Ok(collection.id)
            })
            .await
            .map(String::as_str)
    }

    async fn get_metadatas(
        &self,
        filter: Option<serde_json::Value>,
    ) -> Result<Vec<RecordMetadata>, DomainError> {
        let mut body = json!({ "include": ["metadatas"] });
        if let Some(filter) = filter {
            body["where"] = filter;
        }

        let url = self.collection_url("get").await?;
        let response = self.client.post_json(&url, self.headers(), &body).await?;
        let result: ChromaGetResult = parse(response, "get result")?;

        Ok(result.metadatas.into_iter().flatten().collect())
    }
}

fn parse<T: for<'de> Deserialize<'de>>(
    value: serde_json::Value,
    what: &str,
) -> Result<T, DomainError> {
    serde_json::from_value(value)
        .map_err(|e| DomainError::storage(format!("Failed to parse Chroma {}: {}", what, e)))
}

#[async_trait]
impl<C: HttpClientTrait> DocumentStore for ChromaDocumentStore<C> {
    fn collection(&self) -> &str {
        &self.collection
    }

    fn backend(&self) -> &'static str {
        "chroma"
    }

    async fn ensure_schema(&self) -> Result<(), DomainError> {
        self.collection_id().await.map(|_| ())
    }

    async fn upsert(&self, records: Vec<IndexedRecord>) -> Result<usize, DomainError> {
        let count = records.len();
        let mut ids = Vec::with_capacity(count);
        let mut embeddings = Vec::with_capacity(count);
        let mut documents = Vec::with_capacity(count);
        let mut metadatas = Vec::with_capacity(count);

        for record in records {
            ids.push(record.id);
            embeddings.push(record.embedding);
            documents.push(record.document);
            metadatas.push(record.metadata);
        }

        let body = json!({
            "ids": ids,
            "embeddings": embeddings,
            "documents": documents,
            "metadatas": metadatas,
        });

        let url = self.collection_url("upsert").await?;
        self.client.post_json(&url, self.headers(), &body).await?;
        Ok(count)
    }

    async fn query(&self, embedding: &[f32], k: usize) -> Result<Vec<QueryMatch>, DomainError> {
        let body = json!({
            "query_embeddings": [embedding],
            "n_results": k,
            "include": ["documents", "metadatas", "distances"],
        });

        let url = self.collection_url("query").await?;
        let response = self.client.post_json(&url, self.headers(), &body).await?;
        let result: ChromaQueryResult = parse(response, "query result")?;

        let ids = result.ids.into_iter().next().unwrap_or_default();
        let mut documents = result.documents.into_iter().next().unwrap_or_default().into_iter();
        let mut metadatas = result.metadatas.into_iter().next().unwrap_or_default().into_iter();
        let mut distances = result.distances.into_iter().next().unwrap_or_default().into_iter();

        let matches = ids
            .into_iter()
            .map(|id| {
                let document = documents.next().flatten().unwrap_or_default();
                let metadata = metadatas
                    .next()
                    .flatten()
                    .unwrap_or_else(|| RecordMetadata::new("", 0));
                let distance = distances.next().flatten().unwrap_or(1.0);

                QueryMatch {
                    id,
                    document,
                    metadata,
                    score: 1.0 - distance,
                }
            })
            .take(k)
            .collect();

        Ok(matches)
    }

    async fn count(&self) -> Result<usize, DomainError> {
        let url = self.collection_url("count").await?;
        let response = self.client.get_json(&url, self.headers()).await?;
        parse(response, "count")
    }

    async fn delete_by_source(&self, source: &str) -> Result<usize, DomainError> {
        let filter = json!({ "source": source });
        let matching = self.get_metadatas(Some(filter.clone())).await?.len();

        if matching > 0 {
            let url = self.collection_url("delete").await?;
            self.client
                .post_json(&url, self.headers(), &json!({ "where": filter }))
                .await?;
        }

        Ok(matching)
    }

    async fn list_sources(&self) -> Result<Vec<SourceSummary>, DomainError> {
        let mut counts: BTreeMap<String, usize> = BTreeMap::new();
        for metadata in self.get_metadatas(None).await? {
            *counts.entry(metadata.source).or_default() += 1;
        }

        Ok(counts
            .into_iter()
            .map(|(source, records)| SourceSummary {
                source,
                records,
                updated_at: None,
            })
            .collect())
    }

    async fn health_check(&self) -> Result<bool, DomainError> {
        let url = format!("{}/api/v1/heartbeat", self.base_url);
        self.client.get_json(&url, self.headers()).await.map(|_| true)
    }
}

// Chroma API types

#[derive(Debug, Deserialize)]
struct ChromaCollection {
    id: String,
}

#[derive(Debug, Deserialize)]
struct ChromaQueryResult {
    #[serde(default)]
    ids: Vec<Vec<String>>,
    #[serde(default)]
    documents: Vec<Vec<Option<String>>>,
    #[serde(default)]
    metadatas: Vec<Vec<Option<RecordMetadata>>>,
    #[serde(default)]
    distances: Vec<Vec<Option<f32>>>,
}

#[derive(Debug, Deserialize)]
struct ChromaGetResult {
    #[serde(default)]
    metadatas: Vec<Option<RecordMetadata>>,
}
