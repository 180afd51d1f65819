//! Document store trait

use async_trait::async_trait;
use std::fmt::Debug;

use super::{IndexedRecord, QueryMatch, SourceSummary};
use crate::domain::DomainError;

/// A persistent vector index over chunk records, scoped to one collection.
///
/// Record identifiers are unique within the collection; `upsert` replaces
/// any record that already has the same identifier.
#[async_trait]
pub trait DocumentStore: Send + Sync + Debug {
    /// Name of the collection this store operates on
    fn collection(&self) -> &str;

    /// Get the backend name
    fn backend(&self) -> &'static str;

    /// Create the collection and backing schema if missing
    async fn ensure_schema(&self) -> Result<(), DomainError>;

    /// Insert or replace records
    async fn upsert(&self, records: Vec<IndexedRecord>) -> Result<usize, DomainError>;

    /// Return at most `k` records, most similar first
    async fn query(&self, embedding: &[f32], k: usize) -> Result<Vec<QueryMatch>, DomainError>;

    /// Total number of records in the collection
    async fn count(&self) -> Result<usize, DomainError>;

    /// Delete every record whose metadata source matches
    async fn delete_by_source(&self, source: &str) -> Result<usize, DomainError>;

    /// Source files present in the collection with their record counts
    async fn list_sources(&self) -> Result<Vec<SourceSummary>, DomainError>;

    /// Check that the backend is reachable
    async fn health_check(&self) -> Result<bool, DomainError>;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use crate::domain::embedding::cosine_similarity;
    use std::collections::BTreeMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::RwLock;

    /// In-memory store ranking by cosine similarity, with call counters
    #[derive(Debug)]
    pub struct MockDocumentStore {
        collection: String,
        records: RwLock<BTreeMap<String, IndexedRecord>>,
        error: Option<String>,
        upserts: AtomicUsize,
        queries: AtomicUsize,
    }

    impl MockDocumentStore {
        pub fn new(collection: impl Into<String>) -> Self {
            Self {
                collection: collection.into(),
                records: RwLock::new(BTreeMap::new()),
                error: None,
                upserts: AtomicUsize::new(0),
                queries: AtomicUsize::new(0),
            }
        }

        pub fn with_records(self, records: Vec<IndexedRecord>) -> Self {
            {
                let mut stored = self.records.write().unwrap();
                for record in records {
                    stored.insert(record.id.clone(), record);
                }
            }
            self
        }

        pub fn with_error(mut self, error: impl Into<String>) -> Self {
            self.error = Some(error.into());
            self
        }

        pub fn upsert_calls(&self) -> usize {
            self.upserts.load(Ordering::SeqCst)
        }

        pub fn query_calls(&self) -> usize {
            self.queries.load(Ordering::SeqCst)
        }

        pub fn get(&self, id: &str) -> Option<IndexedRecord> {
            self.records.read().unwrap().get(id).cloned()
        }

        fn fail_if_configured(&self) -> Result<(), DomainError> {
            match self.error {
                Some(ref error) => Err(DomainError::storage(error.clone())),
                None => Ok(()),
            }
        }
    }

    #[async_trait]
    impl DocumentStore for MockDocumentStore {
        fn collection(&self) -> &str {
            &self.collection
        }

        fn backend(&self) -> &'static str {
            "mock"
        }

        async fn ensure_schema(&self) -> Result<(), DomainError> {
            self.fail_if_configured()
        }

        async fn upsert(&self, records: Vec<IndexedRecord>) -> Result<usize, DomainError> {
            self.upserts.fetch_add(1, Ordering::SeqCst);
            self.fail_if_configured()?;

            let count = records.len();
            let mut stored = self.records.write().unwrap();
            for record in records {
                stored.insert(record.id.clone(), record);
            }
            Ok(count)
        }

        async fn query(&self, embedding: &[f32], k: usize) -> Result<Vec<QueryMatch>, DomainError> {
            self.queries.fetch_add(1, Ordering::SeqCst);
            self.fail_if_configured()?;

            let stored = self.records.read().unwrap();
            let mut matches: Vec<QueryMatch> = stored
                .values()
                .map(|r| QueryMatch {
                    id: r.id.clone(),
                    document: r.document.clone(),
                    metadata: r.metadata.clone(),
                    score: cosine_similarity(embedding, &r.embedding),
                })
                .collect();

            matches.sort_by(|a, b| b.score.total_cmp(&a.score));
            matches.truncate(k);
            Ok(matches)
        }

        async fn count(&self) -> Result<usize, DomainError> {
            self.fail_if_configured()?;
            Ok(self.records.read().unwrap().len())
        }

        async fn delete_by_source(&self, source: &str) -> Result<usize, DomainError> {
            self.fail_if_configured()?;

            let mut stored = self.records.write().unwrap();
            let before = stored.len();
            stored.retain(|_, r| r.metadata.source != source);
            Ok(before - stored.len())
        }

        async fn list_sources(&self) -> Result<Vec<SourceSummary>, DomainError> {
            self.fail_if_configured()?;

            let mut counts: BTreeMap<String, usize> = BTreeMap::new();
            for record in self.records.read().unwrap().values() {
                *counts.entry(record.metadata.source.clone()).or_default() += 1;
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
            Ok(self.error.is_none())
        }
    }
}
