//! SQLite document store implementation

use std::path::Path;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::Row;
use tracing::debug;

use crate::domain::embedding::cosine_similarity;
use crate::domain::vector_store::{
    DocumentStore, IndexedRecord, QueryMatch, RecordMetadata, SourceSummary,
};
use crate::domain::DomainError;

/// File created inside the configured vector store directory
pub const DATABASE_FILE: &str = "store.sqlite3";

/// Document store persisted in a local SQLite database.
///
/// Embeddings are stored as little-endian `f32` blobs and ranked in
/// process by cosine similarity.
#[derive(Debug, Clone)]
pub struct SqliteDocumentStore {
    pool: SqlitePool,
    collection: String,
}

impl SqliteDocumentStore {
    pub fn new(pool: SqlitePool, collection: impl Into<String>) -> Self {
        Self {
            pool,
            collection: collection.into(),
        }
    }

    /// Open (creating if needed) the database under `dir`
    pub async fn open(dir: &Path, collection: impl Into<String>) -> Result<Self, DomainError> {
        tokio::fs::create_dir_all(dir).await.map_err(|e| {
            DomainError::storage(format!(
                "Failed to create vector store directory {}: {}",
                dir.display(),
                e
            ))
        })?;

        let options = SqliteConnectOptions::new()
            .filename(dir.join(DATABASE_FILE))
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to open vector store: {}", e)))?;

        Ok(Self::new(pool, collection))
    }

    fn encode_embedding(embedding: &[f32]) -> Vec<u8> {
        embedding.iter().flat_map(|v| v.to_le_bytes()).collect()
    }

    fn decode_embedding(bytes: &[u8]) -> Vec<f32> {
        bytes
            .chunks_exact(4)
            .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
            .collect()
    }

    fn storage_error(action: &str, e: impl std::fmt::Display) -> DomainError {
        DomainError::storage(format!("Failed to {}: {}", action, e))
    }
}

#[async_trait]
impl DocumentStore for SqliteDocumentStore {
    fn collection(&self) -> &str {
        &self.collection
    }

    fn backend(&self) -> &'static str {
        "sqlite"
    }

    async fn ensure_schema(&self) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS chunk_records (
                collection TEXT NOT NULL,
                id TEXT NOT NULL,
                embedding BLOB NOT NULL,
                document TEXT NOT NULL,
                metadata TEXT NOT NULL,
                source TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                PRIMARY KEY (collection, id)
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| Self::storage_error("create table", e))?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_chunk_records_source ON chunk_records (collection, source)",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| Self::storage_error("create source index", e))?;

        Ok(())
    }

    async fn upsert(&self, records: Vec<IndexedRecord>) -> Result<usize, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| Self::storage_error("begin transaction", e))?;

        let now = Utc::now().to_rfc3339();
        let count = records.len();

        for record in records {
            let metadata = serde_json::to_string(&record.metadata)
                .map_err(|e| Self::storage_error("encode metadata", e))?;

            sqlx::query(
                r#"
                INSERT INTO chunk_records (collection, id, embedding, document, metadata, source, updated_at)
                VALUES (?, ?, ?, ?, ?, ?, ?)
                ON CONFLICT (collection, id) DO UPDATE SET
                    embedding = excluded.embedding,
                    document = excluded.document,
                    metadata = excluded.metadata,
                    source = excluded.source,
                    updated_at = excluded.updated_at
                "#,
            )
            .bind(&self.collection)
            .bind(&record.id)
            .bind(Self::encode_embedding(&record.embedding))
            .bind(&record.document)
            .bind(metadata)
            .bind(&record.metadata.source)
            .bind(&now)
            .execute(&mut *tx)
            .await
            .map_err(|e| Self::storage_error("upsert record", e))?;
        }

        tx.commit()
            .await
            .map_err(|e| Self::storage_error("commit upsert", e))?;

        debug!(collection = %self.collection, count, "Upserted records");
        Ok(count)
    }

    async fn query(&self, embedding: &[f32], k: usize) -> Result<Vec<QueryMatch>, DomainError> {
        let rows = sqlx::query(
            "SELECT id, embedding, document, metadata FROM chunk_records WHERE collection = ?",
        )
        .bind(&self.collection)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| Self::storage_error("query records", e))?;

        let mut matches = Vec::with_capacity(rows.len());
        for row in rows {
            let stored: Vec<u8> = row
                .try_get("embedding")
                .map_err(|e| Self::storage_error("read embedding", e))?;
            let metadata: String = row
                .try_get("metadata")
                .map_err(|e| Self::storage_error("read metadata", e))?;
            let metadata: RecordMetadata = serde_json::from_str(&metadata)
                .map_err(|e| Self::storage_error("decode metadata", e))?;

            matches.push(QueryMatch {
                id: row
                    .try_get("id")
                    .map_err(|e| Self::storage_error("read id", e))?,
                document: row
                    .try_get("document")
                    .map_err(|e| Self::storage_error("read document", e))?,
                metadata,
                score: cosine_similarity(embedding, &Self::decode_embedding(&stored)),
            });
        }

        matches.sort_by(|a, b| b.score.total_cmp(&a.score));
        matches.truncate(k);
        Ok(matches)
    }

    async fn count(&self) -> Result<usize, DomainError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM chunk_records WHERE collection = ?")
            .bind(&self.collection)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| Self::storage_error("count records", e))?;

        Ok(count as usize)
    }

    async fn delete_by_source(&self, source: &str) -> Result<usize, DomainError> {
        let result = sqlx::query("DELETE FROM chunk_records WHERE collection = ? AND source = ?")
            .bind(&self.collection)
            .bind(source)
            .execute(&self.pool)
            .await
            .map_err(|e| Self::storage_error("delete records", e))?;

        Ok(result.rows_affected() as usize)
    }

    async fn list_sources(&self) -> Result<Vec<SourceSummary>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT source, COUNT(*) AS records, MAX(updated_at) AS updated_at
            FROM chunk_records
            WHERE collection = ?
            GROUP BY source
            ORDER BY source
            "#,
        )
        .bind(&self.collection)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| Self::storage_error("list sources", e))?;

        rows.into_iter()
            .map(|row| {
                let records: i64 = row
                    .try_get("records")
                    .map_err(|e| Self::storage_error("read record count", e))?;
                let updated_at: Option<String> = row
                    .try_get("updated_at")
                    .map_err(|e| Self::storage_error("read updated_at", e))?;

                Ok(SourceSummary {
                    source: row
                        .try_get("source")
                        .map_err(|e| Self::storage_error("read source", e))?,
                    records: records as usize,
                    updated_at: updated_at
                        .and_then(|t| DateTime::parse_from_rfc3339(&t).ok())
                        .map(|t| t.with_timezone(&Utc)),
                })
            })
            .collect()
    }

    async fn health_check(&self) -> Result<bool, DomainError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map(|_| true)
            .map_err(|e| Self::storage_error("reach vector store", e))
    }
}
