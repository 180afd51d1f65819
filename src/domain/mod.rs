//! Domain layer - Core entities, traits and pure pipeline logic

pub mod conversation;
pub mod embedding;
pub mod error;
pub mod ingestion;
pub mod llm;
pub mod query;
pub mod vector_store;

pub use conversation::{Conversation, DEFAULT_SESSION};
pub use embedding::{EmbeddingProvider, EmbeddingRequest, EmbeddingResponse, EmbeddingTask};
pub use error::DomainError;
pub use ingestion::{
    Chunk, ChunkIdScheme, ChunkingConfig, ChunkingStrategy, DocumentParser, FileOutcome,
    FileStatus, IngestionConfig, IngestionResult, ParsedDocument,
};
pub use llm::{LlmProvider, LlmRequest, LlmResponse, Message, MessageRole, ResponseText};
pub use query::{QueryAnswer, QueryConfig};
pub use vector_store::{DocumentStore, IndexedRecord, QueryMatch, RecordMetadata, SourceSummary};
