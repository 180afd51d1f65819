//! Embedding provider domain models and traits

mod provider;
mod request;
mod response;

pub use provider::{embed_one, EmbeddingProvider};
pub use request::{EmbeddingRequest, EmbeddingTask};
pub use response::{cosine_similarity, Embedding, EmbeddingResponse, EmbeddingUsage};

#[cfg(test)]
pub use provider::mock::MockEmbeddingProvider;
