//! Embedding provider trait definition

use async_trait::async_trait;
use std::fmt::Debug;

use super::{EmbeddingRequest, EmbeddingResponse};
use crate::domain::DomainError;

/// Trait for embedding providers (Gemini, OpenAI, etc.)
#[async_trait]
pub trait EmbeddingProvider: Send + Sync + Debug {
    /// Generate embeddings for the given input
    async fn embed(&self, request: EmbeddingRequest) -> Result<EmbeddingResponse, DomainError>;

    /// Get the provider name
    fn provider_name(&self) -> &'static str;

    /// Get the default model for this provider
    fn default_model(&self) -> &'static str;

    /// Get the embedding dimensions for a model
    fn dimensions(&self, model: &str) -> Option<usize>;
}

/// Embed a single-text request and return its vector
pub async fn embed_one(
    provider: &dyn EmbeddingProvider,
    request: EmbeddingRequest,
) -> Result<Vec<f32>, DomainError> {
    let response = provider.embed(request).await?;

    response
        .into_embeddings()
        .into_iter()
        .next()
        .map(|e| e.into_vector())
        .ok_or_else(|| {
            DomainError::provider(provider.provider_name(), "Embedding response was empty")
        })
}
