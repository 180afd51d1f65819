//! Embedding provider implementations

mod gemini;
mod openai;

pub use gemini::GeminiEmbeddingProvider;
pub use openai::OpenAiEmbeddingProvider;

pub use super::llm::{HttpClient, HttpClientTrait};
