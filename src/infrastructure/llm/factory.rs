use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

use super::http_client::HttpClient;
use super::{GeminiProvider, OpenAiProvider};
use crate::domain::{DomainError, EmbeddingProvider, LlmProvider};
use crate::infrastructure::embedding::{GeminiEmbeddingProvider, OpenAiEmbeddingProvider};

/// Which remote API serves embeddings and generation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    #[default]
    #[serde(alias = "gemini")]
    Google,
    #[serde(alias = "openai")]
    OpenAi,
}

impl std::str::FromStr for ProviderKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "google" | "gemini" => Ok(Self::Google),
            "openai" | "open_ai" => Ok(Self::OpenAi),
            other => Err(DomainError::configuration(format!(
                "Unknown LLM provider: {}",
                other
            ))),
        }
    }
}

/// Connection settings shared by the embedding and generation clients
#[derive(Debug, Clone)]
pub struct ProviderSettings {
    pub kind: ProviderKind,
    pub api_key: String,
    pub base_url: Option<String>,
    pub timeout: Duration,
}

/// Factory for creating embedding and generation providers
#[derive(Debug)]
pub struct LlmProviderFactory;

impl LlmProviderFactory {
    pub fn create_llm(settings: &ProviderSettings) -> Result<Arc<dyn LlmProvider>, DomainError> {
        let client = HttpClient::with_timeout(settings.timeout)?;
        let api_key = settings.api_key.clone();

        let provider: Arc<dyn LlmProvider> = match (settings.kind, settings.base_url.as_deref()) {
            (ProviderKind::Google, Some(url)) => {
                Arc::new(GeminiProvider::with_base_url(client, api_key, url))
            }
            (ProviderKind::Google, None) => Arc::new(GeminiProvider::new(client, api_key)),
            (ProviderKind::OpenAi, Some(url)) => {
                Arc::new(OpenAiProvider::with_base_url(client, api_key, url))
            }
            (ProviderKind::OpenAi, None) => Arc::new(OpenAiProvider::new(client, api_key)),
        };

        Ok(provider)
    }

    pub fn create_embedding(
        settings: &ProviderSettings,
    ) -> Result<Arc<dyn EmbeddingProvider>, DomainError> {
        let client = HttpClient::with_timeout(settings.timeout)?;
        let api_key = settings.api_key.clone();

        let provider: Arc<dyn EmbeddingProvider> =
            match (settings.kind, settings.base_url.as_deref()) {
                (ProviderKind::Google, Some(url)) => {
                    Arc::new(GeminiEmbeddingProvider::with_base_url(client, api_key, url))
                }
                (ProviderKind::Google, None) => {
                    Arc::new(GeminiEmbeddingProvider::new(client, api_key))
                }
                (ProviderKind::OpenAi, Some(url)) => {
                    Arc::new(OpenAiEmbeddingProvider::with_base_url(client, api_key, url))
                }
                (ProviderKind::OpenAi, None) => {
                    Arc::new(OpenAiEmbeddingProvider::new(client, api_key))
                }
            };

        Ok(provider)
    }
}
