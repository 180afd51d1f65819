//! Google Gemini embedding provider implementation

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use super::HttpClientTrait;
use crate::domain::embedding::{
    Embedding, EmbeddingProvider, EmbeddingRequest, EmbeddingResponse, EmbeddingUsage,
};
use crate::domain::DomainError;
use crate::infrastructure::llm::{model_path, DEFAULT_GEMINI_BASE_URL};

/// Known Gemini embedding models and their dimensions
const EMBEDDING_MODELS: &[(&str, usize)] = &[
    ("models/text-embedding-004", 768),
    ("models/embedding-001", 768),
    ("models/gemini-embedding-001", 3072),
];

/// Gemini embedding provider, one `embedContent` call per text
#[derive(Debug)]
pub struct GeminiEmbeddingProvider<C: HttpClientTrait> {
    client: C,
    api_key: String,
    base_url: String,
}

impl<C: HttpClientTrait> GeminiEmbeddingProvider<C> {
    pub fn new(client: C, api_key: impl Into<String>) -> Self {
        Self::with_base_url(client, api_key, DEFAULT_GEMINI_BASE_URL)
    }

    pub fn with_base_url(
        client: C,
        api_key: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            client,
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, model: &str, method: &str) -> String {
        format!("{}/v1beta/{}:{}", self.base_url, model, method)
    }

    fn headers(&self) -> Vec<(&str, &str)> {
        vec![
            ("x-goog-api-key", self.api_key.as_str()),
            ("Content-Type", "application/json"),
        ]
    }

    fn content_request(model: &str, text: &str, request: &EmbeddingRequest) -> serde_json::Value {
        let mut body = json!({
            "model": model,
            "content": {"parts": [{"text": text}]},
        });

        if let Some(task) = request.task() {
            body["taskType"] = json!(task);
        }

        body
    }

    fn provider_error(message: impl Into<String>) -> DomainError {
        DomainError::provider("gemini", message)
    }
}

#[async_trait]
impl<C: HttpClientTrait> EmbeddingProvider for GeminiEmbeddingProvider<C> {
    async fn embed(&self, request: EmbeddingRequest) -> Result<EmbeddingResponse, DomainError> {
        let model = model_path(request.model());
        let inputs = request.inputs();

        let text = match inputs.as_slice() {
            [] => return Err(DomainError::validation("Embedding request has no input")),
            [text] => text,
            texts => {
                return Err(DomainError::validation(format!(
                    "Gemini embedContent takes one input, got {}",
                    texts.len()
                )))
            }
        };

        let body = Self::content_request(&model, text, &request);
        let response = self
            .client
            .post_json(&self.url(&model, "embedContent"), self.headers(), &body)
            .await?;

        let parsed: GeminiEmbedResponse = serde_json::from_value(response).map_err(|e| {
            Self::provider_error(format!("Failed to parse embedding response: {}", e))
        })?;
        let values = parsed.embedding.values;
        if values.is_empty() {
            return Err(Self::provider_error("Embedding response contained an empty vector"));
        }

        let embeddings = vec![Embedding::new(0, values)];

        Ok(EmbeddingResponse::new(model, embeddings, EmbeddingUsage::default()))
    }

    fn provider_name(&self) -> &'static str {
        "gemini"
    }

    fn default_model(&self) -> &'static str {
        "models/text-embedding-004"
    }

    fn dimensions(&self, model: &str) -> Option<usize> {
        let model = model_path(model);
        EMBEDDING_MODELS
            .iter()
            .find(|(name, _)| *name == model)
            .map(|(_, dims)| *dims)
    }
}

// Gemini API types for embeddings

#[derive(Debug, Deserialize)]
struct GeminiEmbedResponse {
    embedding: GeminiEmbedding,
}

#[derive(Debug, Deserialize)]
struct GeminiEmbedding {
    #[serde(default)]
    values: Vec<f32>,
}
