//! Generation provider implementations and the shared HTTP client

mod factory;
mod gemini;
mod http_client;
mod openai;

pub use factory::{LlmProviderFactory, ProviderKind, ProviderSettings};
pub use gemini::GeminiProvider;
pub(crate) use gemini::{model_path, DEFAULT_GEMINI_BASE_URL};
pub use http_client::{HttpClient, HttpClientTrait};
pub use openai::OpenAiProvider;
pub(crate) use openai::DEFAULT_OPENAI_BASE_URL;

#[cfg(test)]
pub use http_client::mock::MockHttpClient;
