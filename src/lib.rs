//! Book RAG
//!
//! Retrieval-augmented question answering over uploaded books:
//! - PDF ingestion into a persistent vector store (SQLite or Chroma)
//! - Gemini or OpenAI embeddings and generation
//! - Per-session conversation history for follow-up questions

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use api::state::AppState;
use infrastructure::{
    conversation::ConversationStore,
    ingestion::{IngestionPipeline, PdfParser, RecursiveChunker},
    llm::LlmProviderFactory,
    query::QueryPipeline,
    services::{IngestionService, QueryService},
    vector_store::DocumentStoreFactory,
};
use tracing::{info, warn};

/// Services built from configuration, shared by the server and the CLI
#[derive(Debug, Clone)]
pub struct Services {
    pub ingestion: Arc<IngestionService>,
    pub query: Arc<QueryService>,
}

/// Build providers, the document store and both pipelines
pub async fn create_services(config: &AppConfig) -> anyhow::Result<Services> {
    config.validate()?;

    if config.providers.api_key.trim().is_empty() {
        warn!("No provider API key configured; embedding and generation calls will fail");
    }

    let provider_settings = config.provider_settings();
    let embeddings = LlmProviderFactory::create_embedding(&provider_settings)?;
    let llm = LlmProviderFactory::create_llm(&provider_settings)?;

    let store = DocumentStoreFactory::create(&config.store_settings()).await?;

    let ingestion_pipeline = Arc::new(IngestionPipeline::new(
        Arc::new(PdfParser::new()),
        Arc::new(RecursiveChunker::new()),
        Arc::clone(&embeddings),
        Arc::clone(&store),
        config.providers.embedding_model.clone(),
        config.ingestion.to_ingestion_config(),
    ));

    let ingestion = IngestionService::new(
        ingestion_pipeline,
        Arc::clone(&store),
        config.storage.upload_dir.clone(),
    );
    ingestion.ensure_upload_dir().await?;

    let query_pipeline = Arc::new(QueryPipeline::new(
        embeddings,
        llm,
        store,
        ConversationStore::new(config.conversation.max_turns)
            .with_max_sessions(config.conversation.max_sessions),
        config.providers.embedding_model.clone(),
        config.providers.generation_model.clone(),
        config.query.clone(),
    ));

    info!(
        provider = ?config.providers.kind,
        embedding_model = %config.providers.embedding_model,
        generation_model = %config.providers.generation_model,
        upload_dir = %config.storage.upload_dir.display(),
        "Services initialized"
    );

    Ok(Services {
        ingestion: Arc::new(ingestion),
        query: Arc::new(QueryService::new(query_pipeline)),
    })
}

/// Create the application state with custom configuration
pub async fn create_app_state_with_config(config: &AppConfig) -> anyhow::Result<AppState> {
    let services = create_services(config).await?;

    Ok(AppState::new(services.ingestion, services.query))
}
