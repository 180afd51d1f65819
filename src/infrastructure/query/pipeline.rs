//! Query pipeline: embed, retrieve, assemble the prompt and generate

use std::sync::Arc;
use tracing::{debug, info};

use crate::domain::embedding::{embed_one, EmbeddingProvider, EmbeddingRequest, EmbeddingTask};
use crate::domain::query::{
    build_context, build_prompt, QueryAnswer, QueryConfig, SYSTEM_INSTRUCTION,
};
use crate::domain::{DocumentStore, DomainError, LlmProvider, LlmRequest};
use crate::infrastructure::conversation::ConversationStore;

/// Answers questions from retrieved book context, continuing a session's
/// conversation.
///
/// The assembled prompt (question plus context) is what gets recorded in the
/// session history, so follow-up questions see earlier context too.
pub struct QueryPipeline {
    embeddings: Arc<dyn EmbeddingProvider>,
    llm: Arc<dyn LlmProvider>,
    store: Arc<dyn DocumentStore>,
    conversations: ConversationStore,
    embedding_model: String,
    generation_model: String,
    config: QueryConfig,
}

impl std::fmt::Debug for QueryPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryPipeline")
            .field("embeddings", &self.embeddings.provider_name())
            .field("llm", &self.llm.provider_name())
            .field("collection", &self.store.collection())
            .field("embedding_model", &self.embedding_model)
            .field("generation_model", &self.generation_model)
            .field("config", &self.config)
            .finish()
    }
}

impl QueryPipeline {
    pub fn new(
        embeddings: Arc<dyn EmbeddingProvider>,
        llm: Arc<dyn LlmProvider>,
        store: Arc<dyn DocumentStore>,
        conversations: ConversationStore,
        embedding_model: impl Into<String>,
        generation_model: impl Into<String>,
        config: QueryConfig,
    ) -> Self {
        Self {
            embeddings,
            llm,
            store,
            conversations,
            embedding_model: embedding_model.into(),
            generation_model: generation_model.into(),
            config,
        }
    }

    pub fn conversations(&self) -> &ConversationStore {
        &self.conversations
    }

    /// Answer `query` within the given session.
    ///
    /// A blank query fails with a validation error before any provider or
    /// store call. The answer echoes `query` as submitted, while retrieval
    /// and the prompt use the trimmed text. The exchange is recorded only
    /// when a reply text exists.
    pub async fn ask(&self, session_id: &str, submitted: &str) -> Result<QueryAnswer, DomainError> {
        let query = submitted.trim();
        if query.is_empty() {
            return Err(DomainError::validation("query is required"));
        }

        let request = EmbeddingRequest::single(&self.embedding_model, query)
            .with_task(EmbeddingTask::RetrievalQuery);
        let embedding = embed_one(self.embeddings.as_ref(), request).await?;

        let matches = self.store.query(&embedding, self.config.top_k).await?;
        debug!(
            ids = ?matches.iter().map(|m| m.id.as_str()).collect::<Vec<_>>(),
            "Retrieved chunks"
        );

        let context = build_context(&matches);
        let prompt = build_prompt(query, &context);

        let history = self.conversations.history(session_id).await;
        let history_len = history.len();

        let request = LlmRequest::builder()
            .system(SYSTEM_INSTRUCTION)
            .history(history)
            .user(prompt.as_str())
            .build();

        let response = self.llm.chat(&self.generation_model, request).await?;
        let text = response.text.into_text(self.llm.provider_name())?;

        self.conversations
            .record_turn(session_id, &prompt, &text)
            .await;

        info!(
            session = %session_id,
            query_chars = query.chars().count(),
            retrieved = matches.len(),
            history = history_len,
            "Query answered"
        );

        Ok(QueryAnswer {
            query: submitted.to_string(),
            response: text,
        })
    }
}
