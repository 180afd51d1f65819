//! Question answering service

use std::sync::Arc;

use crate::domain::{DomainError, QueryAnswer, DEFAULT_SESSION};
use crate::infrastructure::query::QueryPipeline;

/// Trait for query service (for dependency injection)
#[async_trait::async_trait]
pub trait QueryServiceTrait: Send + Sync + std::fmt::Debug {
    /// Answer a query; `None` uses the shared default session
    async fn ask(&self, session_id: Option<&str>, query: &str)
        -> Result<QueryAnswer, DomainError>;

    /// Clear a session's history; returns whether it existed
    async fn reset(&self, session_id: &str) -> bool;
}

/// Query service backed by the query pipeline
#[derive(Debug)]
pub struct QueryService {
    pipeline: Arc<QueryPipeline>,
}

impl QueryService {
    pub fn new(pipeline: Arc<QueryPipeline>) -> Self {
        Self { pipeline }
    }
}

fn session_or_default(session_id: Option<&str>) -> &str {
    match session_id.map(str::trim) {
        Some(id) if !id.is_empty() => id,
        _ => DEFAULT_SESSION,
    }
}

#[async_trait::async_trait]
impl QueryServiceTrait for QueryService {
    async fn ask(
        &self,
        session_id: Option<&str>,
        query: &str,
    ) -> Result<QueryAnswer, DomainError> {
        self.pipeline.ask(session_or_default(session_id), query).await
    }

    async fn reset(&self, session_id: &str) -> bool {
        self.pipeline.conversations().reset(session_id).await
    }
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::sync::Mutex;

    /// Query service echoing a fixed reply, with the validation of the real one
    #[derive(Debug)]
    pub struct MockQueryService {
        reply: String,
        error: Option<String>,
        calls: Mutex<Vec<(Option<String>, String)>>,
    }

    impl MockQueryService {
        pub fn new(reply: impl Into<String>) -> Self {
            Self {
                reply: reply.into(),
                error: None,
                calls: Mutex::new(Vec::new()),
            }
        }

        /// Fail every non-blank query with a provider error
        pub fn with_error(mut self, error: impl Into<String>) -> Self {
            self.error = Some(error.into());
            self
        }

        pub fn calls(&self) -> Vec<(Option<String>, String)> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait::async_trait]
    impl QueryServiceTrait for MockQueryService {
        async fn ask(
            &self,
            session_id: Option<&str>,
            query: &str,
        ) -> Result<QueryAnswer, DomainError> {
            if query.trim().is_empty() {
                return Err(DomainError::validation("query is required"));
            }

            self.calls
                .lock()
                .unwrap()
                .push((session_id.map(String::from), query.to_string()));

            if let Some(ref error) = self.error {
                return Err(DomainError::provider("mock", error));
            }

            Ok(QueryAnswer {
                query: query.to_string(),
                response: self.reply.clone(),
            })
        }

        async fn reset(&self, session_id: &str) -> bool {
            self.calls
                .lock()
                .unwrap()
                .iter()
                .any(|(s, _)| s.as_deref() == Some(session_id))
        }
    }
}
