//! Embedding request types

use serde::{Deserialize, Serialize};

/// What the produced vector will be used for.
///
/// Gemini tunes embeddings differently for stored passages and for search
/// queries; providers without the notion ignore it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EmbeddingTask {
    RetrievalDocument,
    RetrievalQuery,
}

/// Request to embed one or more texts with a single model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingRequest {
    model: String,
    texts: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    task: Option<EmbeddingTask>,
}

impl EmbeddingRequest {
    pub fn new(model: impl Into<String>, texts: Vec<String>) -> Self {
        Self {
            model: model.into(),
            texts,
            task: None,
        }
    }

    /// Create a request for a single text
    pub fn single(model: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(model, vec![text.into()])
    }

    pub fn with_task(mut self, task: EmbeddingTask) -> Self {
        self.task = Some(task);
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn inputs(&self) -> Vec<&str> {
        self.texts.iter().map(String::as_str).collect()
    }

    pub fn task(&self) -> Option<EmbeddingTask> {
        self.task
    }

    pub fn len(&self) -> usize {
        self.texts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.texts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_request() {
        let request = EmbeddingRequest::single("models/text-embedding-004", "hello");

        assert_eq!(request.model(), "models/text-embedding-004");
        assert_eq!(request.inputs(), vec!["hello"]);
        assert_eq!(request.len(), 1);
        assert!(request.task().is_none());
    }

    #[test]
    fn test_request_with_task() {
        let request = EmbeddingRequest::single("m", "where is the chapter on tides?")
            .with_task(EmbeddingTask::RetrievalQuery);

        assert_eq!(request.task(), Some(EmbeddingTask::RetrievalQuery));
    }

    #[test]
    fn test_task_serialization() {
        let json = serde_json::to_string(&EmbeddingTask::RetrievalDocument).unwrap();
        assert_eq!(json, "\"RETRIEVAL_DOCUMENT\"");
    }

    #[test]
    fn test_empty_request() {
        let request = EmbeddingRequest::new("m", vec![]);
        assert!(request.is_empty());
    }
}
