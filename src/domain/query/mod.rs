//! Query pipeline types and prompt assembly

use serde::{Deserialize, Serialize};

use crate::domain::vector_store::QueryMatch;
use crate::domain::DomainError;

/// Context block used when retrieval returns nothing
pub const NO_CONTEXT_PLACEHOLDER: &str = "No relevant context found.";

/// System instruction sent with every generation request
pub const SYSTEM_INSTRUCTION: &str = "You are a reading assistant that explains words, phrases and \
passages from a book the user is studying. Base your answers on the supplied book context and \
the earlier conversation.";

/// Configuration for the query pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
    /// Number of records retrieved per query
    pub top_k: usize,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self { top_k: 5 }
    }
}

impl QueryConfig {
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.top_k == 0 {
            return Err(DomainError::validation("top_k must be greater than 0"));
        }

        Ok(())
    }
}

/// Answer returned for one query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryAnswer {
    pub query: String,
    pub response: String,
}

/// Join retrieved chunk texts with a blank line, in retrieval order
pub fn build_context(matches: &[QueryMatch]) -> String {
    if matches.is_empty() {
        return NO_CONTEXT_PLACEHOLDER.to_string();
    }

    matches
        .iter()
        .map(|m| m.document.as_str())
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Fill the answer template with the query and its context block
pub fn build_prompt(query: &str, context: &str) -> String {
    format!(
        "Question: {query}\n\
         \n\
         Context from the book:\n\
         {context}\n\
         \n\
         Answer using this structure:\n\
         1. Meaning: a brief explanation in plain language.\n\
         2. Examples: up to two example usages taken from the context above.\n\
         3. Excerpts: quote the relevant passages exactly, in their original language.\n\
         \n\
         If the context does not contain the answer, say so."
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::vector_store::RecordMetadata;

    fn query_match(id: &str, document: &str, score: f32) -> QueryMatch {
        QueryMatch {
            id: id.into(),
            document: document.into(),
            metadata: RecordMetadata::new("book.pdf", 0),
            score,
        }
    }

    #[test]
    fn test_context_joins_with_blank_line() {
        let matches = vec![
            query_match("chunk_1", "first passage", 0.9),
            query_match("chunk_0", "second passage", 0.4),
        ];

        assert_eq!(build_context(&matches), "first passage\n\nsecond passage");
    }

    #[test]
    fn test_empty_context_uses_placeholder() {
        assert_eq!(build_context(&[]), NO_CONTEXT_PLACEHOLDER);
    }

    #[test]
    fn test_top_k_must_be_positive() {
        assert!(QueryConfig::default().validate().is_ok());
        assert!(QueryConfig { top_k: 0 }.validate().is_err());
    }

    #[test]
    fn test_prompt_embeds_query_and_context() {
        let prompt = build_prompt("disheartened", "He was disheartened by the news.");

        assert!(prompt.starts_with("Question: disheartened\n"));
        assert!(prompt.contains("Context from the book:\nHe was disheartened by the news."));
        assert!(prompt.contains("up to two example usages"));
        assert!(prompt.contains("original language"));
    }
}
