use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// Reason why the generation finished
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    Stop,
    Length,
    ContentFilter,
    Other(String),
}

/// Token usage statistics
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

impl Usage {
    pub fn new(prompt_tokens: u32, completion_tokens: u32) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens: prompt_tokens + completion_tokens,
        }
    }
}

/// Text recovered from a provider response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResponseText {
    /// The response carried a single text part
    Direct { text: String },
    /// The text was joined from several parts
    Assembled { text: String },
    /// No text could be recovered
    Missing { reason: String },
}

impl ResponseText {
    /// Classify a list of text fragments taken from a response.
    ///
    /// Empty fragments are ignored. `reason` is used when nothing remains.
    pub fn from_parts<I, S>(parts: I, reason: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut parts: Vec<String> = parts
            .into_iter()
            .map(Into::into)
            .filter(|p| !p.is_empty())
            .collect();

        match parts.len() {
            0 => Self::Missing {
                reason: reason.into(),
            },
            1 => Self::Direct {
                text: parts.remove(0),
            },
            _ => Self::Assembled {
                text: parts.concat(),
            },
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Direct { text } | Self::Assembled { text } => Some(text),
            Self::Missing { .. } => None,
        }
    }

    /// Turn a missing text into a provider error
    pub fn into_text(self, provider: &str) -> Result<String, DomainError> {
        match self {
            Self::Direct { text } | Self::Assembled { text } => Ok(text),
            Self::Missing { reason } => Err(DomainError::provider(
                provider,
                format!("Response contained no text: {}", reason),
            )),
        }
    }
}

/// Response from an LLM provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmResponse {
    pub id: String,
    pub model: String,
    pub text: ResponseText,
    pub finish_reason: Option<FinishReason>,
    pub usage: Option<Usage>,
}

impl LlmResponse {
    pub fn new(id: String, model: String, text: ResponseText) -> Self {
        Self {
            id,
            model,
            text,
            finish_reason: None,
            usage: None,
        }
    }

    /// Response with a single text part
    pub fn text(id: impl Into<String>, model: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(id.into(), model.into(), ResponseText::Direct { text: text.into() })
    }

    pub fn with_finish_reason(mut self, reason: FinishReason) -> Self {
        self.finish_reason = Some(reason);
        self
    }

    pub fn with_usage(mut self, usage: Usage) -> Self {
        self.usage = Some(usage);
        self
    }

    pub fn content(&self) -> Option<&str> {
        self.text.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_usage_calculation() {
        let usage = Usage::new(10, 20);
        assert_eq!(usage.total_tokens, 30);
    }

    #[test]
    fn test_single_part_is_direct() {
        let text = ResponseText::from_parts(vec!["X"], "unused");
        assert_eq!(text, ResponseText::Direct { text: "X".into() });
    }

    #[test]
    fn test_multiple_parts_are_assembled() {
        let text = ResponseText::from_parts(vec!["Meaning: ", "", "sad."], "unused");
        assert_eq!(
            text,
            ResponseText::Assembled {
                text: "Meaning: sad.".into()
            }
        );
    }

    #[test]
    fn test_no_parts_is_missing() {
        let text = ResponseText::from_parts(Vec::<String>::new(), "finish reason SAFETY");

        assert_eq!(text.as_str(), None);
        let err = text.into_text("gemini").unwrap_err();
        assert!(matches!(err, DomainError::Provider { .. }));
        assert!(err.to_string().contains("SAFETY"));
    }

    #[test]
    fn test_response_content() {
        let response = LlmResponse::text("id-123", "gemini-2.0-flash", "Hello!");
        assert_eq!(response.content(), Some("Hello!"));
    }
}
