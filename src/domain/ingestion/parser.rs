//! Document parser trait and types

use serde::{Deserialize, Serialize};

#[cfg(test)]
use mockall::automock;

use crate::domain::DomainError;

/// Metadata read from a document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    pub page_count: usize,
}

impl DocumentMetadata {
    pub fn new(page_count: usize) -> Self {
        Self {
            page_count,
            ..Self::default()
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }
}

/// Text extracted from a document, one entry per page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedDocument {
    pub pages: Vec<String>,
    pub metadata: DocumentMetadata,
}

impl ParsedDocument {
    pub fn new(pages: Vec<String>, metadata: DocumentMetadata) -> Self {
        Self { pages, metadata }
    }

    pub fn from_pages(pages: Vec<String>) -> Self {
        let metadata = DocumentMetadata::new(pages.len());
        Self::new(pages, metadata)
    }

    /// Page texts joined with a newline between pages
    pub fn text(&self) -> String {
        self.pages.join("\n")
    }
}

/// Trait for document parsers.
///
/// Parsing is CPU-bound and synchronous; async callers run it on the
/// blocking pool.
#[cfg_attr(test, automock)]
pub trait DocumentParser: Send + Sync {
    /// Extract page texts from raw document bytes
    fn parse(&self, bytes: &[u8], filename: &str) -> Result<ParsedDocument, DomainError>;

    /// Get the parser name
    fn name(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_joins_pages_with_newline() {
        let doc = ParsedDocument::from_pages(vec!["first".into(), "".into(), "third".into()]);

        assert_eq!(doc.text(), "first\n\nthird");
        assert_eq!(doc.metadata.page_count, 3);
    }

    #[test]
    fn test_metadata_builder() {
        let meta = DocumentMetadata::new(2)
            .with_title("Great Expectations")
            .with_author("Charles Dickens");

        assert_eq!(meta.title.as_deref(), Some("Great Expectations"));
        assert_eq!(meta.author.as_deref(), Some("Charles Dickens"));
    }

    #[test]
    fn test_mock_parser() {
        let mut parser = MockDocumentParser::new();
        parser
            .expect_parse()
            .returning(|_, _| Ok(ParsedDocument::from_pages(vec!["page one".into()])));

        let doc = parser.parse(b"%PDF", "book.pdf").unwrap();
        assert_eq!(doc.text(), "page one");
    }
}
