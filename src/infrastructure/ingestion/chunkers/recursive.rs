//! Recursive character chunking strategy

use crate::domain::ingestion::{Chunk, ChunkingConfig, ChunkingStrategy};
use crate::domain::DomainError;

/// Separators tried in order: paragraph, line, word, then single characters
const DEFAULT_SEPARATORS: &[&str] = &["\n\n", "\n", " ", ""];

/// Chunking strategy that splits on the coarsest separator present and
/// recurses into pieces that are still too long.
///
/// Pieces are merged back into chunks of at most `chunk_size` characters,
/// each new chunk starting with up to `chunk_overlap` characters of the
/// previous one. Separators stay attached to the start of the piece that
/// follows them, and chunks are trimmed of surrounding whitespace.
#[derive(Debug, Clone)]
pub struct RecursiveChunker {
    separators: Vec<String>,
}

impl Default for RecursiveChunker {
    fn default() -> Self {
        Self::new()
    }
}

impl RecursiveChunker {
    pub fn new() -> Self {
        Self::with_separators(DEFAULT_SEPARATORS)
    }

    pub fn with_separators(separators: &[&str]) -> Self {
        Self {
            separators: separators.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn char_len(text: &str) -> usize {
        text.chars().count()
    }

    /// Split on `separator`, keeping it at the start of each following piece
    fn split_keeping_separator(text: &str, separator: &str) -> Vec<String> {
        if separator.is_empty() {
            return text.chars().map(String::from).collect();
        }

        let mut pieces = text.split(separator);
        let mut splits: Vec<String> = pieces.next().map(str::to_string).into_iter().collect();
        splits.extend(pieces.map(|p| format!("{}{}", separator, p)));
        splits.retain(|s| !s.is_empty());
        splits
    }

    fn split_recursive(
        &self,
        text: &str,
        separators: &[String],
        config: &ChunkingConfig,
    ) -> Vec<String> {
        let (separator, remaining) = separators
            .iter()
            .enumerate()
            .find(|(_, s)| s.is_empty() || text.contains(s.as_str()))
            .map(|(i, s)| (s.as_str(), &separators[i + 1..]))
            .unwrap_or(("", &[]));

        let mut chunks = Vec::new();
        let mut fitting: Vec<String> = Vec::new();

        for piece in Self::split_keeping_separator(text, separator) {
            if Self::char_len(&piece) < config.chunk_size {
                fitting.push(piece);
                continue;
            }

            if !fitting.is_empty() {
                chunks.extend(Self::merge(&fitting, config));
                fitting.clear();
            }

            if remaining.is_empty() {
                chunks.push(piece);
            } else {
                chunks.extend(self.split_recursive(&piece, remaining, config));
            }
        }

        if !fitting.is_empty() {
            chunks.extend(Self::merge(&fitting, config));
        }

        chunks
    }

    /// Greedily pack pieces into windows, carrying an overlap tail forward
    fn merge(pieces: &[String], config: &ChunkingConfig) -> Vec<String> {
        let mut docs = Vec::new();
        let mut window: std::collections::VecDeque<&str> = std::collections::VecDeque::new();
        let mut total = 0usize;

        for piece in pieces {
            let len = Self::char_len(piece);

            if total + len > config.chunk_size && !window.is_empty() {
                if let Some(doc) = Self::join(&window) {
                    docs.push(doc);
                }

                while total > config.chunk_overlap
                    || (total + len > config.chunk_size && total > 0)
                {
                    match window.pop_front() {
                        Some(front) => total -= Self::char_len(front),
                        None => break,
                    }
                }
            }

            window.push_back(piece);
            total += len;
        }

        if let Some(doc) = Self::join(&window) {
            docs.push(doc);
        }

        docs
    }

    fn join(window: &std::collections::VecDeque<&str>) -> Option<String> {
        let joined: String = window.iter().copied().collect();
        let trimmed = joined.trim();

        (!trimmed.is_empty()).then(|| trimmed.to_string())
    }
}

impl ChunkingStrategy for RecursiveChunker {
    fn chunk(&self, content: &str, config: &ChunkingConfig) -> Result<Vec<Chunk>, DomainError> {
        config.validate()?;

        if content.trim().is_empty() {
            return Ok(vec![]);
        }

        let chunks = self
            .split_recursive(content, &self.separators, config)
            .into_iter()
            .filter_map(|text| {
                let trimmed = text.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            })
            .enumerate()
            .map(|(index, text)| Chunk::new(text, index))
            .collect();

        Ok(chunks)
    }

    fn name(&self) -> &'static str {
        "recursive"
    }
}
