//! Document ingestion domain types and traits
//!
//! - `DocumentParser` extracts page texts from uploaded documents
//! - `ChunkingStrategy` splits extracted text into overlapping chunks
//! - Configuration and per-file result types for the ingestion pipeline

pub mod chunker;
pub mod parser;
pub mod pipeline;
pub mod validation;

pub use chunker::{Chunk, ChunkingConfig, ChunkingStrategy};
pub use parser::{DocumentMetadata, DocumentParser, ParsedDocument};
pub use pipeline::{ChunkIdScheme, FileOutcome, FileStatus, IngestionConfig, IngestionResult};
pub use validation::{is_pdf_filename, sanitize_filename};

#[cfg(test)]
pub use parser::MockDocumentParser;
