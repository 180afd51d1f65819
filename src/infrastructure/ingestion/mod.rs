//! Document ingestion infrastructure: PDF parsing, chunking and the
//! ingestion pipeline

pub mod chunkers;
pub mod parsers;
pub mod pipeline;

pub use chunkers::RecursiveChunker;
pub use parsers::PdfParser;
pub use pipeline::IngestionPipeline;
