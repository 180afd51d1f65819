//! Query infrastructure: retrieval-augmented answering over the document store

pub mod pipeline;

pub use pipeline::QueryPipeline;
