//! Infrastructure layer - External service implementations

pub mod conversation;
pub mod embedding;
pub mod ingestion;
pub mod llm;
pub mod logging;
pub mod query;
pub mod services;
pub mod vector_store;
