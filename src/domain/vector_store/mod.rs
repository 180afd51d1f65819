//! Vector document store domain types and traits

mod provider;
mod record;

pub use provider::DocumentStore;
pub use record::{IndexedRecord, QueryMatch, RecordMetadata, SourceSummary};

#[cfg(test)]
pub use provider::mock::MockDocumentStore;
