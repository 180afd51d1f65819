//! Document store backends: a local SQLite file or a remote Chroma server

mod chroma;
mod factory;
mod sqlite;

pub use chroma::ChromaDocumentStore;
pub use factory::{DocumentStoreFactory, StoreSettings};
pub use sqlite::{SqliteDocumentStore, DATABASE_FILE};
