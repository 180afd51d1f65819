//! Infrastructure services

mod ingestion_service;
mod query_service;

pub use ingestion_service::{IngestionService, IngestionServiceTrait, UploadedFile, NOT_A_PDF};
pub use query_service::{QueryService, QueryServiceTrait};

#[cfg(test)]
pub use ingestion_service::mock::MockIngestionService;
#[cfg(test)]
pub use query_service::mock::MockQueryService;
