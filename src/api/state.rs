//! Application state for shared services

use std::sync::Arc;

use crate::infrastructure::services::{IngestionServiceTrait, QueryServiceTrait};

/// Application state containing shared services using dynamic dispatch
#[derive(Clone, Debug)]
pub struct AppState {
    pub ingestion_service: Arc<dyn IngestionServiceTrait>,
    pub query_service: Arc<dyn QueryServiceTrait>,
}

impl AppState {
    pub fn new(
        ingestion_service: Arc<dyn IngestionServiceTrait>,
        query_service: Arc<dyn QueryServiceTrait>,
    ) -> Self {
        Self {
            ingestion_service,
            query_service,
        }
    }
}
