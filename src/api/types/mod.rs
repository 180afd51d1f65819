//! Request and response types of the HTTP API

pub mod chat;
pub mod error;
pub mod json;
pub mod upload;

pub use chat::ChatRequest;
pub use error::{ApiError, ApiErrorResponse};
pub use json::Json;
pub use upload::{DeleteSourceResponse, SourcesResponse, UploadResponse};
