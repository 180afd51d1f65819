//! API error type and its JSON body

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use crate::domain::DomainError;

/// Error body returned by every endpoint: `{"error": "<message>"}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    pub error: String,
}

/// API error with status code
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub response: ApiErrorResponse,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            response: ApiErrorResponse {
                error: message.into(),
            },
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    /// Upstream provider failure
    pub fn bad_gateway(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_GATEWAY, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(StatusCode::SERVICE_UNAVAILABLE, message)
    }

    pub fn message(&self) -> &str {
        &self.response.error
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.response)).into_response()
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::NotFound { message } => Self::not_found(format!("Not found: {}", message)),
            DomainError::Validation { message } => Self::bad_request(message),
            DomainError::Provider { provider, message } => {
                warn!(provider = %provider, error = %message, "Provider request failed");
                Self::bad_gateway(format!("{}: {}", provider, message))
            }
            other => {
                error!(error = %other, "Request failed");
                Self::internal(other.to_string())
            }
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.status, self.response.error)
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_maps_to_400_with_plain_message() {
        let api_err: ApiError = DomainError::validation("query is required").into();

        assert_eq!(api_err.status, StatusCode::BAD_REQUEST);
        assert_eq!(
            serde_json::to_value(&api_err.response).unwrap(),
            serde_json::json!({"error": "query is required"})
        );
    }

    #[test]
    fn test_domain_error_statuses() {
        let cases = [
            (DomainError::not_found("Source 'a.pdf'"), StatusCode::NOT_FOUND),
            (DomainError::provider("gemini", "quota"), StatusCode::BAD_GATEWAY),
            (DomainError::storage("disk full"), StatusCode::INTERNAL_SERVER_ERROR),
            (DomainError::extraction("encrypted"), StatusCode::INTERNAL_SERVER_ERROR),
            (DomainError::configuration("bad"), StatusCode::INTERNAL_SERVER_ERROR),
            (DomainError::internal("boom"), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (domain_err, status) in cases {
            assert_eq!(ApiError::from(domain_err).status, status);
        }
    }

    #[test]
    fn test_provider_message_names_provider() {
        let api_err: ApiError = DomainError::provider("gemini", "quota exceeded").into();
        assert_eq!(api_err.message(), "gemini: quota exceeded");
    }
}
