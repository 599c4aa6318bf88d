//! Admin API error types.
//!
//! Maps internal errors to HTTP responses. Every error except
//! [`AdminError::Forbidden`] serializes a JSON [`ErrorResponse`] body;
//! forbidden responses are a bare 403 with an empty body.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use gcn_broker::BrokerError;
use gcn_model::{CircularValidationError, ParseAclFieldError};
use gcn_storage::StorageError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur in the Admin API.
#[derive(Debug, Error)]
pub enum AdminError {
    /// Resource not found.
    #[error("{entity_type} not found: {id}")]
    NotFound {
        /// Type of entity (e.g., "AclEntry", "Circular").
        entity_type: &'static str,
        /// Resource identifier.
        id: String,
    },

    /// Invalid request data.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Validation error.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Authentication required.
    #[error("Authentication required")]
    Unauthorized,

    /// Insufficient permissions. Rendered as 403 with an empty body.
    #[error("Access denied")]
    Forbidden,

    /// Storage layer error.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Broker layer error.
    #[error("Broker error: {0}")]
    Broker(#[from] BrokerError),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AdminError {
    /// Creates a not found error.
    #[must_use]
    pub fn not_found(entity_type: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity_type,
            id: id.to_string(),
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::BadRequest(_) | Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::Storage(err) => match err {
                StorageError::NotFound { .. } => StatusCode::NOT_FOUND,
                StorageError::Duplicate { .. } => StatusCode::CONFLICT,
                // InvalidData means a corrupt stored value, not client input.
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Broker(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "not_found",
            Self::BadRequest(_) => "bad_request",
            Self::Validation(_) => "validation_error",
            Self::Unauthorized => "unauthorized",
            Self::Forbidden => "forbidden",
            Self::Storage(_) => "storage_error",
            Self::Broker(_) => "broker_error",
            Self::Internal(_) => "internal_error",
        }
    }
}

impl From<CircularValidationError> for AdminError {
    fn from(err: CircularValidationError) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<ParseAclFieldError> for AdminError {
    fn from(err: ParseAclFieldError) -> Self {
        Self::BadRequest(err.to_string())
    }
}

/// API error response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling.
    pub error: String,
    /// Human-readable error message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_description: Option<String>,
}

impl IntoResponse for AdminError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if matches!(self, Self::Forbidden) {
            return status.into_response();
        }
        let body = ErrorResponse {
            error: self.error_code().to_string(),
            error_description: Some(self.to_string()),
        };
        (status, Json(body)).into_response()
    }
}

/// Result type for Admin API operations.
pub type AdminResult<T> = Result<T, AdminError>;

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn not_found_error() {
        let err = AdminError::not_found("Circular", 42_u64);
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(err.error_code(), "not_found");
        assert!(err.to_string().contains("Circular"));
        assert!(err.to_string().contains("42"));
    }

    #[tokio::test]
    async fn forbidden_is_bodyless() {
        let response = AdminError::Forbidden.into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        let body = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
        assert!(body.is_empty());
    }

    #[test]
    fn storage_error_mapping() {
        let err = AdminError::from(StorageError::not_found("AclEntry", Uuid::nil()));
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);

        let err = AdminError::from(StorageError::Query("connection reset".to_string()));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);

        let err = AdminError::from(StorageError::duplicate("row", "unique constraint", "pk"));
        assert_eq!(err.status_code(), StatusCode::CONFLICT);

        // A stored value that fails to parse is a server fault.
        let err = AdminError::from(StorageError::InvalidData("bad enum".to_string()));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn broker_error_is_internal() {
        let err = AdminError::from(BrokerError::Admin("rejected".to_string()));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.error_code(), "broker_error");
    }

    #[test]
    fn validation_error_conversion() {
        let err = AdminError::from(CircularValidationError::EmptySubject);
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.error_code(), "validation_error");
    }
}
