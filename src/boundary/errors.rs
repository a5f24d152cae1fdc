//! Boundary errors
//!
//! Everything that can stop a request before it reaches a handler.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use super::rejection::ValidationRejection;

pub type BoundaryResult<T> = Result<T, BoundaryError>;

#[derive(Debug, Clone, Error)]
pub enum BoundaryError {
    /// Payload failed validation
    #[error("validation failed: {}", .0.message)]
    Rejected(ValidationRejection),

    #[error("Unknown schema: {schema_id}@{schema_version}")]
    UnknownSchema {
        schema_id: String,
        schema_version: String,
    },

    /// Body could not be decoded into a payload at all
    #[error("Malformed payload: {0}")]
    MalformedPayload(String),
}

impl BoundaryError {
    pub fn unknown_schema(schema_id: impl Into<String>, schema_version: impl Into<String>) -> Self {
        BoundaryError::UnknownSchema {
            schema_id: schema_id.into(),
            schema_version: schema_version.into(),
        }
    }

    pub fn malformed(reason: impl Into<String>) -> Self {
        BoundaryError::MalformedPayload(reason.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            BoundaryError::Rejected(_) => StatusCode::BAD_REQUEST,
            BoundaryError::UnknownSchema { .. } => StatusCode::NOT_FOUND,
            BoundaryError::MalformedPayload(_) => StatusCode::BAD_REQUEST,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            BoundaryError::Rejected(_) => "INTAKE_VALIDATION_FAILED",
            BoundaryError::UnknownSchema { .. } => "INTAKE_UNKNOWN_SCHEMA",
            BoundaryError::MalformedPayload(_) => "INTAKE_MALFORMED_PAYLOAD",
        }
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: &'static str,
}

impl IntoResponse for BoundaryError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match self {
            BoundaryError::Rejected(rejection) => rejection.into_response(),
            other => {
                let body = ErrorResponse {
                    error: other.to_string(),
                    code: other.code(),
                };
                (status, Json(body)).into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            BoundaryError::unknown_schema("contact", "1").status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            BoundaryError::malformed("EOF").status_code(),
            StatusCode::BAD_REQUEST
        );
        let rejected = BoundaryError::Rejected(ValidationRejection::from_issues(&[], false));
        assert_eq!(rejected.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_codes() {
        assert_eq!(
            BoundaryError::unknown_schema("a", "1").code(),
            "INTAKE_UNKNOWN_SCHEMA"
        );
        assert_eq!(BoundaryError::malformed("x").code(), "INTAKE_MALFORMED_PAYLOAD");
    }

    #[test]
    fn test_display_names_schema() {
        let err = BoundaryError::unknown_schema("contact", "2");
        assert_eq!(err.to_string(), "Unknown schema: contact@2");
    }

    #[test]
    fn test_into_response_status() {
        let response = BoundaryError::unknown_schema("contact", "1").into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
