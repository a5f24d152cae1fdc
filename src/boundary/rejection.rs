//! Client-facing rejection body
//!
//! Built from the issue list of a failed validation. Only `message`,
//! `field` and (optionally) the issues themselves leave the process.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::pipeline::Issue;

/// Fixed error category of every rejection
pub const VALIDATION_FAILED: &str = "validation failed";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationRejection {
    pub error: &'static str,
    /// Message of the first issue
    pub message: String,
    /// Head of the first issue's path; `None` for root-level issues
    pub field: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issues: Option<Vec<Issue>>,
}

impl ValidationRejection {
    /// Builds a rejection from issues in declaration order.
    ///
    /// `expose_all` attaches the complete list next to the first issue.
    pub fn from_issues(issues: &[Issue], expose_all: bool) -> Self {
        let (message, field) = match issues.first() {
            Some(first) => (first.message.clone(), first.field()),
            None => ("Invalid input".to_string(), None),
        };

        Self {
            error: VALIDATION_FAILED,
            message,
            field,
            issues: expose_all.then(|| issues.to_vec()),
        }
    }

    pub fn issue_count(&self) -> Option<usize> {
        self.issues.as_ref().map(Vec::len)
    }
}

impl IntoResponse for ValidationRejection {
    fn into_response(self) -> Response {
        (StatusCode::BAD_REQUEST, Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::{IssueCode, PathSegment};

    fn issues() -> Vec<Issue> {
        vec![
            Issue::new(
                vec![PathSegment::Field("email".into())],
                IssueCode::PatternMismatch,
                "Invalid email",
            ),
            Issue::new(
                vec![PathSegment::Field("name".into())],
                IssueCode::LengthOrRangeViolation,
                "String must contain at least 2 character(s)",
            ),
        ]
    }

    #[test]
    fn test_first_issue_drives_message_and_field() {
        let rejection = ValidationRejection::from_issues(&issues(), false);
        assert_eq!(rejection.error, "validation failed");
        assert_eq!(rejection.message, "Invalid email");
        assert_eq!(rejection.field.as_deref(), Some("email"));
        assert!(rejection.issues.is_none());
    }

    #[test]
    fn test_expose_all_keeps_order() {
        let rejection = ValidationRejection::from_issues(&issues(), true);
        assert_eq!(rejection.issue_count(), Some(2));

        let body = serde_json::to_value(&rejection).unwrap();
        assert_eq!(body["issues"][0]["code"], "pattern-mismatch");
        assert_eq!(body["issues"][1]["path"][0], "name");
    }

    #[test]
    fn test_hidden_issues_are_not_serialized() {
        let rejection = ValidationRejection::from_issues(&issues(), false);
        let body = serde_json::to_value(&rejection).unwrap();
        assert!(body.get("issues").is_none());
    }

    #[test]
    fn test_root_issue_has_no_field() {
        let root = vec![Issue::new(
            Vec::new(),
            IssueCode::TypeMismatch,
            "Expected object, received array",
        )];
        let rejection = ValidationRejection::from_issues(&root, true);
        assert_eq!(rejection.field, None);
        let body = serde_json::to_value(&rejection).unwrap();
        assert!(body["field"].is_null());
    }

    #[test]
    fn test_status_is_bad_request() {
        let response = ValidationRejection::from_issues(&issues(), true).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
