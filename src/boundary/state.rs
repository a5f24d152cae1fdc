//! Shared boundary state
//!
//! Holds the schema registry and the rejection policy. Cloned into every
//! request; the registry itself is shared and read-only.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;
use uuid::Uuid;

use super::errors::{BoundaryError, BoundaryResult};
use super::rejection::ValidationRejection;
use crate::observability::{Event, Logger};
use crate::pipeline::{validate_async, Issue, ValidationPipeline, ValidationResult};
use crate::schema::{Schema, SchemaRegistry};
use crate::value::TypedRecord;

/// Version selector resolving to the greatest registered version
pub const LATEST: &str = "latest";

#[derive(Debug, Clone)]
pub struct Boundary {
    registry: Arc<SchemaRegistry>,
    expose_all_issues: bool,
}

impl Boundary {
    pub fn new(registry: Arc<SchemaRegistry>) -> Self {
        Self {
            registry,
            expose_all_issues: true,
        }
    }

    /// Whether rejections carry the full issue list
    pub fn expose_all_issues(mut self, expose: bool) -> Self {
        self.expose_all_issues = expose;
        self
    }

    pub fn exposes_all_issues(&self) -> bool {
        self.expose_all_issues
    }

    pub fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    /// Resolves a schema; `latest` selects the greatest registered version.
    pub fn schema(&self, schema_id: &str, schema_version: &str) -> BoundaryResult<Arc<Schema>> {
        let found = if schema_version == LATEST {
            self.registry.latest(schema_id)
        } else {
            self.registry.get(schema_id, schema_version)
        };

        found.ok_or_else(|| {
            Logger::warn(
                Event::UnknownSchema.as_str(),
                &[("schema_id", schema_id), ("schema_version", schema_version)],
            );
            BoundaryError::unknown_schema(schema_id, schema_version)
        })
    }

    /// Validates a payload against a registered schema.
    pub async fn validate(
        &self,
        schema_id: &str,
        schema_version: &str,
        payload: &Value,
    ) -> BoundaryResult<TypedRecord> {
        let schema = self.schema(schema_id, schema_version)?;
        self.validate_with(&schema, payload).await
    }

    /// Validates a payload against an already resolved schema.
    pub async fn validate_with(
        &self,
        schema: &Schema,
        payload: &Value,
    ) -> BoundaryResult<TypedRecord> {
        match validate_async(schema, payload).await {
            ValidationResult::Success { value } => {
                log_passed(schema);
                Ok(value)
            }
            ValidationResult::Failure { issues } => {
                log_rejected(schema, &issues);
                Err(self.reject(&issues))
            }
        }
    }

    /// Validates a payload and deserializes the typed record into `T`.
    pub async fn parse<T: DeserializeOwned>(
        &self,
        schema_id: &str,
        schema_version: &str,
        payload: &Value,
    ) -> BoundaryResult<T> {
        let schema = self.schema(schema_id, schema_version)?;
        let pipeline = ValidationPipeline::from(Arc::clone(&schema));
        match pipeline.parse_async::<T>(payload).await {
            Ok(dto) => {
                log_passed(&schema);
                Ok(dto)
            }
            Err(failure) => {
                log_rejected(&schema, &failure.issues);
                Err(self.reject(&failure.issues))
            }
        }
    }

    /// Translates issues into a client-facing rejection.
    pub fn reject(&self, issues: &[Issue]) -> BoundaryError {
        BoundaryError::Rejected(ValidationRejection::from_issues(
            issues,
            self.expose_all_issues,
        ))
    }
}

fn log_passed(schema: &Schema) {
    let request_id = Uuid::new_v4().to_string();
    Logger::info(
        Event::ValidationPassed.as_str(),
        &[
            ("request_id", request_id.as_str()),
            ("schema_id", schema.schema_id.as_str()),
            ("schema_version", schema.schema_version.as_str()),
        ],
    );
}

fn log_rejected(schema: &Schema, issues: &[Issue]) {
    let request_id = Uuid::new_v4().to_string();
    let issue_count = issues.len().to_string();
    let (first_code, field) = issues
        .first()
        .map(|issue| (issue.code.as_str(), issue.dotted_path()))
        .unwrap_or(("", String::new()));

    Logger::info(
        Event::ValidationRejected.as_str(),
        &[
            ("request_id", request_id.as_str()),
            ("schema_id", schema.schema_id.as_str()),
            ("schema_version", schema.schema_version.as_str()),
            ("issue_count", issue_count.as_str()),
            ("first_code", first_code),
            ("field", field.as_str()),
        ],
    );
}
