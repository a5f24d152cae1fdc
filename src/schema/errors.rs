//! Schema error types
//!
//! These are contract errors: a schema that cannot be built or loaded. They
//! never describe a payload; payload problems are reported as issues inside a
//! validation result.
//!
//! Error codes:
//! - INTAKE_SCHEMA_INVALID
//! - INTAKE_SCHEMA_IMMUTABLE
//! - INTAKE_SCHEMA_MALFORMED

use thiserror::Error;

/// Result type for schema operations
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Schema construction and loading errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// Schema structure is inconsistent
    #[error("Invalid schema '{schema_id}': {reason}")]
    Invalid { schema_id: String, reason: String },

    /// Attempt to register an (id, version) pair twice
    #[error("Schema '{schema_id}' version '{schema_version}' is already registered")]
    Immutable {
        schema_id: String,
        schema_version: String,
    },

    /// Schema file could not be read or parsed
    #[error("Malformed schema file '{path}': {reason}")]
    Malformed { path: String, reason: String },
}

impl SchemaError {
    pub fn invalid(schema_id: impl Into<String>, reason: impl Into<String>) -> Self {
        SchemaError::Invalid {
            schema_id: schema_id.into(),
            reason: reason.into(),
        }
    }

    pub fn immutable(schema_id: impl Into<String>, schema_version: impl Into<String>) -> Self {
        SchemaError::Immutable {
            schema_id: schema_id.into(),
            schema_version: schema_version.into(),
        }
    }

    pub fn malformed(path: impl Into<String>, reason: impl Into<String>) -> Self {
        SchemaError::Malformed {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            SchemaError::Invalid { .. } => "INTAKE_SCHEMA_INVALID",
            SchemaError::Immutable { .. } => "INTAKE_SCHEMA_IMMUTABLE",
            SchemaError::Malformed { .. } => "INTAKE_SCHEMA_MALFORMED",
        }
    }
}
