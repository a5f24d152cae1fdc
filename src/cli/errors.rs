//! CLI-specific error types
//!
//! Every CLI error ends the process with a non-zero exit code.

use std::fmt;
use std::io;

use crate::schema::SchemaError;

/// CLI error codes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliErrorCode {
    /// Configuration file error
    ConfigError,
    /// I/O error (files, stdin/stdout)
    IoError,
    /// Configuration already present
    AlreadyInitialized,
    /// Schema file or registry error
    SchemaError,
    /// Requested schema is not registered
    UnknownSchema,
    /// Payload was rejected
    ValidationFailed,
    /// HTTP server could not start or stopped with an error
    ServerFailed,
}

impl CliErrorCode {
    /// Get the error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConfigError => "INTAKE_CLI_CONFIG_ERROR",
            Self::IoError => "INTAKE_CLI_IO_ERROR",
            Self::AlreadyInitialized => "INTAKE_CLI_ALREADY_INITIALIZED",
            Self::SchemaError => "INTAKE_CLI_SCHEMA_ERROR",
            Self::UnknownSchema => "INTAKE_CLI_UNKNOWN_SCHEMA",
            Self::ValidationFailed => "INTAKE_CLI_VALIDATION_FAILED",
            Self::ServerFailed => "INTAKE_CLI_SERVER_FAILED",
        }
    }
}

/// CLI error
#[derive(Debug)]
pub struct CliError {
    code: CliErrorCode,
    message: String,
}

impl CliError {
    /// Create a new CLI error
    pub fn new(code: CliErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::ConfigError, msg)
    }

    pub fn io_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::IoError, msg)
    }

    pub fn already_initialized(path: impl fmt::Display) -> Self {
        Self::new(
            CliErrorCode::AlreadyInitialized,
            format!("Schema directory {} already holds schemas", path),
        )
    }

    pub fn unknown_schema(schema_id: &str, schema_version: Option<&str>) -> Self {
        let target = match schema_version {
            Some(version) => format!("{}@{}", schema_id, version),
            None => schema_id.to_string(),
        };
        Self::new(
            CliErrorCode::UnknownSchema,
            format!("Unknown schema: {}", target),
        )
    }

    /// Payload rejected with `issue_count` issues
    pub fn validation_failed(issue_count: usize) -> Self {
        Self::new(
            CliErrorCode::ValidationFailed,
            format!("Payload rejected with {} issue(s)", issue_count),
        )
    }

    pub fn server_failed(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::ServerFailed, msg)
    }

    /// Get the error code
    pub fn code(&self) -> &CliErrorCode {
        &self.code
    }

    /// Get the error code string
    pub fn code_str(&self) -> &'static str {
        self.code.code()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for CliError {}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        Self::io_error(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::io_error(format!("JSON error: {}", e))
    }
}

impl From<SchemaError> for CliError {
    fn from(e: SchemaError) -> Self {
        Self::new(CliErrorCode::SchemaError, format!("{}: {}", e.code(), e))
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_carries_code() {
        let err = CliError::validation_failed(2);
        assert_eq!(
            err.to_string(),
            "INTAKE_CLI_VALIDATION_FAILED: Payload rejected with 2 issue(s)"
        );
    }

    #[test]
    fn test_schema_error_conversion() {
        let err = CliError::from(SchemaError::malformed("a.json", "EOF"));
        assert_eq!(err.code(), &CliErrorCode::SchemaError);
        assert!(err.message().contains("INTAKE_SCHEMA_MALFORMED"));
    }

    #[test]
    fn test_unknown_schema_message() {
        assert_eq!(
            CliError::unknown_schema("contact", Some("3")).message(),
            "Unknown schema: contact@3"
        );
        assert_eq!(
            CliError::unknown_schema("contact", None).message(),
            "Unknown schema: contact"
        );
    }
}
