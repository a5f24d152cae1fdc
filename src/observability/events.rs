//! Observable events
//!
//! Every log line names one of these events. Names are stable so log
//! consumers can match on them.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Lifecycle
    BootStart,
    ConfigLoaded,
    /// Schema directory loaded into the registry
    SchemasLoaded,
    /// Schema directory could not be loaded (FATAL)
    SchemaLoadFailed,
    ServerStart,
    ServerStop,

    // Validation
    /// Payload accepted
    ValidationPassed,
    /// Payload rejected with one or more issues
    ValidationRejected,
    /// Request named a schema the registry does not hold
    UnknownSchema,
    /// Request body could not be decoded at all
    MalformedPayload,

    // CLI
    CheckComplete,
}

impl Event {
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::BootStart => "INTAKE_STARTUP_BEGIN",
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::SchemasLoaded => "SCHEMAS_LOADED",
            Event::SchemaLoadFailed => "SCHEMA_LOAD_FAILED",
            Event::ServerStart => "SERVER_START",
            Event::ServerStop => "SERVER_STOP",
            Event::ValidationPassed => "VALIDATION_PASSED",
            Event::ValidationRejected => "VALIDATION_REJECTED",
            Event::UnknownSchema => "UNKNOWN_SCHEMA",
            Event::MalformedPayload => "MALFORMED_PAYLOAD",
            Event::CheckComplete => "CHECK_COMPLETE",
        }
    }

    pub fn is_fatal(&self) -> bool {
        matches!(self, Event::SchemaLoadFailed)
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
