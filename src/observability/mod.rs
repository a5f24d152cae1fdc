//! Observability
//!
//! Structured JSON logging of lifecycle and validation events.
//!
//! # Principles
//!
//! 1. Observability is read-only and never changes an outcome
//! 2. The validation pipeline itself does not log; callers log results
//! 3. Deterministic output
//!
//! # Usage
//!
//! ```ignore
//! use intake::observability::{log_event_with_fields, Event, Logger};
//!
//! Logger::info("VALIDATION_PASSED", &[("schema_id", "contact")]);
//! log_event_with_fields(Event::SchemasLoaded, &[("count", "3")]);
//! ```

mod events;
mod logger;

pub use events::Event;
pub use logger::{Logger, Severity};

/// Log a lifecycle event
pub fn log_event(event: Event) {
    log_event_with_fields(event, &[]);
}

/// Log a lifecycle event with fields
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    let severity = if event.is_fatal() {
        Severity::Fatal
    } else {
        Severity::Info
    };
    Logger::log(severity, event.as_str(), fields);
}
