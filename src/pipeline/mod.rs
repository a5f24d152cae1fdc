//! Validation pipeline
//!
//! Turns an untrusted payload into either a typed, schema-conformant record
//! or an ordered list of issues.
//!
//! # Guarantees
//!
//! - Exactly one of `Success` / `Failure` per call
//! - `Success` values satisfy every constraint of the schema
//! - `Failure` issues are non-empty and in field declaration order
//! - Unknown input fields never reach the output
//! - Same (schema, input) always yields the same result

pub mod coerce;
mod result;
mod validator;

pub use result::{Issue, IssueCode, PathSegment, ValidationFailure, ValidationResult};
pub use validator::{validate, validate_async, ValidationPipeline};

