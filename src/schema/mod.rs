//! Declarative schemas
//!
//! A schema maps field names to constraint sets. Schemas are built once,
//! checked for structural consistency, and then shared immutably.
//!
//! # Design Principles
//!
//! - Schema as data: every declarative part round-trips through JSON
//! - Field order is significant
//! - Structure problems fail at build time, never during validation
//! - Parameterized schemas are plain factory functions

mod errors;
pub mod predicates;
mod registry;
mod types;

pub use errors::{SchemaError, SchemaResult};
pub use predicates::Predicate;
pub use registry::SchemaRegistry;
pub use types::{
    Constraint, ConstraintSpec, FieldMessages, FieldSpec, FieldType, PatternRegex, Schema,
    SchemaBuilder, Transform,
};
