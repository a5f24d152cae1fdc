//! intake - schema-driven validation of untrusted payloads
//!
//! A payload either becomes a typed record satisfying every constraint of a
//! declared schema, or is rejected with an ordered list of issues.

pub mod boundary;
pub mod cli;
pub mod http_server;
pub mod observability;
pub mod pipeline;
pub mod schema;
pub mod value;
