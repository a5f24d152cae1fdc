//! # HTTP Server Module
//!
//! Axum server exposing the schema registry and validation boundary.
//!
//! # Endpoints
//!
//! - `/health` - Health check
//! - `/schemas` - Registered schemas
//! - `/validate/:id/:version` - Validate a payload (JSON, form, query)

pub mod config;
pub mod observability_routes;
pub mod schema_routes;
pub mod server;
pub mod validation_routes;

pub use config::HttpServerConfig;
pub use server::HttpServer;
