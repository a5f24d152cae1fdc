//! Observability HTTP Routes
//!
//! Liveness endpoint.

use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use serde::Serialize;

use crate::boundary::Boundary;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    /// Number of registered schemas
    pub schemas: usize,
}

/// Health check route
pub fn health_routes() -> Router<Boundary> {
    Router::new().route("/health", get(health_handler))
}

async fn health_handler(State(boundary): State<Boundary>) -> impl IntoResponse {
    let response = HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        schemas: boundary.registry().len(),
    };

    (StatusCode::OK, Json(response))
}
