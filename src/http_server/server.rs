//! # HTTP Server
//!
//! Main HTTP server combining all endpoint routers.

use std::io;
use std::net::SocketAddr;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use super::config::HttpServerConfig;
use super::observability_routes::health_routes;
use super::schema_routes::schema_routes;
use super::validation_routes::validation_routes;
use crate::boundary::Boundary;
use crate::observability::{log_event_with_fields, Event};

/// HTTP server fronting the validation boundary
pub struct HttpServer {
    config: HttpServerConfig,
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server with default configuration
    pub fn new(boundary: Boundary) -> Self {
        Self::with_config(HttpServerConfig::default(), boundary)
    }

    /// Create a new HTTP server with custom configuration
    pub fn with_config(config: HttpServerConfig, boundary: Boundary) -> Self {
        let router = Self::build_router(&config, boundary);
        Self { config, router }
    }

    /// Build the combined router with all endpoints
    fn build_router(config: &HttpServerConfig, boundary: Boundary) -> Router {
        let cors = if config.cors_origins.is_empty() {
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        } else {
            let origins: Vec<_> = config
                .cors_origins
                .iter()
                .filter_map(|s| s.parse().ok())
                .collect();

            CorsLayer::new()
                .allow_origin(AllowOrigin::list(origins))
                .allow_methods(Any)
                .allow_headers(Any)
        };

        Router::new()
            .merge(health_routes())
            .nest("/schemas", schema_routes())
            .nest("/validate", validation_routes())
            .layer(cors)
            .with_state(boundary)
    }

    /// Get the socket address
    pub fn socket_addr(&self) -> String {
        self.config.socket_addr()
    }

    /// Get the router (for testing)
    pub fn router(self) -> Router {
        self.router
    }

    /// Start the HTTP server (async)
    pub async fn start(self) -> Result<(), io::Error> {
        let addr: SocketAddr = self.config.socket_addr().parse().map_err(|e| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("invalid socket address {}: {}", self.config.socket_addr(), e),
            )
        })?;

        let listener = TcpListener::bind(addr).await?;
        let bound = listener.local_addr()?.to_string();
        log_event_with_fields(Event::ServerStart, &[("addr", bound.as_str())]);

        axum::serve(listener, self.router).await?;

        log_event_with_fields(Event::ServerStop, &[("addr", bound.as_str())]);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::schema::SchemaRegistry;

    fn boundary() -> Boundary {
        Boundary::new(Arc::new(SchemaRegistry::in_memory()))
    }

    #[test]
    fn test_server_creation() {
        let server = HttpServer::new(boundary());
        assert_eq!(server.socket_addr(), "127.0.0.1:8480");
    }

    #[test]
    fn test_server_with_custom_port() {
        let config = HttpServerConfig::with_port(8080);
        let server = HttpServer::with_config(config, boundary());
        assert_eq!(server.socket_addr(), "127.0.0.1:8080");
    }

    #[test]
    fn test_router_builds_with_origin_list() {
        let config = HttpServerConfig {
            cors_origins: vec!["http://localhost:5173".to_string()],
            ..Default::default()
        };
        let _router = HttpServer::with_config(config, boundary()).router();
    }
}
