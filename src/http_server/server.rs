//! # HTTP Server
//!
//! Session server: the WebSocket endpoint sessions talk to, the
//! network-first candidate list, health and metrics.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use super::config::HttpServerConfig;
use super::config_routes::config_routes;
use super::observability_routes::{health_routes, observability_routes};
use super::session_routes::session_routes;
use crate::failover::FailoverEngine;
use crate::observability::{log_event_with_fields, Event};

/// State shared by every handler
pub struct AppState {
    pub engine: Arc<FailoverEngine>,
    /// Overrides the Host header as the sessions' current domain
    pub current_domain: Option<String>,
}

impl AppState {
    pub fn new(engine: Arc<FailoverEngine>) -> Self {
        Self {
            engine,
            current_domain: None,
        }
    }

    pub fn with_current_domain(mut self, domain: Option<String>) -> Self {
        self.current_domain = domain;
        self
    }
}

/// Session server
pub struct HttpServer {
    config: HttpServerConfig,
    router: Router,
}

impl HttpServer {
    pub fn with_config(config: HttpServerConfig, state: Arc<AppState>) -> Self {
        let router = Self::build_router(&config, state);
        Self { config, router }
    }

    fn build_router(config: &HttpServerConfig, state: Arc<AppState>) -> Router {
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
            .merge(session_routes(state.clone()))
            .merge(config_routes(state.clone()))
            .nest("/observability", observability_routes(state))
            .layer(cors)
    }

    pub fn socket_addr(&self) -> String {
        self.config.socket_addr()
    }

    /// Get the router (for testing)
    pub fn router(self) -> Router {
        self.router
    }

    /// Bind and serve until the process stops
    pub async fn start(self) -> Result<(), std::io::Error> {
        let addr: SocketAddr = self.config.socket_addr().parse().map_err(|e| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("invalid socket address {}: {}", self.config.socket_addr(), e),
            )
        })?;

        let listener = TcpListener::bind(addr).await?;
        log_event_with_fields(Event::Serving, &[("addr", &addr.to_string())]);

        axum::serve(listener, self.router).await?;

        log_event_with_fields(Event::ShutdownComplete, &[("addr", &addr.to_string())]);
        Ok(())
    }
}
