//! # HTTP Server
//!
//! Main HTTP server combining all endpoint routers.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::voting::VotingService;

use super::config::HttpServerConfig;
use super::health::health_routes;
use super::voting_routes::{voting_routes, VotingState};

/// HTTP server for the voting API
pub struct HttpServer {
    config: HttpServerConfig,
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server with default configuration
    pub fn new(service: Arc<VotingService>) -> Self {
        Self::with_config(service, HttpServerConfig::default())
    }

    /// Create a new HTTP server with custom configuration
    pub fn with_config(service: Arc<VotingService>, config: HttpServerConfig) -> Self {
        let router = Self::build_router(service, &config);
        Self { config, router }
    }

    /// Build the combined router with all endpoints
    fn build_router(service: Arc<VotingService>, config: &HttpServerConfig) -> Router {
        let voting_state = Arc::new(VotingState::new(service));

        // Permissive CORS when no origins are configured (development),
        // the configured list otherwise.
        let cors = if config.cors_origins.is_empty() {
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        } else {
            use tower_http::cors::AllowOrigin;
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
            // Health check at root level
            .merge(health_routes())
            // Voting routes under /voting
            .nest("/voting", voting_routes(voting_state))
            .layer(cors)
            .layer(TraceLayer::new_for_http())
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
    pub async fn start(self) -> Result<(), std::io::Error> {
        let addr: SocketAddr = self.config.socket_addr().parse().map_err(|e| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("invalid socket address '{}': {}", self.config.socket_addr(), e),
            )
        })?;

        tracing::info!(%addr, "starting ballotd HTTP server");

        let listener = TcpListener::bind(addr).await?;
        axum::serve(listener, self.router).await?;

        Ok(())
    }
}
