//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (request ID, tracing, timeout, bearer gate, body limit)
//! - Bind server to a plain or TLS listener
//! - Drain in-flight requests on shutdown

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    routing::{get, post_service},
    Router,
};
use axum_server::tls_rustls::RustlsConfig;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    limit::RequestBodyLimitLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::{Secrets, ServerConfig};
use crate::http::handlers::get_health;
use crate::http::middleware::BearerAuthLayer;
use crate::http::request::{UuidRequestId, X_REQUEST_ID};
use crate::lifecycle::shutdown::signalled;
use crate::mcp::{streamable_service, ToolRegistry, ToolServer};
use crate::places::{FindOnMapTool, PlacesClient, PlacesError};
use crate::security::Gate;

/// Errors raised while building or running the server.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Places client error: {0}")]
    Places(#[from] PlacesError),
}

/// HTTP server exposing the gated tool endpoint.
pub struct HttpServer {
    router: Router,
    config: ServerConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration and secrets.
    pub fn new(config: ServerConfig, secrets: Secrets) -> Result<Self, ServerError> {
        if !secrets.auth_token.is_configured() {
            tracing::warn!(
                env = %config.auth.token_env,
                "No bearer secret configured; every gated request will be rejected"
            );
        }

        let client = Arc::new(PlacesClient::new(&config.places, secrets.places_api_key)?);
        if !client.has_api_key() {
            tracing::warn!(
                env = %config.places.api_key_env,
                "No places API key configured; tool calls will fail"
            );
        }
        let tools = ToolRegistry::new().with(FindOnMapTool::new(client));
        let gate = Arc::new(Gate::new(secrets.auth_token));

        let router = build_router(&config, gate, tools);
        Ok(Self { router, config })
    }

    /// The fully layered application, for in-process testing.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Serve plain HTTP on `listener` until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, mcp_path = %self.config.mcp.path, "HTTP server starting");

        axum::serve(listener, self.router.into_make_service())
            .with_graceful_shutdown(signalled(shutdown))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Serve HTTPS on `addr` until `shutdown` fires.
    pub async fn run_tls(
        self,
        addr: SocketAddr,
        tls: RustlsConfig,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        tracing::info!(address = %addr, mcp_path = %self.config.mcp.path, "HTTPS server starting");

        let handle = axum_server::Handle::new();
        let grace = Duration::from_secs(self.config.timeouts.shutdown_secs);
        let signal_handle = handle.clone();
        tokio::spawn(async move {
            signalled(shutdown).await;
            signal_handle.graceful_shutdown(Some(grace));
        });

        axum_server::bind_rustls(addr, tls)
            .handle(handle)
            .serve(self.router.into_make_service())
            .await?;

        tracing::info!("HTTPS server stopped");
        Ok(())
    }
}

/// Build the Axum router with all middleware layers.
///
/// The bearer gate wraps every route; paths in `auth.exempt_paths` are let
/// through without a credential.
#[allow(deprecated)]
pub fn build_router(config: &ServerConfig, gate: Arc<Gate>, tools: ToolRegistry) -> Router {
    let mcp = streamable_service(ToolServer::new(config.mcp.server_name.clone(), tools));
    let auth = BearerAuthLayer::new(gate).with_exempt_paths(config.auth.exempt_paths.iter().cloned());

    Router::new()
        .route("/health", get(get_health))
        .route(&config.mcp.path, post_service(mcp))
        .layer(RequestBodyLimitLayer::new(config.security.max_body_size))
        .layer(auth)
        .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
        .layer(PropagateRequestIdLayer::new(X_REQUEST_ID))
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::new(X_REQUEST_ID, UuidRequestId))
}
