//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (tracing, timeout, logger propagation)
//! - Bind server to listener
//! - Flush the root logger once the server has stopped

use std::sync::Arc;
use std::time::Duration;

use axum::{http::StatusCode, routing::get, Router};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::{ResourceConfig, ServiceConfig};
use crate::http::handlers::{index, nolog};
use crate::http::middleware::LoggerLayer;
use crate::observability::logging::Logger;
use crate::observability::metrics::RequestCounter;

/// Error type for server operations.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Io(#[from] std::io::Error),
}

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub counter: Arc<RequestCounter>,
    pub resource: Arc<ResourceConfig>,
}

impl AppState {
    pub fn new(resource: ResourceConfig) -> Self {
        Self {
            counter: Arc::new(RequestCounter::new()),
            resource: Arc::new(resource),
        }
    }
}

/// Requests running longer than `limit` are answered with 408.
fn timeout_layer(limit: Duration) -> TimeoutLayer {
    TimeoutLayer::with_status_code(StatusCode::REQUEST_TIMEOUT, limit)
}

/// HTTP server for the service.
pub struct HttpServer {
    router: Router,
    root: Logger,
    state: AppState,
}

impl HttpServer {
    /// Create a new HTTP server around the root logger.
    pub fn new(config: &ServiceConfig, root: Logger) -> Self {
        let state = AppState::new(config.resource.clone());
        let router = Self::build_router(config, state.clone(), root.clone());
        Self {
            router,
            root,
            state,
        }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &ServiceConfig, state: AppState, root: Logger) -> Router {
        Router::new()
            .route("/", get(index))
            .route("/nolog", get(nolog))
            .with_state(state)
            .layer(LoggerLayer::new(root))
            .layer(timeout_layer(Duration::from_secs(
                config.server.request_timeout_secs,
            )))
            .layer(TraceLayer::new_for_http())
    }

    /// Bind the configured address.
    pub async fn bind(config: &ServiceConfig) -> Result<TcpListener, ServerError> {
        let address = config.server.bind_address();
        TcpListener::bind(&address)
            .await
            .map_err(|source| ServerError::Bind { address, source })
    }

    /// Run the server until `shutdown` fires.
    ///
    /// On shutdown: stop accepting and close the listener, let in-flight
    /// requests finish, then flush the root logger. A failed flush is
    /// reported and does not fail the shutdown.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), ServerError> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        if let Err(e) = self.root.sync() {
            tracing::error!(error = %e, "Failed to flush log sink");
        }

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// The router, for driving the service without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn root_logger(&self) -> &Logger {
        &self.root
    }
}
