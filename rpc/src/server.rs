//! Axum-based lookup server.

use axum::http::header::CONTENT_TYPE;
use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use idcheck_registry::RecordSource;
use std::any::Any;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any as AnyOrigin, CorsLayer};
use tracing::{error, info};

use crate::error::{panic_message, RpcError, INTERNAL_MESSAGE};
use crate::handlers::{self, FailureResponse};
use crate::metrics::LookupMetrics;

/// Listener and behaviour settings for [`RpcServer`].
#[derive(Clone, Debug)]
pub struct RpcConfig {
    pub bind_address: String,
    pub port: u16,
    /// Artificial pause before every lookup.
    pub simulated_latency: Duration,
    /// Expose `GET /metrics`.
    pub enable_metrics: bool,
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1".to_string(),
            port: 7080,
            simulated_latency: Duration::ZERO,
            enable_metrics: false,
        }
    }
}

/// State shared by every handler. Read-only after construction.
pub struct AppState {
    pub source: Arc<dyn RecordSource>,
    pub metrics: LookupMetrics,
    pub simulated_latency: Duration,
}

pub struct RpcServer {
    config: RpcConfig,
    state: Arc<AppState>,
}

impl RpcServer {
    pub fn new(config: RpcConfig, source: Arc<dyn RecordSource>) -> Result<Self, RpcError> {
        let metrics = LookupMetrics::new()
            .map_err(|e| RpcError::Server(format!("failed to register metrics: {e}")))?;
        let state = Arc::new(AppState {
            source,
            metrics,
            simulated_latency: config.simulated_latency,
        });
        Ok(Self { config, state })
    }

    pub fn state(&self) -> &Arc<AppState> {
        &self.state
    }

    /// Build the router with all handlers.
    pub fn router(&self) -> Router {
        let cors = CorsLayer::new()
            .allow_origin(AnyOrigin)
            .allow_methods([Method::GET, Method::POST])
            .allow_headers([CONTENT_TYPE]);

        let mut router = Router::new()
            .route("/api/verify-nin", post(handlers::verify_nin))
            .route("/health", get(handlers::health));
        if self.config.enable_metrics {
            router = router.route("/metrics", get(handlers::metrics));
        }
        router
            .with_state(self.state.clone())
            .layer(CatchPanicLayer::custom(panic_response))
            .layer(cors)
    }

    /// Bind the configured address. Port 0 picks a free port.
    pub async fn bind(&self) -> Result<TcpListener, RpcError> {
        let addr = format!("{}:{}", self.config.bind_address, self.config.port);
        TcpListener::bind(&addr)
            .await
            .map_err(|source| RpcError::Bind { addr, source })
    }

    /// Serve on `listener` until `shutdown` resolves.
    pub async fn serve<F>(&self, listener: TcpListener, shutdown: F) -> Result<(), RpcError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let local: SocketAddr = listener.local_addr()?;
        info!(
            "Lookup server listening on {} ({} records, metrics {})",
            local,
            self.state.source.len(),
            if self.config.enable_metrics { "on" } else { "off" }
        );
        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown)
            .await?;
        info!("Lookup server stopped");
        Ok(())
    }

    /// Bind and serve until `shutdown` resolves.
    pub async fn start<F>(&self, shutdown: F) -> Result<(), RpcError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let listener = self.bind().await?;
        self.serve(listener, shutdown).await
    }
}

fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    error!("handler panicked: {}", panic_message(&*err));
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(FailureResponse::new(INTERNAL_MESSAGE)),
    )
        .into_response()
}
