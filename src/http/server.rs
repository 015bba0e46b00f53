//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router (every method, every path → relay handler)
//! - Wire up middleware (tracing, request ID)
//! - Own the shared cookie store and upstream client
//! - Serve on a listener until shutdown is signalled

use axum::{routing::any, Router};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::config::ProxyConfig;
use crate::error::RelayResult;
use crate::http::request::{UuidRequestId, X_REQUEST_ID};
use crate::relay::{relay_handler, CookieStore, UpstreamClient};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    /// Per-host cookie relay state, shared by every request.
    pub cookies: CookieStore,
    pub upstream: UpstreamClient,
}

/// HTTP server for the relay proxy.
pub struct HttpServer {
    router: Router,
    config: ProxyConfig,
    cookies: CookieStore,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: ProxyConfig) -> RelayResult<Self> {
        let cookies = CookieStore::new();
        let state = AppState {
            cookies: cookies.clone(),
            upstream: UpstreamClient::new(&config.upstream)?,
        };

        let router = Self::build_router(state);
        Ok(Self {
            router,
            config,
            cookies,
        })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(state: AppState) -> Router {
        Router::new()
            .route("/{*path}", any(relay_handler))
            .route("/", any(relay_handler))
            .with_state(state)
            .layer(PropagateRequestIdLayer::new(X_REQUEST_ID))
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::new(X_REQUEST_ID, UuidRequestId))
    }

    /// Run the server until `shutdown` fires, then drain in-flight requests.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received, draining connections");
            })
            .await?;

        tracing::info!(cookie_hosts = self.cookies.len(), "HTTP server stopped");
        Ok(())
    }

    /// The router, for driving the server without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Handle to the cookie store shared with the handlers.
    pub fn cookies(&self) -> &CookieStore {
        &self.cookies
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ProxyConfig {
        &self.config
    }
}
