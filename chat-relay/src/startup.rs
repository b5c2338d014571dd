use crate::config::RelayConfig;
use crate::handlers;
use crate::services::{ReqwestUpstreamClient, RelayHandler, UpstreamClient};
use axum::{
    middleware::from_fn,
    routing::{get, post},
    Router,
};
use service_core::error::AppError;
use service_core::middleware::{request_id_middleware, REQUEST_ID_HEADER};
use std::future::{Future, IntoFuture};
use std::net::SocketAddr;
use std::pin::Pin;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct AppState {
    pub relay: RelayHandler,
}

pub struct Application {
    port: u16,
    server: Pin<Box<dyn Future<Output = std::io::Result<()>> + Send>>,
}

impl Application {
    /// Build with the production reqwest client. A client that fails to build
    /// leaves the relay up but degraded; chats and liveness report it.
    pub async fn build(config: RelayConfig) -> Result<Self, AppError> {
        let client: Option<Arc<dyn UpstreamClient>> = match ReqwestUpstreamClient::new() {
            Ok(client) => Some(Arc::new(client) as Arc<dyn UpstreamClient>),
            Err(e) => {
                tracing::error!("Failed to initialize outbound HTTP client: {}", e);
                None
            }
        };

        Self::build_with_client(config, client).await
    }

    pub async fn build_with_client(
        config: RelayConfig,
        client: Option<Arc<dyn UpstreamClient>>,
    ) -> Result<Self, AppError> {
        if !config.google.has_api_key() {
            tracing::warn!("GOOGLE_API_KEY not configured - chat requests will fail until it is set");
        }

        let config = Arc::new(config);
        let state = AppState {
            relay: RelayHandler::new(config.clone(), client),
        };

        let app = router(state);

        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind TCP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!(
            port,
            upstream = config.google.base_url.host_str().unwrap_or("-"),
            timeout_secs = config.google.timeout.as_secs(),
            "AI proxy listening"
        );

        let server = axum::serve(listener, app).with_graceful_shutdown(shutdown_signal());

        Ok(Self {
            port,
            server: Box::pin(server.into_future()),
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        self.server.await
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::liveness))
        .route("/health", get(handlers::liveness))
        .route(
            "/api/ai/chat",
            post(handlers::chat).fallback(handlers::method_not_allowed),
        )
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                let request_id = request
                    .headers()
                    .get(REQUEST_ID_HEADER)
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri().path(),
                    version = ?request.version(),
                )
            }),
        )
        .layer(from_fn(request_id_middleware))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
