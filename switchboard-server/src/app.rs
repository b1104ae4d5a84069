use crate::config::RelayConfig;
use crate::error::RelayError;
use crate::router::RouterHandle;
use crate::signaling::{SignalingService, ws_handler};
use axum::http::header::{ACCEPT, CONTENT_TYPE, HeaderName, ORIGIN};
use axum::http::Method;
use axum::routing::get;
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

/// Shared state of the HTTP/WebSocket layer.
pub struct AppState {
    pub signaling: SignalingService,
    pub router: RouterHandle,
}

impl AppState {
    /// Builds the connection table and starts a router that sends through it.
    pub fn new(config: &RelayConfig) -> Self {
        let signaling = SignalingService::new(config.ice_servers());
        let router = RouterHandle::spawn(Arc::new(signaling.clone()), config.presence);

        Self { signaling, router }
    }
}

pub async fn health() -> &'static str {
    "Hello World!"
}

pub fn app(state: Arc<AppState>) -> axum::Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([
            ORIGIN,
            HeaderName::from_static("x-requested-with"),
            CONTENT_TYPE,
            ACCEPT,
        ]);

    axum::Router::new()
        .route("/", get(health))
        .route("/ws", get(ws_handler))
        .layer(cors)
        .with_state(state)
}

/// Binds the configured address and serves until `shutdown` resolves.
pub async fn serve<F>(config: RelayConfig, shutdown: F) -> Result<(), RelayError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = config.socket_addr();
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| RelayError::Bind { addr, source })?;

    serve_with_listener(listener, config, shutdown).await
}

pub async fn serve_with_listener<F>(
    listener: TcpListener,
    config: RelayConfig,
    shutdown: F,
) -> Result<(), RelayError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let state = Arc::new(AppState::new(&config));

    let addr = listener.local_addr().map_err(RelayError::Serve)?;
    info!("Signaling server listening on http://{}", addr);

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(RelayError::Serve)
}
