pub mod models;
pub mod search;
pub mod tts;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use reqwest::Client;
use tower_http::trace::TraceLayer;
use url::Url;

use crate::config::Settings;
use crate::error::{ApiError, GatewayError};
use crate::models::ModelRegistry;

/// Immutable per-process state shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub http: Client,
    pub registry: &'static ModelRegistry,
}

impl AppState {
    pub fn new(settings: Settings) -> Result<Self, GatewayError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(settings.server.upstream_timeout_secs))
            .build()?;
        Ok(Self {
            settings: Arc::new(settings),
            http,
            registry: ModelRegistry::builtin(),
        })
    }
}

/// Build the application router.
pub fn build_router(state: AppState) -> Router {
    let body_limit = state.settings.server.body_limit_bytes;

    Router::new()
        .route("/", get(health_check))
        .route("/api/models", get(models::list_models))
        .route(
            "/api/models/negotiate",
            post(models::negotiate).fallback(method_not_allowed),
        )
        .route("/api/models/{id}", get(models::get_model))
        .route(
            "/api/elevenlabs/tts",
            post(tts::handle_tts).fallback(method_not_allowed),
        )
        .route(
            "/api/exa/contents",
            post(search::handle_contents).fallback(method_not_allowed),
        )
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

/// Start the HTTP server and run until Ctrl-C.
pub async fn start_server(settings: Settings) -> Result<(), GatewayError> {
    let addr: SocketAddr = format!("{}:{}", settings.server.host, settings.server.port)
        .parse()
        .map_err(|e| GatewayError::Other(format!("invalid listen address: {e}")))?;

    if settings.elevenlabs.key.is_empty() {
        tracing::warn!("ELEVENLABS_API_KEY is not set; /api/elevenlabs/tts will return 500");
    }
    if settings.exa.key.is_empty() {
        tracing::warn!("EXA_API_KEY is not set; /api/exa/contents will return 500");
    }

    let app = build_router(AppState::new(settings)?);

    tracing::info!(%addr, "starting chat gateway");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| GatewayError::Other(format!("failed to bind to {addr}: {e}")))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| GatewayError::Other(format!("server error: {e}")))?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}

/// Health check endpoint: GET /
async fn health_check() -> impl IntoResponse {
    (
        StatusCode::OK,
        axum::Json(serde_json::json!({"status": "ok"})),
    )
}

async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}

/// Append path segments to a vendor base URL. Segments are percent-encoded,
/// so caller-supplied ids cannot escape the intended path.
pub(crate) fn upstream_url(base: &str, segments: &[&str]) -> Result<Url, url::ParseError> {
    let mut url = Url::parse(base)?;
    url.path_segments_mut()
        .map_err(|_| url::ParseError::RelativeUrlWithCannotBeABaseBase)?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// Map an upstream status onto the status we answer with.
pub(crate) fn relay_status(status: reqwest::StatusCode) -> StatusCode {
    StatusCode::from_u16(status.as_u16()).unwrap_or(StatusCode::BAD_GATEWAY)
}
