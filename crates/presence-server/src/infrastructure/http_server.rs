//! HTTP server: routes, handlers, and the serve loop.
//!
//! | Method | Path            | Handler     |
//! |--------|-----------------|-------------|
//! | GET    | `/`             | banner      |
//! | POST   | `/register`     | `register`  |
//! | POST   | `/heartbeat`    | `heartbeat` |
//! | GET    | `/list`         | `list`      |
//! | POST   | `/request`      | `request`   |
//! | POST   | `/respond`      | `respond`   |
//! | GET    | `/status/{id}`  | `status`    |
//! | POST   | `/reset`        | `reset`     |
//!
//! Handlers take the body as raw bytes and hand it to the application
//! layer, which owns decoding.  The only state is the shared
//! `Arc<Registry>`.
//!
//! # Shutdown
//!
//! `run_server` serves until the shared `running` flag is cleared (by the
//! Ctrl+C handler in `main.rs`), then lets in-flight requests finish.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::time::Duration;

use anyhow::Context;
use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use presence_core::Registry;

use crate::application::coordinator_service::{self, ApiError, BANNER};
use crate::domain::messages::{DeviceEntry, ErrorResponse, StatusResponse, SuccessResponse};
use crate::domain::ServerConfig;
use crate::infrastructure::sweeper::spawn_sweeper;

/// How often the graceful-shutdown future re-checks the `running` flag.
const SHUTDOWN_POLL_INTERVAL: Duration = Duration::from_millis(200);

/// Builds the application router around a shared registry.
pub fn router(registry: Arc<Registry>) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/register", post(register))
        .route("/heartbeat", post(heartbeat))
        .route("/list", get(list))
        .route("/request", post(request))
        .route("/respond", post(respond))
        .route("/status/{id}", get(status))
        .route("/reset", post(reset))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(registry)
}

/// Binds `config.bind_addr` and serves until `running` is cleared.
///
/// Starts the background sweeper first when `config.sweep_interval` is set.
///
/// # Errors
///
/// Returns an error if the listener cannot be bound or the server fails.
pub async fn run_server(
    config: ServerConfig,
    registry: Arc<Registry>,
    running: Arc<AtomicBool>,
) -> anyhow::Result<()> {
    let listener = TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind HTTP listener on {}", config.bind_addr))?;

    info!("presence coordinator listening on {}", config.bind_addr);

    let sweeper = config
        .sweep_interval
        .map(|every| spawn_sweeper(Arc::clone(&registry), every, Arc::clone(&running)));

    let served = axum::serve(listener, router(registry))
        .with_graceful_shutdown(wait_for_shutdown(running))
        .await
        .context("HTTP server error");

    if let Some(handle) = sweeper {
        handle.abort();
    }
    served
}

async fn wait_for_shutdown(running: Arc<AtomicBool>) {
    while running.load(Ordering::Relaxed) {
        tokio::time::sleep(SHUTDOWN_POLL_INTERVAL).await;
    }
    info!("shutdown flag set; draining HTTP connections");
}

// ── Handlers ──────────────────────────────────────────────────────────────────

async fn home() -> &'static str {
    BANNER
}

async fn register(
    State(registry): State<Arc<Registry>>,
    body: Bytes,
) -> Result<Json<SuccessResponse>, ApiError> {
    coordinator_service::register(&registry, &body).map(Json)
}

async fn heartbeat(
    State(registry): State<Arc<Registry>>,
    body: Bytes,
) -> Result<Json<SuccessResponse>, ApiError> {
    coordinator_service::heartbeat(&registry, &body).map(Json)
}

async fn list(State(registry): State<Arc<Registry>>) -> Json<Vec<DeviceEntry>> {
    Json(coordinator_service::list(&registry))
}

async fn request(
    State(registry): State<Arc<Registry>>,
    body: Bytes,
) -> Result<Json<SuccessResponse>, ApiError> {
    coordinator_service::request(&registry, &body).map(Json)
}

async fn respond(
    State(registry): State<Arc<Registry>>,
    body: Bytes,
) -> Result<Json<SuccessResponse>, ApiError> {
    coordinator_service::respond(&registry, &body).map(Json)
}

async fn status(
    State(registry): State<Arc<Registry>>,
    Path(id): Path<String>,
) -> Result<Json<StatusResponse>, ApiError> {
    coordinator_service::status(&registry, &id).map(Json)
}

async fn reset(
    State(registry): State<Arc<Registry>>,
    body: Bytes,
) -> Result<Json<SuccessResponse>, ApiError> {
    coordinator_service::reset(&registry, &body).map(Json)
}

// ── Error responses ───────────────────────────────────────────────────────────

impl ApiError {
    /// HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::MalformedInput(_) | Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::NotFound { .. } | Self::StatusNotFound => StatusCode::NOT_FOUND,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status == StatusCode::BAD_REQUEST {
            warn!("rejected request: {self}");
        }
        match self {
            Self::StatusNotFound => (status, Json(StatusResponse::NotFound)).into_response(),
            other => (
                status,
                Json(ErrorResponse {
                    error: other.to_string(),
                }),
            )
                .into_response(),
        }
    }
}
