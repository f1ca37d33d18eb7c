//! HTTP API layer with Axum routes and middleware.
//!
//! This crate provides:
//! - REST routes for files and generation under `/v1`
//! - Error to response mapping
//! - Request logging middleware

pub mod error;
pub mod middleware;
pub mod routes;

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::http::HeaderName;
use files_core::files::FileService;
use tower_http::cors::{Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

/// Header carrying the per-request id.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// File operations.
    pub files: Arc<FileService>,
}

impl AppState {
    /// Wrap a file service.
    #[must_use]
    pub fn new(files: FileService) -> Self {
        Self {
            files: Arc::new(files),
        }
    }
}

/// Router-level settings.
#[derive(Debug, Clone, Copy)]
pub struct RouterConfig {
    /// Requests running longer than this are cancelled.
    pub request_timeout: Duration,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// Creates the main application router.
pub fn create_router(state: AppState, config: RouterConfig) -> Router {
    let request_id = HeaderName::from_static(REQUEST_ID_HEADER);

    Router::new()
        .nest("/v1", routes::api_routes(state.files.config()))
        .merge(routes::health::routes())
        .layer(TimeoutLayer::new(config.request_timeout))
        .layer(PropagateRequestIdLayer::new(request_id.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::new(request_id, MakeRequestUuid))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
