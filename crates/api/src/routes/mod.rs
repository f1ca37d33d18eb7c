//! API route definitions.

use axum::{Router, middleware};
use files_core::files::FilesConfig;

use crate::AppState;
use crate::middleware::logging_middleware;

pub mod files;
pub mod generate;
pub mod health;

/// Creates the versioned API router. Body limits come from `limits`.
pub fn api_routes(limits: &FilesConfig) -> Router<AppState> {
    // `route_layer` so the logger sees the matched path
    Router::new()
        .merge(generate::routes(limits))
        .merge(files::routes(limits))
        .route_layer(middleware::from_fn(logging_middleware))
}
