//! File resource routes.
//!
//! `/v1/files` lists objects; `/v1/files/{*key}` reads, writes and deletes a
//! single object. Keys may contain `/`.

use axum::{
    Json, Router,
    body::{Body, Bytes},
    extract::{
        DefaultBodyLimit, Path, Query, State,
        rejection::{BytesRejection, QueryRejection},
    },
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{any, get},
};
use chrono::{DateTime, Utc};
use files_core::files::{FilesConfig, UploadInput};
use files_core::storage::{DEFAULT_CONTENT_TYPE, ObjectMeta};
use files_shared::AppError;
use files_shared::types::PageRequest;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::AppState;
use crate::error::{ApiError, ApiResult};

/// Creates the file routes. Uploads are capped at `max_upload_bytes`.
pub fn routes(limits: &FilesConfig) -> Router<AppState> {
    let body_limit = usize::try_from(limits.max_upload_bytes).unwrap_or(usize::MAX);

    Router::new()
        .route("/files", get(list_files))
        // the wildcard does not match an empty key
        .route("/files/", any(empty_key))
        .route(
            "/files/{*key}",
            get(download_file)
                .head(describe_file)
                .put(upload_file)
                .delete(delete_file),
        )
        .route_layer(DefaultBodyLimit::max(body_limit))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Query parameters for listing files.
#[derive(Debug, Default, Deserialize)]
pub struct ListFilesQuery {
    /// Only keys starting with this prefix.
    #[serde(default)]
    pub prefix: Option<String>,
    /// Items per page (1-1000, default 100).
    #[serde(default)]
    pub page_size: Option<u32>,
    /// Cursor from a previous page.
    #[serde(default)]
    pub cursor: Option<String>,
}

/// Metadata of a stored file.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileResponse {
    /// Object key.
    pub key: String,
    /// Size in bytes.
    pub size: u64,
    /// MIME type, when known.
    pub content_type: Option<String>,
    /// Last write time (RFC 3339).
    pub last_modified: Option<DateTime<Utc>>,
}

impl From<ObjectMeta> for FileResponse {
    fn from(meta: ObjectMeta) -> Self {
        Self {
            key: meta.key,
            size: meta.size,
            content_type: meta.content_type,
            last_modified: meta.last_modified,
        }
    }
}

/// One page of files.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListFilesResponse {
    /// Files in ascending key order.
    pub items: Vec<FileResponse>,
    /// Cursor for the next page; `null` on the last page.
    pub next_cursor: Option<String>,
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Format a timestamp as an HTTP date.
fn http_date(ts: &DateTime<Utc>) -> String {
    ts.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

/// Headers describing an object: type, length and modification time.
pub(crate) fn object_headers(meta: &ObjectMeta, content_length: u64) -> HeaderMap {
    let mut headers = HeaderMap::new();
    let content_type = HeaderValue::from_str(meta.content_type_or_default())
        .unwrap_or(HeaderValue::from_static(DEFAULT_CONTENT_TYPE));
    headers.insert(header::CONTENT_TYPE, content_type);
    headers.insert(header::CONTENT_LENGTH, HeaderValue::from(content_length));
    if let Some(value) = meta
        .last_modified
        .as_ref()
        .and_then(|ts| HeaderValue::from_str(&http_date(ts)).ok())
    {
        headers.insert(header::LAST_MODIFIED, value);
    }
    headers
}

/// `attachment` disposition so browsers download PDFs instead of rendering them.
fn pdf_disposition(meta: &ObjectMeta) -> Option<HeaderValue> {
    if meta.content_type_or_default() != "application/pdf" {
        return None;
    }
    let filename = meta.key.replace('"', "");
    HeaderValue::from_str(&format!("attachment; filename=\"{filename}\"")).ok()
}

// ============================================================================
// Handlers
// ============================================================================

/// List files with cursor pagination.
async fn list_files(
    State(state): State<AppState>,
    query: Result<Query<ListFilesQuery>, QueryRejection>,
) -> ApiResult<Json<ListFilesResponse>> {
    let Query(query) = query.map_err(|e| AppError::invalid_argument(e.body_text()))?;
    let page = PageRequest::new(query.page_size, query.cursor)?;
    let prefix = query.prefix.unwrap_or_default();

    let result = state.files.list(&prefix, &page).await?;

    Ok(Json(ListFilesResponse {
        items: result.items.into_iter().map(FileResponse::from).collect(),
        next_cursor: result.next_cursor,
    }))
}

/// Store the request body under `key`.
async fn upload_file(
    State(state): State<AppState>,
    Path(key): Path<String>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> ApiResult<impl IntoResponse> {
    let max = state.files.config().max_upload_bytes;
    let content = body.map_err(|rejection| {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            let size = headers
                .get(header::CONTENT_LENGTH)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok())
                .unwrap_or(max.saturating_add(1));
            AppError::payload_too_large(size, max)
        } else {
            AppError::invalid_argument(rejection.body_text())
        }
    })?;

    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(String::from);

    let outcome = state
        .files
        .upload(UploadInput {
            key,
            content,
            content_type,
        })
        .await?;

    let status = if outcome.created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    info!(key = %outcome.meta.key, size = outcome.meta.size, status = status.as_u16(), "upload handled");

    Ok((status, Json(FileResponse::from(outcome.meta))))
}

/// Return the object's bytes.
async fn download_file(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> ApiResult<Response> {
    let object = state.files.download(&key).await?;

    let mut headers = object_headers(&object.meta, object.content.len() as u64);
    if let Some(disposition) = pdf_disposition(&object.meta) {
        headers.insert(header::CONTENT_DISPOSITION, disposition);
    }
    debug!(key = %key, size = object.content.len(), "download served");

    Ok((StatusCode::OK, headers, Body::from(object.content)).into_response())
}

/// Return the object's headers without a body.
///
/// Errors carry their message in `X-Error` since HEAD responses have no body.
async fn describe_file(State(state): State<AppState>, Path(key): Path<String>) -> Response {
    match state.files.describe(&key).await {
        Ok(meta) => {
            let headers = object_headers(&meta, meta.size);
            (StatusCode::OK, headers).into_response()
        }
        Err(err) => {
            let err = ApiError(err);
            err.log();
            let mut headers = HeaderMap::new();
            if let Ok(value) = HeaderValue::from_str(&err.0.to_string()) {
                headers.insert("x-error", value);
            }
            (err.status(), headers).into_response()
        }
    }
}

/// Any request for `/files/`.
async fn empty_key() -> ApiError {
    ApiError(AppError::invalid_argument("key must not be empty"))
}

/// Remove the object. Succeeds whether or not it existed.
async fn delete_file(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> ApiResult<StatusCode> {
    state.files.delete(&key).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
#[path = "files_tests.rs"]
mod tests;
