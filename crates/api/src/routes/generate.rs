//! AI file generation route.
//!
//! `POST /v1/files/generate` shares the `/files` namespace, so the key
//! `generate` itself cannot be written or read through `/v1/files/{*key}`.

use axum::{
    Json, Router,
    body::Body,
    extract::{DefaultBodyLimit, State, rejection::JsonRejection},
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
    routing::post,
};
use chrono::{DateTime, Utc};
use files_core::files::{FilesConfig, GenerateInput};
use files_core::generation::GenerationKind;
use files_shared::AppError;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::AppState;
use crate::error::ApiResult;

/// Room for the JSON envelope and key around the prompt.
const REQUEST_OVERHEAD_BYTES: usize = 4096;

/// Creates the generation routes.
pub fn routes(limits: &FilesConfig) -> Router<AppState> {
    Router::new()
        .route("/files/generate", post(generate_file))
        .route_layer(DefaultBodyLimit::max(request_body_limit(limits)))
}

/// Largest request body that can carry a prompt of `max_prompt_chars`,
/// allowing six bytes per character for `\uXXXX` escapes.
fn request_body_limit(limits: &FilesConfig) -> usize {
    limits
        .max_prompt_chars
        .saturating_mul(6)
        .saturating_add(REQUEST_OVERHEAD_BYTES)
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for generating a file.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    /// `text`, `image` or `audio` (`text-to-speech` also accepted).
    pub kind: GenerationKind,
    /// Prompt for the provider.
    pub prompt: String,
    /// Store the result under this key.
    #[serde(default)]
    pub persist_as_key: Option<String>,
}

/// Response for a persisted generation.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    /// Key the artifact was stored under.
    pub key: String,
    /// Artifact kind.
    pub kind: GenerationKind,
    /// Size in bytes.
    pub size: u64,
    /// MIME type.
    pub content_type: String,
    /// Write time (RFC 3339).
    pub last_modified: Option<DateTime<Utc>>,
    /// Human-readable summary.
    pub message: String,
}

// ============================================================================
// Handlers
// ============================================================================

/// Generate a file, returning it inline or storing it.
async fn generate_file(
    State(state): State<AppState>,
    body: Result<Json<GenerateRequest>, JsonRejection>,
) -> ApiResult<Response> {
    let Json(request) = body.map_err(|rejection| {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            let max = request_body_limit(state.files.config()) as u64;
            AppError::payload_too_large(max.saturating_add(1), max)
        } else {
            AppError::invalid_argument(rejection.body_text())
        }
    })?;
    let kind = request.kind;

    let file = state
        .files
        .generate(GenerateInput {
            kind,
            prompt: request.prompt,
            persist_as_key: request.persist_as_key,
        })
        .await?;

    let message = file.message();
    match (file.stored, message) {
        (Some(outcome), Some(message)) => {
            let meta = outcome.meta;
            info!(key = %meta.key, kind = %kind, size = meta.size, created = outcome.created, "generated file persisted");
            let response = GenerateResponse {
                key: meta.key,
                kind,
                size: meta.size,
                content_type: file.content_type,
                last_modified: meta.last_modified,
                message,
            };
            Ok((StatusCode::CREATED, Json(response)).into_response())
        }
        _ => {
            info!(kind = %kind, size = file.content.len(), "generated file returned inline");
            let mut headers = HeaderMap::new();
            if let Ok(value) = HeaderValue::from_str(&file.content_type) {
                headers.insert(header::CONTENT_TYPE, value);
            }
            headers.insert(
                header::CONTENT_LENGTH,
                HeaderValue::from(file.content.len() as u64),
            );
            Ok((StatusCode::OK, headers, Body::from(file.content)).into_response())
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{Method, Request, StatusCode, header};
    use files_core::files::FilesConfig;
    use files_core::generation::{AudioFormat, GeneratedContent, GenerationError, Generator};
    use rstest::rstest;

    use crate::routes::test_support::{app, body_bytes, body_json, send};

    #[derive(Default)]
    struct StubGenerator {
        calls: AtomicUsize,
        fail_status: Option<u16>,
    }

    impl StubGenerator {
        fn reply(&self, content: GeneratedContent) -> Result<GeneratedContent, GenerationError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.fail_status {
                Some(status) => Err(GenerationError::from_status(
                    status,
                    "provider said no".into(),
                )),
                None => Ok(content),
            }
        }
    }

    #[async_trait]
    impl Generator for StubGenerator {
        async fn generate_text(&self, _prompt: &str) -> Result<GeneratedContent, GenerationError> {
            self.reply(GeneratedContent::new(&b"hello"[..], "text/plain"))
        }

        async fn generate_image(
            &self,
            _prompt: &str,
        ) -> Result<GeneratedContent, GenerationError> {
            self.reply(GeneratedContent::new(&b"\x89PNG"[..], "image/png"))
        }

        async fn generate_audio(
            &self,
            _prompt: &str,
            format: AudioFormat,
        ) -> Result<GeneratedContent, GenerationError> {
            self.reply(GeneratedContent::new(&b"ID3"[..], format.mime_type()))
        }
    }

    fn generate(body: &str) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri("/v1/files/generate")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_generate_text_inline() {
        let app = app(
            FilesConfig::default(),
            Some(Arc::new(StubGenerator::default())),
        );

        let response = send(&app, generate(r#"{"kind":"text","prompt":"say hello"}"#)).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "text/plain");
        assert_eq!(body_bytes(response).await.as_ref(), b"hello");
    }

    #[tokio::test]
    async fn test_generate_and_persist() {
        let app = app(
            FilesConfig::default(),
            Some(Arc::new(StubGenerator::default())),
        );

        let response = send(
            &app,
            generate(r#"{"kind":"Text","prompt":"say hello","persistAsKey":"out.txt"}"#),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let json = body_json(response).await;
        assert_eq!(json["key"], "out.txt");
        assert_eq!(json["kind"], "text");
        assert_eq!(json["size"], 5);
        assert_eq!(json["contentType"], "text/plain");
        assert_eq!(
            json["message"],
            "New text file generated and uploaded at path: out.txt"
        );

        let response = send(
            &app,
            Request::builder()
                .uri("/v1/files/out.txt")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(body_bytes(response).await.as_ref(), b"hello");
    }

    #[tokio::test]
    async fn test_persist_over_existing_key_reports_replacement() {
        let app = app(
            FilesConfig::default(),
            Some(Arc::new(StubGenerator::default())),
        );
        let body = r#"{"kind":"text","prompt":"say hello","persistAsKey":"out.txt"}"#;

        let first = send(&app, generate(body)).await;
        assert_eq!(first.status(), StatusCode::CREATED);

        let second = send(&app, generate(body)).await;
        assert_eq!(second.status(), StatusCode::CREATED);
        let json = body_json(second).await;
        assert_eq!(
            json["message"],
            "Text file generated and replaced existing file at path: out.txt"
        );
    }

    #[tokio::test]
    async fn test_text_to_speech_alias() {
        let app = app(
            FilesConfig::default(),
            Some(Arc::new(StubGenerator::default())),
        );

        let response = send(
            &app,
            generate(r#"{"kind":"text-to-speech","prompt":"hi","persistAsKey":"a/hi.opus"}"#),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let json = body_json(response).await;
        assert_eq!(json["kind"], "audio");
        assert_eq!(json["contentType"], "audio/opus");
    }

    #[rstest]
    #[case(r#"{"kind":"video","prompt":"x"}"#)]
    #[case(r#"{"kind":"text","prompt":"   "}"#)]
    #[case(r#"{"kind":"text","prompt":"x","persistAsKey":"out.png"}"#)]
    #[case(r#"{"kind":"image","prompt":"x","persistAsKey":"/abs.png"}"#)]
    #[case(r#"{"kind":"text""#)]
    #[case(r#"{"prompt":"x"}"#)]
    #[tokio::test]
    async fn test_invalid_requests_return_400_without_provider_call(#[case] body: &str) {
        let generator = Arc::new(StubGenerator::default());
        let app = app(FilesConfig::default(), Some(generator.clone()));

        let response = send(&app, generate(body)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"], "invalid_argument");
        assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
    }

    #[rstest]
    #[case(429, StatusCode::SERVICE_UNAVAILABLE)]
    #[case(500, StatusCode::SERVICE_UNAVAILABLE)]
    #[case(400, StatusCode::BAD_GATEWAY)]
    #[tokio::test]
    async fn test_provider_failures(#[case] provider_status: u16, #[case] expected: StatusCode) {
        let generator = Arc::new(StubGenerator {
            fail_status: Some(provider_status),
            ..StubGenerator::default()
        });
        let app = app(FilesConfig::default(), Some(generator));

        let response = send(&app, generate(r#"{"kind":"image","prompt":"a cat"}"#)).await;
        assert_eq!(response.status(), expected);
        let json = body_json(response).await;
        assert_eq!(json["error"], "upstream_generation_error");
        assert!(
            json["message"]
                .as_str()
                .unwrap()
                .contains("provider said no")
        );
    }

    #[tokio::test]
    async fn test_generated_file_over_limit_returns_413() {
        let app = app(
            FilesConfig::default().with_max_upload_bytes(4),
            Some(Arc::new(StubGenerator::default())),
        );

        let response = send(
            &app,
            generate(r#"{"kind":"text","prompt":"x","persistAsKey":"out.txt"}"#),
        )
        .await;
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn test_request_larger_than_upload_limit_reaches_service() {
        let generator = Arc::new(StubGenerator::default());
        let app = app(
            FilesConfig::default().with_max_upload_bytes(16),
            Some(generator.clone()),
        );

        let body = format!(r#"{{"kind":"text","prompt":"{}"}}"#, "a".repeat(200));
        let response = send(&app, generate(&body)).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(generator.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_oversized_request_body_returns_413() {
        let generator = Arc::new(StubGenerator::default());
        let app = app(
            FilesConfig::default().with_max_prompt_chars(10),
            Some(generator.clone()),
        );

        let body = format!(r#"{{"kind":"text","prompt":"{}"}}"#, "a".repeat(8192));
        let response = send(&app, generate(&body)).await;
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        let json = body_json(response).await;
        assert_eq!(json["error"], "payload_too_large");
        assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_without_generator_returns_503() {
        let app = app(FilesConfig::default(), None);

        let response = send(&app, generate(r#"{"kind":"text","prompt":"x"}"#)).await;
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let json = body_json(response).await;
        assert_eq!(json["error"], "not_configured");
    }

    #[tokio::test]
    async fn test_get_on_generate_path_is_not_a_file() {
        let app = app(FilesConfig::default(), None);

        let response = send(
            &app,
            Request::builder()
                .uri("/v1/files/generate")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }
}
