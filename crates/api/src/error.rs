//! Mapping of application errors onto HTTP responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use files_shared::AppError;
use serde::Serialize;
use tracing::{error, warn};

/// JSON error body: `{"error": "<code>", "message": "<text>"}`.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Stable machine-readable code.
    pub error: &'static str,
    /// Human-readable message.
    pub message: String,
}

/// Handler error. Anything convertible into [`AppError`] converts into this.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl ApiError {
    /// HTTP status for the wrapped error.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        StatusCode::from_u16(self.0.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Log the error at a level matching its status.
    pub fn log(&self) {
        let status = self.status().as_u16();
        if self.0.is_client_error() {
            warn!(status, code = self.0.error_code(), error = %self.0, "request failed");
        } else {
            error!(status, code = self.0.error_code(), error = %self.0, "request failed");
        }
    }
}

impl<E> From<E> for ApiError
where
    E: Into<AppError>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        self.log();
        let status = self.status();
        let body = ErrorBody {
            error: self.0.error_code(),
            message: self.0.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

/// Result type for handlers.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use rstest::rstest;

    #[rstest]
    #[case(AppError::invalid_argument("bad"), 400, "invalid_argument")]
    #[case(AppError::not_found("a.txt"), 404, "not_found")]
    #[case(AppError::payload_too_large(11, 10), 413, "payload_too_large")]
    #[case(AppError::NotConfigured("generation".into()), 503, "not_configured")]
    #[case(
        AppError::UpstreamStore { message: "throttled".into(), transient: true },
        503,
        "upstream_store_error"
    )]
    #[case(
        AppError::UpstreamGeneration { message: "policy".into(), transient: false },
        502,
        "upstream_generation_error"
    )]
    #[tokio::test]
    async fn test_error_response(
        #[case] err: AppError,
        #[case] status: u16,
        #[case] code: &str,
    ) {
        let message = err.to_string();
        let response = ApiError(err).into_response();
        assert_eq!(response.status().as_u16(), status);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], code);
        assert_eq!(json["message"], message);
    }
}
