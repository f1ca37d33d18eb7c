//! Generation error types.

use files_shared::AppError;
use thiserror::Error;

/// Failures raised by a content generator.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// Provider throttled the request (HTTP 429).
    #[error("generation provider rate limited: {0}")]
    RateLimited(String),

    /// Provider unreachable, timed out or failing (5xx).
    #[error("generation provider unavailable: {0}")]
    Unavailable(String),

    /// Provider refused the request, e.g. content policy (HTTP 400).
    #[error("generation request rejected: {0}")]
    Rejected(String),

    /// Any other provider error status.
    #[error("generation provider error: {0}")]
    Provider(String),

    /// Provider answered with a body we could not use.
    #[error("invalid generation response: {0}")]
    InvalidResponse(String),

    /// Generator could not be built.
    #[error("generation configuration error: {0}")]
    Configuration(String),
}

impl GenerationError {
    /// Whether retrying later could succeed.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::RateLimited(_) | Self::Unavailable(_))
    }

    /// Classify an error status returned by the provider.
    #[must_use]
    pub fn from_status(status: u16, message: String) -> Self {
        match status {
            429 => Self::RateLimited(message),
            400 => Self::Rejected(message),
            500..=599 => Self::Unavailable(message),
            _ => Self::Provider(format!("HTTP {status}: {message}")),
        }
    }

    /// Classify a transport failure.
    #[must_use]
    pub fn from_transport(err: &reqwest::Error) -> Self {
        if err.is_timeout() || err.is_connect() {
            Self::Unavailable(err.to_string())
        } else if err.is_decode() {
            Self::InvalidResponse(err.to_string())
        } else {
            Self::Provider(err.to_string())
        }
    }

    /// The provider-facing message without the variant prefix.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::RateLimited(m)
            | Self::Unavailable(m)
            | Self::Rejected(m)
            | Self::Provider(m)
            | Self::InvalidResponse(m)
            | Self::Configuration(m) => m,
        }
    }
}

impl From<GenerationError> for AppError {
    fn from(err: GenerationError) -> Self {
        match err {
            GenerationError::Configuration(msg) => Self::Internal(msg),
            other => Self::UpstreamGeneration {
                transient: other.is_transient(),
                message: other.message().to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(429, true)]
    #[case(500, true)]
    #[case(503, true)]
    #[case(400, false)]
    #[case(401, false)]
    #[case(404, false)]
    fn test_from_status_transience(#[case] status: u16, #[case] transient: bool) {
        assert_eq!(
            GenerationError::from_status(status, "boom".into()).is_transient(),
            transient
        );
    }

    #[test]
    fn test_rate_limit_maps_to_503() {
        let app: AppError = GenerationError::RateLimited("slow down".into()).into();
        assert_eq!(app.status_code(), 503);
        assert_eq!(app.error_code(), "upstream_generation_error");
    }

    #[test]
    fn test_rejection_maps_to_502_with_message() {
        let app: AppError =
            GenerationError::from_status(400, "content policy violation".into()).into();
        assert_eq!(app.status_code(), 502);
        assert_eq!(
            app.to_string(),
            "Upstream generation error: content policy violation"
        );
    }

    #[test]
    fn test_configuration_is_internal() {
        let app: AppError = GenerationError::Configuration("no tls".into()).into();
        assert_eq!(app.status_code(), 500);
    }
}
