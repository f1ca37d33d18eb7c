//! Application-wide error types.

use thiserror::Error;

/// Result type alias using `AppError`.
pub type AppResult<T> = Result<T, AppError>;

/// Application error types.
#[derive(Debug, Error)]
pub enum AppError {
    /// Client-supplied input failed validation.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Referenced key is absent.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Payload exceeds the configured limit.
    #[error("Payload too large: {size} bytes exceeds maximum {max} bytes")]
    PayloadTooLarge {
        /// Actual payload size.
        size: u64,
        /// Maximum allowed size.
        max: u64,
    },

    /// AI provider failure.
    #[error("Upstream generation error: {message}")]
    UpstreamGeneration {
        /// Provider message, passed through.
        message: String,
        /// Whether the failure is expected to clear on its own.
        transient: bool,
    },

    /// Object store failure not classifiable as not-found.
    #[error("Upstream store error: {message}")]
    UpstreamStore {
        /// Store message.
        message: String,
        /// Whether the failure is expected to clear on its own.
        transient: bool,
    },

    /// A collaborator required by the operation is not configured.
    #[error("Not configured: {0}")]
    NotConfigured(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Creates an invalid argument error.
    #[must_use]
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Creates a not found error.
    #[must_use]
    pub fn not_found(key: impl Into<String>) -> Self {
        Self::NotFound(key.into())
    }

    /// Creates a payload too large error.
    #[must_use]
    pub fn payload_too_large(size: u64, max: u64) -> Self {
        Self::PayloadTooLarge { size, max }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::InvalidArgument(_) => 400,
            Self::NotFound(_) => 404,
            Self::PayloadTooLarge { .. } => 413,
            Self::UpstreamGeneration { transient, .. } | Self::UpstreamStore { transient, .. } => {
                if *transient {
                    503
                } else {
                    502
                }
            }
            Self::NotConfigured(_) => 503,
            Self::Internal(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidArgument(_) => "invalid_argument",
            Self::NotFound(_) => "not_found",
            Self::PayloadTooLarge { .. } => "payload_too_large",
            Self::UpstreamGeneration { .. } => "upstream_generation_error",
            Self::UpstreamStore { .. } => "upstream_store_error",
            Self::NotConfigured(_) => "not_configured",
            Self::Internal(_) => "internal_error",
        }
    }

    /// Whether this error is the caller's fault.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        self.status_code() < 500
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
