//! Storage error types.

use files_shared::AppError;
use thiserror::Error;

/// Storage operation errors.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Object not found in storage.
    #[error("file not found: {key}")]
    NotFound {
        /// Storage key that was not found.
        key: String,
    },

    /// Invalid storage key or prefix.
    #[error("invalid storage key: {0}")]
    InvalidKey(String),

    /// Pagination cursor that this store did not issue.
    #[error("invalid cursor: {0}")]
    InvalidCursor(String),

    /// Storage provider configuration error.
    #[error("storage configuration error: {0}")]
    Configuration(String),

    /// Throttling, timeouts and other failures worth retrying later.
    #[error("storage temporarily unavailable: {0}")]
    Transient(String),

    /// OpenDAL operation error.
    #[error("storage operation failed: {0}")]
    Operation(String),
}

impl StorageError {
    /// Create a not found error.
    #[must_use]
    pub fn not_found(key: impl Into<String>) -> Self {
        Self::NotFound { key: key.into() }
    }

    /// Create an invalid key error.
    #[must_use]
    pub fn invalid_key(msg: impl Into<String>) -> Self {
        Self::InvalidKey(msg.into())
    }

    /// Create a configuration error.
    #[must_use]
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Create an operation error.
    #[must_use]
    pub fn operation(msg: impl Into<String>) -> Self {
        Self::Operation(msg.into())
    }

    /// Classify an OpenDAL error raised while working on `key`.
    #[must_use]
    pub fn from_opendal(err: &opendal::Error, key: &str) -> Self {
        match err.kind() {
            opendal::ErrorKind::NotFound => Self::not_found(key),
            opendal::ErrorKind::RateLimited => Self::Transient(err.to_string()),
            _ if err.is_temporary() => Self::Transient(err.to_string()),
            opendal::ErrorKind::ConfigInvalid => Self::Configuration(err.to_string()),
            _ => Self::Operation(err.to_string()),
        }
    }
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound { key } => Self::NotFound(key),
            StorageError::InvalidKey(msg) | StorageError::InvalidCursor(msg) => {
                Self::InvalidArgument(msg)
            }
            StorageError::Configuration(msg) => Self::Internal(msg),
            StorageError::Transient(message) => Self::UpstreamStore {
                message,
                transient: true,
            },
            StorageError::Operation(message) => Self::UpstreamStore {
                message,
                transient: false,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opendal_not_found_keeps_key() {
        let err = opendal::Error::new(opendal::ErrorKind::NotFound, "no such object");
        let mapped = StorageError::from_opendal(&err, "docs/a.txt");
        assert!(matches!(mapped, StorageError::NotFound { ref key } if key == "docs/a.txt"));
    }

    #[test]
    fn test_opendal_rate_limited_is_transient() {
        let err = opendal::Error::new(opendal::ErrorKind::RateLimited, "slow down");
        assert!(matches!(
            StorageError::from_opendal(&err, "k"),
            StorageError::Transient(_)
        ));
    }

    #[test]
    fn test_opendal_temporary_is_transient() {
        let err = opendal::Error::new(opendal::ErrorKind::Unexpected, "reset").set_temporary();
        assert!(matches!(
            StorageError::from_opendal(&err, "k"),
            StorageError::Transient(_)
        ));
    }

    #[test]
    fn test_opendal_permission_denied_is_operation() {
        let err = opendal::Error::new(opendal::ErrorKind::PermissionDenied, "denied");
        assert!(matches!(
            StorageError::from_opendal(&err, "k"),
            StorageError::Operation(_)
        ));
    }

    #[test]
    fn test_into_app_error() {
        assert_eq!(
            AppError::from(StorageError::not_found("a")).status_code(),
            404
        );
        assert_eq!(
            AppError::from(StorageError::invalid_key("bad")).status_code(),
            400
        );
        assert_eq!(
            AppError::from(StorageError::InvalidCursor("zz".into())).status_code(),
            400
        );
        assert_eq!(
            AppError::from(StorageError::Transient("throttled".into())).status_code(),
            503
        );
        assert_eq!(
            AppError::from(StorageError::operation("denied")).status_code(),
            502
        );
    }
}
