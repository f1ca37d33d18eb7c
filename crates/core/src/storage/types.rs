//! Stored object types.

use bytes::Bytes;
use chrono::{DateTime, Utc};

/// Content type recorded when the uploader does not send one.
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Metadata about a stored object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectMeta {
    /// Storage key.
    pub key: String,
    /// Size in bytes.
    pub size: u64,
    /// MIME type. `None` when the backend does not report it (S3 listings).
    pub content_type: Option<String>,
    /// Last write time, if the backend reports one.
    pub last_modified: Option<DateTime<Utc>>,
}

impl ObjectMeta {
    /// Content type, falling back to [`DEFAULT_CONTENT_TYPE`].
    #[must_use]
    pub fn content_type_or_default(&self) -> &str {
        self.content_type.as_deref().unwrap_or(DEFAULT_CONTENT_TYPE)
    }
}

/// An object's bytes together with its metadata.
#[derive(Debug, Clone)]
pub struct StoredObject {
    /// Object metadata.
    pub meta: ObjectMeta,
    /// Object content.
    pub content: Bytes,
}
