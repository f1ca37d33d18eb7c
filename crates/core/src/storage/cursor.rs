//! Listing cursors.
//!
//! A cursor is the URL-safe base64 of the last key on the previous page.
//! Only stores create and read cursors; callers pass them back verbatim.

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;

use super::error::StorageError;

/// Encode the resume point after `last_key`.
#[must_use]
pub fn encode(last_key: &str) -> String {
    URL_SAFE_NO_PAD.encode(last_key.as_bytes())
}

/// Decode a cursor back into the key it resumes after.
pub fn decode(cursor: &str) -> Result<String, StorageError> {
    let bytes = URL_SAFE_NO_PAD
        .decode(cursor)
        .map_err(|_| StorageError::InvalidCursor(format!("malformed cursor: {cursor}")))?;
    let key = String::from_utf8(bytes)
        .map_err(|_| StorageError::InvalidCursor(format!("malformed cursor: {cursor}")))?;
    if key.is_empty() {
        return Err(StorageError::InvalidCursor("empty cursor".to_string()));
    }
    Ok(key)
}
