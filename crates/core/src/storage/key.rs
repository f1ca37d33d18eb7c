//! Object key and listing prefix validation.
//!
//! The object store treats keys as opaque strings, so nothing below it stops
//! `../etc/passwd` or `/abs/path` from being stored. These checks run before
//! any adapter call.

use super::error::StorageError;

/// Longest accepted key, in UTF-8 bytes.
pub const MAX_KEY_BYTES: usize = 1024;

/// Validate an object key.
///
/// A key is non-empty, at most [`MAX_KEY_BYTES`] bytes, has no leading or
/// trailing `/`, no empty or `..` segments and no control characters.
pub fn validate_key(key: &str) -> Result<(), StorageError> {
    if key.is_empty() {
        return Err(StorageError::invalid_key("key must not be empty"));
    }
    if key.ends_with('/') {
        return Err(StorageError::invalid_key(format!(
            "key must not end with '/': {key}"
        )));
    }
    validate_path(key, "key")?;
    if key.split('/').any(str::is_empty) {
        return Err(StorageError::invalid_key(format!(
            "key must not contain empty segments: {key}"
        )));
    }
    Ok(())
}

/// Validate a listing prefix. The empty prefix lists everything.
pub fn validate_prefix(prefix: &str) -> Result<(), StorageError> {
    if prefix.is_empty() {
        return Ok(());
    }
    validate_path(prefix, "prefix")
}

fn validate_path(path: &str, what: &str) -> Result<(), StorageError> {
    if path.len() > MAX_KEY_BYTES {
        return Err(StorageError::invalid_key(format!(
            "{what} exceeds {MAX_KEY_BYTES} bytes"
        )));
    }
    if path.starts_with('/') {
        return Err(StorageError::invalid_key(format!(
            "{what} must be relative: {path}"
        )));
    }
    if path.split('/').any(|segment| segment == "..") {
        return Err(StorageError::invalid_key(format!(
            "{what} must not contain '..' segments: {path}"
        )));
    }
    if path.chars().any(char::is_control) {
        return Err(StorageError::invalid_key(format!(
            "{what} must not contain control characters"
        )));
    }
    Ok(())
}

/// Lowercased extension of the last path segment, if any.
#[must_use]
pub fn extension(key: &str) -> Option<String> {
    let name = key.rsplit('/').next().unwrap_or(key);
    name.rsplit_once('.')
        .map(|(stem, ext)| (stem, ext.to_ascii_lowercase()))
        .filter(|(stem, ext)| !stem.is_empty() && !ext.is_empty())
        .map(|(_, ext)| ext)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("a")]
    #[case("report.pdf")]
    #[case("nested/path/to/file.txt")]
    #[case("dots..inside.name")]
    #[case(".hidden")]
    #[case("日本語/ファイル.txt")]
    fn test_valid_keys(#[case] key: &str) {
        assert!(validate_key(key).is_ok(), "expected {key:?} to be valid");
    }

    #[rstest]
    #[case("")]
    #[case("/absolute.txt")]
    #[case("dir/")]
    #[case("../escape.txt")]
    #[case("a/../b.txt")]
    #[case("a/..")]
    #[case("a//b")]
    #[case("bad\nname")]
    fn test_invalid_keys(#[case] key: &str) {
        let err = validate_key(key).unwrap_err();
        assert!(matches!(err, StorageError::InvalidKey(_)));
    }

    #[test]
    fn test_key_length_limit_is_bytes() {
        let ok = "a".repeat(MAX_KEY_BYTES);
        assert!(validate_key(&ok).is_ok());

        let too_long = "a".repeat(MAX_KEY_BYTES + 1);
        assert!(validate_key(&too_long).is_err());

        // 3 bytes per char: 342 chars = 1026 bytes
        let multibyte = "語".repeat(342);
        assert!(validate_key(&multibyte).is_err());
    }

    #[rstest]
    #[case("")]
    #[case("docs")]
    #[case("docs/")]
    #[case("docs/2024/")]
    fn test_valid_prefixes(#[case] prefix: &str) {
        assert!(validate_prefix(prefix).is_ok());
    }

    #[rstest]
    #[case("/docs")]
    #[case("../")]
    #[case("docs/../../")]
    fn test_invalid_prefixes(#[case] prefix: &str) {
        assert!(validate_prefix(prefix).is_err());
    }

    #[rstest]
    #[case("file.txt", Some("txt"))]
    #[case("dir/Image.PNG", Some("png"))]
    #[case("archive.tar.gz", Some("gz"))]
    #[case("noext", None)]
    #[case("dir.d/noext", None)]
    #[case(".bashrc", None)]
    #[case("trailing.", None)]
    fn test_extension(#[case] key: &str, #[case] expected: Option<&str>) {
        assert_eq!(extension(key).as_deref(), expected);
    }
}

#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    // Segments made of safe characters never trip validation.
    proptest! {
        #[test]
        fn prop_safe_segments_are_valid(
            segments in prop::collection::vec("[a-zA-Z0-9_-][a-zA-Z0-9._-]{0,20}", 1..6),
        ) {
            let key = segments.join("/");
            prop_assume!(!key.split('/').any(|s| s == ".."));
            prop_assert!(validate_key(&key).is_ok());
        }
    }

    // Any key containing a `..` segment is rejected, wherever it sits.
    proptest! {
        #[test]
        fn prop_parent_segment_rejected(
            before in prop::collection::vec("[a-z]{1,8}", 0..4),
            after in prop::collection::vec("[a-z]{1,8}", 0..4),
        ) {
            let mut parts = before.clone();
            parts.push("..".to_string());
            parts.extend(after.iter().cloned());
            let key = parts.join("/");
            prop_assert!(validate_key(&key).is_err());
            prop_assert!(validate_prefix(&key).is_err());
        }
    }

    // A leading slash is always rejected.
    proptest! {
        #[test]
        fn prop_leading_slash_rejected(rest in "[a-z0-9/._-]{0,40}") {
            let key = format!("/{rest}");
            prop_assert!(validate_key(&key).is_err());
            prop_assert!(validate_prefix(&key).is_err());
        }
    }
}
