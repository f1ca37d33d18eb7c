//! File service input and output types.

use bytes::Bytes;
use files_shared::config::{GenerationSettings, StorageSettings};

use crate::generation::GenerationKind;
use crate::storage::ObjectMeta;

/// Limits applied by the file service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilesConfig {
    /// Largest accepted object, in bytes.
    pub max_upload_bytes: u64,
    /// Longest accepted generation prompt, in characters.
    pub max_prompt_chars: usize,
}

impl FilesConfig {
    /// Default upload limit (10 MiB).
    pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;
    /// Default prompt limit.
    pub const DEFAULT_MAX_PROMPT_CHARS: usize = 4000;

    /// Build from the storage and generation settings.
    #[must_use]
    pub fn from_settings(storage: &StorageSettings, generation: &GenerationSettings) -> Self {
        Self {
            max_upload_bytes: storage.max_upload_bytes,
            max_prompt_chars: generation.max_prompt_chars,
        }
    }

    /// Set the upload limit.
    #[must_use]
    pub fn with_max_upload_bytes(mut self, max: u64) -> Self {
        self.max_upload_bytes = max;
        self
    }

    /// Set the prompt limit.
    #[must_use]
    pub fn with_max_prompt_chars(mut self, max: usize) -> Self {
        self.max_prompt_chars = max;
        self
    }
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            max_upload_bytes: Self::DEFAULT_MAX_UPLOAD_BYTES,
            max_prompt_chars: Self::DEFAULT_MAX_PROMPT_CHARS,
        }
    }
}

/// Input for storing an object.
#[derive(Debug, Clone)]
pub struct UploadInput {
    /// Destination key.
    pub key: String,
    /// Object bytes.
    pub content: Bytes,
    /// MIME type; `application/octet-stream` when absent.
    pub content_type: Option<String>,
}

/// Result of an upload.
#[derive(Debug, Clone)]
pub struct UploadOutcome {
    /// Metadata of the stored object.
    pub meta: ObjectMeta,
    /// Whether the key was absent before the write. Informational only.
    pub created: bool,
}

/// Input for generating a file.
#[derive(Debug, Clone)]
pub struct GenerateInput {
    /// Artifact kind.
    pub kind: GenerationKind,
    /// Prompt sent to the provider.
    pub prompt: String,
    /// Key to store the artifact under, if any.
    pub persist_as_key: Option<String>,
}

/// A generated artifact.
#[derive(Debug, Clone)]
pub struct GeneratedFile {
    /// Artifact kind.
    pub kind: GenerationKind,
    /// Generated bytes.
    pub content: Bytes,
    /// MIME type reported by the generator.
    pub content_type: String,
    /// Write result when the artifact was persisted.
    pub stored: Option<UploadOutcome>,
}

impl GeneratedFile {
    /// Human-readable summary for persisted artifacts.
    #[must_use]
    pub fn message(&self) -> Option<String> {
        self.stored.as_ref().map(|outcome| {
            if outcome.created {
                format!(
                    "New {} file generated and uploaded at path: {}",
                    self.kind, outcome.meta.key
                )
            } else {
                format!(
                    "{} file generated and replaced existing file at path: {}",
                    capitalize(self.kind.as_str()),
                    outcome.meta.key
                )
            }
        })
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}
