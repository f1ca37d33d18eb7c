//! File service implementation.

use std::sync::Arc;

use files_shared::types::{Page, PageRequest};
use files_shared::{AppError, AppResult};
use tracing::{debug, info};

use super::types::{FilesConfig, GenerateInput, GeneratedFile, UploadInput, UploadOutcome};
use crate::generation::{AudioFormat, GenerationKind, Generator};
use crate::storage::key::{self, validate_key, validate_prefix};
use crate::storage::{DEFAULT_CONTENT_TYPE, ObjectMeta, ObjectStore, StorageError, StoredObject};

/// File operations over an object store and an optional generator.
pub struct FileService {
    store: Arc<dyn ObjectStore>,
    generator: Option<Arc<dyn Generator>>,
    config: FilesConfig,
}

impl FileService {
    /// Create a service without generation support.
    #[must_use]
    pub fn new(store: Arc<dyn ObjectStore>, config: FilesConfig) -> Self {
        Self {
            store,
            generator: None,
            config,
        }
    }

    /// Attach a content generator.
    #[must_use]
    pub fn with_generator(mut self, generator: Arc<dyn Generator>) -> Self {
        self.generator = Some(generator);
        self
    }

    /// Service limits.
    #[must_use]
    pub fn config(&self) -> &FilesConfig {
        &self.config
    }

    /// List objects under `prefix`, one page at a time.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` for a bad prefix or cursor.
    pub async fn list(&self, prefix: &str, page: &PageRequest) -> AppResult<Page<ObjectMeta>> {
        validate_prefix(prefix)?;

        let result = self
            .store
            .list(prefix, page.limit(), page.cursor.as_deref())
            .await?;

        debug!(
            prefix,
            count = result.items.len(),
            more = result.next_cursor.is_some(),
            "listed files"
        );
        Ok(result)
    }

    /// Store an object, replacing any existing one.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` for a bad key and `PayloadTooLarge` when the
    /// content exceeds the limit. Nothing is written in either case.
    pub async fn upload(&self, input: UploadInput) -> AppResult<UploadOutcome> {
        validate_key(&input.key)?;
        self.check_size(input.content.len())?;

        let created = self.is_absent(&input.key).await?;

        let content_type = input
            .content_type
            .as_deref()
            .map(str::trim)
            .filter(|ct| !ct.is_empty())
            .unwrap_or(DEFAULT_CONTENT_TYPE);

        let meta = self
            .store
            .put(&input.key, input.content, content_type)
            .await?;

        info!(key = %meta.key, size = meta.size, created, "file uploaded");
        Ok(UploadOutcome { meta, created })
    }

    /// Read an object's metadata.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when the key is absent.
    pub async fn describe(&self, key: &str) -> AppResult<ObjectMeta> {
        validate_key(key)?;
        Ok(self.store.head(key).await?)
    }

    /// Read an object with its metadata.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when the key is absent.
    pub async fn download(&self, key: &str) -> AppResult<StoredObject> {
        validate_key(key)?;
        Ok(self.store.get(key).await?)
    }

    /// Remove an object. Removing an absent key succeeds.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` for a bad key or a store error.
    pub async fn delete(&self, key: &str) -> AppResult<()> {
        validate_key(key)?;
        self.store.delete(key).await?;
        info!(key, "file deleted");
        Ok(())
    }

    /// Generate content and optionally store it.
    ///
    /// Prompt and key are validated before the provider is called. The
    /// provider call is not retried.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` for a bad prompt, key or extension,
    /// `NotConfigured` without a generator, `UpstreamGeneration` on provider
    /// failure and `PayloadTooLarge` when the artifact cannot be stored.
    pub async fn generate(&self, input: GenerateInput) -> AppResult<GeneratedFile> {
        self.check_prompt(&input.prompt)?;

        let mut audio_format = AudioFormat::default();
        if let Some(persist_key) = input.persist_as_key.as_deref() {
            validate_key(persist_key)?;
            let ext = key::extension(persist_key).unwrap_or_default();
            if !input.kind.accepts_extension(&ext) {
                return Err(AppError::invalid_argument(format!(
                    "key '{persist_key}' must end with one of: .{}",
                    input.kind.extensions().join(", .")
                )));
            }
            if let Some(format) = AudioFormat::from_extension(&ext) {
                audio_format = format;
            }
        }

        let generator = self
            .generator
            .as_ref()
            .ok_or_else(|| AppError::NotConfigured("content generation".to_string()))?;

        debug!(kind = %input.kind, prompt_chars = input.prompt.chars().count(), "generating file");
        let generated = match input.kind {
            GenerationKind::Text => generator.generate_text(&input.prompt).await?,
            GenerationKind::Image => generator.generate_image(&input.prompt).await?,
            GenerationKind::Audio => {
                generator
                    .generate_audio(&input.prompt, audio_format)
                    .await?
            }
        };

        let stored = match input.persist_as_key {
            Some(persist_key) => {
                self.check_size(generated.bytes.len())?;
                let created = self.is_absent(&persist_key).await?;
                let meta = self
                    .store
                    .put(
                        &persist_key,
                        generated.bytes.clone(),
                        &generated.content_type,
                    )
                    .await?;
                info!(key = %meta.key, kind = %input.kind, size = meta.size, created, "generated file stored");
                Some(UploadOutcome { meta, created })
            }
            None => None,
        };

        Ok(GeneratedFile {
            kind: input.kind,
            content: generated.bytes,
            content_type: generated.content_type,
            stored,
        })
    }

    /// Whether `key` has no object yet. Decides 201 vs 200 only.
    async fn is_absent(&self, key: &str) -> AppResult<bool> {
        match self.store.head(key).await {
            Ok(_) => Ok(false),
            Err(StorageError::NotFound { .. }) => Ok(true),
            Err(e) => Err(e.into()),
        }
    }

    fn check_size(&self, len: usize) -> AppResult<()> {
        let size = len as u64;
        if size > self.config.max_upload_bytes {
            return Err(AppError::payload_too_large(
                size,
                self.config.max_upload_bytes,
            ));
        }
        Ok(())
    }

    fn check_prompt(&self, prompt: &str) -> AppResult<()> {
        if prompt.trim().is_empty() {
            return Err(AppError::invalid_argument("prompt must not be blank"));
        }
        let chars = prompt.chars().count();
        if chars > self.config.max_prompt_chars {
            return Err(AppError::invalid_argument(format!(
                "prompt has {chars} characters, maximum is {}",
                self.config.max_prompt_chars
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "service_tests.rs"]
mod tests;
