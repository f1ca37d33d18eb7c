//! Storage configuration types.

pub use files_shared::config::StorageProvider;
use files_shared::config::StorageSettings;

/// Storage service configuration.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Storage provider configuration.
    pub provider: StorageProvider,
    /// Path inside the bucket under which every key lives.
    pub root_prefix: Option<String>,
    /// Retry attempts for transient failures (0 disables retries).
    pub max_retries: usize,
}

impl StorageConfig {
    /// Default retry attempts.
    pub const DEFAULT_MAX_RETRIES: usize = 3;

    /// Create a new storage config with default settings.
    #[must_use]
    pub fn new(provider: StorageProvider) -> Self {
        Self {
            provider,
            root_prefix: None,
            max_retries: Self::DEFAULT_MAX_RETRIES,
        }
    }

    /// Set the root prefix.
    #[must_use]
    pub fn with_root_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.root_prefix = Some(prefix.into());
        self
    }

    /// Set retry attempts.
    #[must_use]
    pub fn with_max_retries(mut self, retries: usize) -> Self {
        self.max_retries = retries;
        self
    }

    /// Get the provider name for logs.
    #[must_use]
    pub fn provider_name(&self) -> &'static str {
        match self.provider {
            StorageProvider::S3 { .. } => "s3",
            StorageProvider::AzureBlob { .. } => "azure_blob",
            StorageProvider::LocalFs { .. } => "local",
            StorageProvider::Memory => "memory",
        }
    }

    /// Get the bucket/container name.
    #[must_use]
    pub fn bucket(&self) -> &str {
        match &self.provider {
            StorageProvider::S3 { bucket, .. } => bucket,
            StorageProvider::AzureBlob { container, .. } => container,
            StorageProvider::LocalFs { root } => root.to_str().unwrap_or("local"),
            StorageProvider::Memory => "memory",
        }
    }

    /// Root prefix normalised for OpenDAL (`/` when unset).
    #[must_use]
    pub fn root(&self) -> String {
        match self.root_prefix.as_deref().map(|p| p.trim_matches('/')) {
            Some(prefix) if !prefix.is_empty() => format!("/{prefix}/"),
            _ => "/".to_string(),
        }
    }
}

impl From<&StorageSettings> for StorageConfig {
    fn from(settings: &StorageSettings) -> Self {
        Self {
            provider: settings.provider.clone(),
            root_prefix: settings.root_prefix.clone(),
            max_retries: settings.max_retries,
        }
    }
}
