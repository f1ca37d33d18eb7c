//! Object store adapter implementation using Apache OpenDAL.

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use files_shared::types::Page;
use futures::TryStreamExt;
use opendal::layers::{RetryLayer, TracingLayer};
use opendal::{Entry, ErrorKind, Metadata, Operator, services};
use tracing::debug;

use super::ObjectStore;
use super::config::{StorageConfig, StorageProvider};
use super::cursor;
use super::error::StorageError;
use super::types::{ObjectMeta, StoredObject};

/// Object store backed by an OpenDAL operator.
pub struct OpendalStore {
    operator: Operator,
    config: StorageConfig,
}

impl OpendalStore {
    /// Create a new store from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage provider cannot be initialized.
    pub fn from_config(config: StorageConfig) -> Result<Self, StorageError> {
        let operator = Self::create_operator(&config)?;
        Ok(Self { operator, config })
    }

    /// Create OpenDAL operator from provider config.
    fn create_operator(config: &StorageConfig) -> Result<Operator, StorageError> {
        let root = config.root();

        let operator = match &config.provider {
            StorageProvider::S3 {
                endpoint,
                bucket,
                access_key_id,
                secret_access_key,
                region,
            } => {
                let builder = services::S3::default()
                    .root(&root)
                    .endpoint(endpoint)
                    .bucket(bucket)
                    .access_key_id(access_key_id)
                    .secret_access_key(secret_access_key)
                    .region(region);

                Operator::new(builder)
                    .map_err(|e| StorageError::configuration(e.to_string()))?
                    .finish()
            }
            StorageProvider::AzureBlob {
                account,
                access_key,
                container,
            } => {
                let builder = services::Azblob::default()
                    .root(&root)
                    .account_name(account)
                    .account_key(access_key)
                    .container(container);

                Operator::new(builder)
                    .map_err(|e| StorageError::configuration(e.to_string()))?
                    .finish()
            }
            StorageProvider::LocalFs { root: dir } => {
                let dir = dir.join(root.trim_matches('/'));
                let builder = services::Fs::default().root(
                    dir.to_str()
                        .ok_or_else(|| StorageError::configuration("invalid path"))?,
                );

                Operator::new(builder)
                    .map_err(|e| StorageError::configuration(e.to_string()))?
                    .finish()
            }
            StorageProvider::Memory => {
                let builder = services::Memory::default().root(&root);

                Operator::new(builder)
                    .map_err(|e| StorageError::configuration(e.to_string()))?
                    .finish()
            }
        };

        let operator = if config.max_retries > 0 {
            operator.layer(
                RetryLayer::new()
                    .with_max_times(config.max_retries)
                    .with_jitter(),
            )
        } else {
            operator
        };

        Ok(operator.layer(TracingLayer))
    }

    /// Get the storage provider name.
    #[must_use]
    pub fn provider_name(&self) -> &'static str {
        self.config.provider_name()
    }

    /// Get the bucket/container name.
    #[must_use]
    pub fn bucket(&self) -> &str {
        self.config.bucket()
    }

    /// Get the configuration.
    #[must_use]
    pub fn config(&self) -> &StorageConfig {
        &self.config
    }

    /// Whether the backend lists keys in order and can resume after a key.
    fn lists_in_order(&self) -> bool {
        self.operator.info().full_capability().list_with_start_after
    }

    /// Whether the backend persists a content type with each object.
    fn stores_content_type(&self) -> bool {
        self.operator.info().full_capability().write_with_content_type
    }
}

#[async_trait]
impl ObjectStore for OpendalStore {
    async fn put(
        &self,
        key: &str,
        content: Bytes,
        content_type: &str,
    ) -> Result<ObjectMeta, StorageError> {
        // Backends without content-type support reject the option outright.
        let write = self.operator.write_with(key, content);
        let write = if self.stores_content_type() {
            write.content_type(content_type)
        } else {
            write
        };
        write
            .await
            .map_err(|e| StorageError::from_opendal(&e, key))?;

        self.head(key).await
    }

    async fn get(&self, key: &str) -> Result<StoredObject, StorageError> {
        let meta = self.head(key).await?;
        let content = self
            .operator
            .read(key)
            .await
            .map_err(|e| StorageError::from_opendal(&e, key))?
            .to_bytes();

        Ok(StoredObject {
            meta: ObjectMeta {
                size: content.len() as u64,
                ..meta
            },
            content,
        })
    }

    async fn head(&self, key: &str) -> Result<ObjectMeta, StorageError> {
        let meta = self
            .operator
            .stat(key)
            .await
            .map_err(|e| StorageError::from_opendal(&e, key))?;

        if meta.is_dir() {
            return Err(StorageError::not_found(key));
        }

        Ok(object_meta(key, &meta))
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        match self.operator.delete(key).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::from_opendal(&e, key)),
        }
    }

    async fn list(
        &self,
        prefix: &str,
        page_size: usize,
        cursor: Option<&str>,
    ) -> Result<Page<ObjectMeta>, StorageError> {
        let after = cursor.map(cursor::decode).transpose()?;
        let ordered = self.lists_in_order();

        // List the deepest directory containing the prefix, then filter.
        let dir = prefix.rfind('/').map_or("/", |i| &prefix[..=i]);

        let mut request = self.operator.lister_with(dir).recursive(true);
        if ordered {
            if let Some(start) = after.as_deref().or_else(|| lower_bound(prefix)) {
                request = request.start_after(start);
            }
        }
        let mut lister = request
            .await
            .map_err(|e| StorageError::from_opendal(&e, dir))?;

        let mut entries: Vec<Entry> = Vec::new();
        while let Some(entry) = lister
            .try_next()
            .await
            .map_err(|e| StorageError::from_opendal(&e, dir))?
        {
            match scan(
                entry.path(),
                entry.metadata().is_dir(),
                prefix,
                after.as_deref(),
                ordered,
            ) {
                Scan::Skip => continue,
                Scan::Stop => break,
                Scan::Take => entries.push(entry),
            }
            if ordered && entries.len() > page_size {
                break;
            }
        }

        if !ordered {
            entries.sort_by(|a, b| a.path().cmp(b.path()));
        }

        let has_more = entries.len() > page_size;
        entries.truncate(page_size);
        let next_cursor = if has_more {
            entries.last().map(|entry| cursor::encode(entry.path()))
        } else {
            None
        };

        debug!(
            prefix,
            returned = entries.len(),
            has_more,
            ordered,
            "listed objects"
        );

        // Some backends (fs) list names only; stat items that lack metadata.
        let mut items = Vec::with_capacity(entries.len());
        for entry in &entries {
            if entry.metadata().last_modified().is_some() {
                items.push(object_meta(entry.path(), entry.metadata()));
            } else {
                match self.head(entry.path()).await {
                    Ok(meta) => items.push(meta),
                    // deleted since it was listed
                    Err(StorageError::NotFound { .. }) => {}
                    Err(e) => return Err(e),
                }
            }
        }

        Ok(Page::new(items, next_cursor))
    }
}

/// Decision for one listed path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scan {
    Take,
    Skip,
    /// Ordered listing has moved past every key under the prefix.
    Stop,
}

fn scan(path: &str, is_dir: bool, prefix: &str, after: Option<&str>, ordered: bool) -> Scan {
    if ordered && path > prefix && !path.starts_with(prefix) {
        return Scan::Stop;
    }
    if is_dir || !path.starts_with(prefix) {
        return Scan::Skip;
    }
    if after.is_some_and(|after| path <= after) {
        return Scan::Skip;
    }
    Scan::Take
}

/// Largest key that sorts before every key starting with `prefix`: the
/// prefix minus its last character. `None` when that leaves nothing.
fn lower_bound(prefix: &str) -> Option<&str> {
    let (i, _) = prefix.char_indices().last()?;
    (i > 0).then(|| &prefix[..i])
}

/// Convert OpenDAL metadata into an [`ObjectMeta`].
fn object_meta(key: &str, meta: &Metadata) -> ObjectMeta {
    ObjectMeta {
        key: key.to_string(),
        size: meta.content_length(),
        content_type: meta.content_type().map(String::from),
        last_modified: meta
            .last_modified()
            .and_then(|ts| ts.to_string().parse::<DateTime<Utc>>().ok()),
    }
}
