//! In-process object store.

use std::collections::BTreeMap;
use std::ops::Bound;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::Utc;
use files_shared::types::Page;
use tokio::sync::RwLock;

use super::ObjectStore;
use super::cursor;
use super::error::StorageError;
use super::types::{ObjectMeta, StoredObject};

/// Object store kept in a sorted map. Used in tests and local runs.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    objects: RwLock<BTreeMap<String, StoredObject>>,
}

impl InMemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored objects.
    pub async fn len(&self) -> usize {
        self.objects.read().await.len()
    }

    /// Whether the store holds no objects.
    pub async fn is_empty(&self) -> bool {
        self.objects.read().await.is_empty()
    }
}

#[async_trait]
impl ObjectStore for InMemoryStore {
    async fn put(
        &self,
        key: &str,
        content: Bytes,
        content_type: &str,
    ) -> Result<ObjectMeta, StorageError> {
        let meta = ObjectMeta {
            key: key.to_string(),
            size: content.len() as u64,
            content_type: Some(content_type.to_string()),
            last_modified: Some(Utc::now()),
        };
        self.objects.write().await.insert(
            key.to_string(),
            StoredObject {
                meta: meta.clone(),
                content,
            },
        );
        Ok(meta)
    }

    async fn get(&self, key: &str) -> Result<StoredObject, StorageError> {
        self.objects
            .read()
            .await
            .get(key)
            .cloned()
            .ok_or_else(|| StorageError::not_found(key))
    }

    async fn head(&self, key: &str) -> Result<ObjectMeta, StorageError> {
        self.objects
            .read()
            .await
            .get(key)
            .map(|object| object.meta.clone())
            .ok_or_else(|| StorageError::not_found(key))
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        self.objects.write().await.remove(key);
        Ok(())
    }

    async fn list(
        &self,
        prefix: &str,
        page_size: usize,
        cursor: Option<&str>,
    ) -> Result<Page<ObjectMeta>, StorageError> {
        let after = cursor.map(cursor::decode).transpose()?;
        let start = match after.as_deref() {
            Some(after) => Bound::Excluded(after),
            None => Bound::Included(prefix),
        };

        let objects = self.objects.read().await;
        let mut items: Vec<ObjectMeta> = objects
            .range::<str, _>((start, Bound::Unbounded))
            .skip_while(|(key, _)| !key.starts_with(prefix) && key.as_str() < prefix)
            .take_while(|(key, _)| key.starts_with(prefix))
            .take(page_size + 1)
            .map(|(_, object)| object.meta.clone())
            .collect();

        let next_cursor = if items.len() > page_size {
            items.truncate(page_size);
            items.last().map(|meta| cursor::encode(&meta.key))
        } else {
            None
        };

        Ok(Page::new(items, next_cursor))
    }
}
