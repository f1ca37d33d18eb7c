//! Object storage behind a vendor-agnostic adapter.
//!
//! Backends supported through Apache OpenDAL:
//! - S3-compatible: AWS S3, Cloudflare R2, MinIO, DigitalOcean Spaces
//! - Azure Blob Storage
//! - Local filesystem (development only)
//! - In-process memory
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      FileService                                │
//! ├─────────────────────────────────────────────────────────────────┤
//! │                 dyn ObjectStore (this module)                   │
//! ├──────────────────────────────┬──────────────────────────────────┤
//! │ OpendalStore                 │ InMemoryStore                    │
//! │  op.write_with / op.read     │  BTreeMap<String, StoredObject>  │
//! │  op.stat / op.delete         │                                  │
//! │  op.lister_with(..)          │                                  │
//! └──────────────────────────────┴──────────────────────────────────┘
//! ```

mod config;
pub mod cursor;
mod error;
pub mod key;
mod memory;
mod service;
mod types;

use async_trait::async_trait;
use bytes::Bytes;
use files_shared::types::Page;

pub use config::{StorageConfig, StorageProvider};
pub use error::StorageError;
pub use memory::InMemoryStore;
pub use service::OpendalStore;
pub use types::{DEFAULT_CONTENT_TYPE, ObjectMeta, StoredObject};

/// Key-addressed blob storage.
///
/// Keys are validated by callers before they reach a store. Listings are in
/// ascending byte order of key and cursors are opaque to callers.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Write `content` under `key`, replacing any existing object.
    async fn put(
        &self,
        key: &str,
        content: Bytes,
        content_type: &str,
    ) -> Result<ObjectMeta, StorageError>;

    /// Read an object and its metadata.
    async fn get(&self, key: &str) -> Result<StoredObject, StorageError>;

    /// Read an object's metadata.
    async fn head(&self, key: &str) -> Result<ObjectMeta, StorageError>;

    /// Remove an object. Removing a missing key succeeds.
    async fn delete(&self, key: &str) -> Result<(), StorageError>;

    /// List up to `page_size` objects whose key starts with `prefix`,
    /// resuming after `cursor` when given.
    async fn list(
        &self,
        prefix: &str,
        page_size: usize,
        cursor: Option<&str>,
    ) -> Result<Page<ObjectMeta>, StorageError>;
}
