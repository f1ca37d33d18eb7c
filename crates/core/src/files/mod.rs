//! File resource operations.
//!
//! [`FileService`] validates requests, delegates to the object store and the
//! generator, and maps their failures into [`files_shared::AppError`]:
//! - List with cursor pagination
//! - Upload, describe, download and delete by key
//! - Generate content with AI, optionally persisting it

mod service;
mod types;

pub use service::FileService;
pub use types::{FilesConfig, GenerateInput, GeneratedFile, UploadInput, UploadOutcome};
