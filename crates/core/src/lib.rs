//! Core file logic for the Files API.
//!
//! This crate has ZERO web framework dependencies. HTTP extraction and
//! response mapping live in `files-api`.
//!
//! # Modules
//!
//! - `storage` - Object store adapters (OpenDAL, in-memory), key and cursor rules
//! - `generation` - AI content generation adapter
//! - `files` - File operations, validation and error mapping

pub mod files;
pub mod generation;
pub mod storage;
