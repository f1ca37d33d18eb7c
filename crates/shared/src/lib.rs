//! Shared types, errors, and configuration for the Files API.
//!
//! This crate provides common types used across all other crates:
//! - Cursor pagination types for list endpoints
//! - Application-wide error taxonomy
//! - Configuration management

pub mod config;
pub mod error;
pub mod types;

pub use config::AppConfig;
pub use error::{AppError, AppResult};
