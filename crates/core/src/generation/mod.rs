//! AI content generation.
//!
//! [`Generator`] is the narrow seam the file service calls. [`OpenAiGenerator`]
//! implements it against an OpenAI-compatible HTTP API; tests substitute a stub.

mod error;
mod openai;
mod types;

use async_trait::async_trait;

pub use error::GenerationError;
pub use openai::{OpenAiConfig, OpenAiGenerator};
pub use types::{AudioFormat, GeneratedContent, GenerationKind};

/// Produces file content from a prompt.
#[async_trait]
pub trait Generator: Send + Sync {
    /// Generate a plain-text document.
    async fn generate_text(&self, prompt: &str) -> Result<GeneratedContent, GenerationError>;

    /// Generate an image.
    async fn generate_image(&self, prompt: &str) -> Result<GeneratedContent, GenerationError>;

    /// Synthesize speech for `prompt` in the requested encoding.
    async fn generate_audio(
        &self,
        prompt: &str,
        format: AudioFormat,
    ) -> Result<GeneratedContent, GenerationError>;
}
