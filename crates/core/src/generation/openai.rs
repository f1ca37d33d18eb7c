//! OpenAI-compatible generation client.

use std::time::Duration;

use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use files_shared::config::GenerationSettings;
use reqwest::header::CONTENT_TYPE;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::Generator;
use super::error::GenerationError;
use super::types::{AudioFormat, GeneratedContent};

const SYSTEM_PROMPT: &str =
    "You are an autocompletion tool that produces text files given constraints.";
const IMAGE_SIZE: &str = "1024x1024";
const IMAGE_QUALITY: &str = "standard";

/// Connection and model settings for [`OpenAiGenerator`].
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    /// Bearer token.
    pub api_key: String,
    /// API root without trailing slash.
    pub base_url: String,
    /// Chat completion model.
    pub text_model: String,
    /// Image model.
    pub image_model: String,
    /// Speech model.
    pub speech_model: String,
    /// Speech voice.
    pub voice: String,
    /// Completion token cap.
    pub max_tokens: u32,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl OpenAiConfig {
    /// Build from settings. Returns `None` when no API key is configured.
    #[must_use]
    pub fn from_settings(settings: &GenerationSettings) -> Option<Self> {
        let api_key = settings
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())?;

        Some(Self {
            api_key: api_key.to_string(),
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            text_model: settings.text_model.clone(),
            image_model: settings.image_model.clone(),
            speech_model: settings.speech_model.clone(),
            voice: settings.voice.clone(),
            max_tokens: settings.max_tokens,
            timeout: Duration::from_secs(settings.timeout_secs),
        })
    }
}

// ============================================================================
// Wire types
// ============================================================================

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    max_tokens: u32,
    n: u8,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

#[derive(Serialize)]
struct ImageRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    size: &'static str,
    quality: &'static str,
    n: u8,
    response_format: &'static str,
}

#[derive(Deserialize)]
struct ImageResponse {
    data: Vec<ImageData>,
}

#[derive(Deserialize)]
struct ImageData {
    b64_json: Option<String>,
}

#[derive(Serialize)]
struct SpeechRequest<'a> {
    model: &'a str,
    voice: &'a str,
    input: &'a str,
    response_format: &'static str,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

// ============================================================================
// Client
// ============================================================================

/// [`Generator`] backed by the OpenAI REST API.
pub struct OpenAiGenerator {
    client: reqwest::Client,
    config: OpenAiConfig,
}

impl OpenAiGenerator {
    /// Create a generator with its own HTTP client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: OpenAiConfig) -> Result<Self, GenerationError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| GenerationError::Configuration(e.to_string()))?;
        Ok(Self { client, config })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{path}", self.config.base_url)
    }

    /// POST a JSON body and return the successful response.
    async fn post<T: Serialize + Sync>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<reqwest::Response, GenerationError> {
        let response = self
            .client
            .post(self.url(path))
            .bearer_auth(&self.config.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| GenerationError::from_transport(&e))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorEnvelope>(&text)
            .map(|envelope| envelope.error.message)
            .unwrap_or(text);
        warn!(status = status.as_u16(), path, message = %message, "generation provider returned error");
        Err(GenerationError::from_status(status.as_u16(), message))
    }
}

#[async_trait]
impl Generator for OpenAiGenerator {
    async fn generate_text(&self, prompt: &str) -> Result<GeneratedContent, GenerationError> {
        let request = ChatRequest {
            model: &self.config.text_model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            max_tokens: self.config.max_tokens,
            n: 1,
        };

        let response: ChatResponse = self
            .post("chat/completions", &request)
            .await?
            .json()
            .await
            .map_err(|e| GenerationError::InvalidResponse(e.to_string()))?;

        let content = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| GenerationError::InvalidResponse("no completion returned".into()))?;

        debug!(model = %self.config.text_model, len = content.len(), "text generated");
        Ok(GeneratedContent::new(content, "text/plain"))
    }

    async fn generate_image(&self, prompt: &str) -> Result<GeneratedContent, GenerationError> {
        let request = ImageRequest {
            model: &self.config.image_model,
            prompt,
            size: IMAGE_SIZE,
            quality: IMAGE_QUALITY,
            n: 1,
            response_format: "b64_json",
        };

        let response: ImageResponse = self
            .post("images/generations", &request)
            .await?
            .json()
            .await
            .map_err(|e| GenerationError::InvalidResponse(e.to_string()))?;

        let encoded = response
            .data
            .into_iter()
            .next()
            .and_then(|image| image.b64_json)
            .ok_or_else(|| GenerationError::InvalidResponse("no image returned".into()))?;
        let bytes = STANDARD
            .decode(encoded.as_bytes())
            .map_err(|e| GenerationError::InvalidResponse(format!("image payload: {e}")))?;

        debug!(model = %self.config.image_model, size = bytes.len(), "image generated");
        Ok(GeneratedContent::new(bytes, "image/png"))
    }

    async fn generate_audio(
        &self,
        prompt: &str,
        format: AudioFormat,
    ) -> Result<GeneratedContent, GenerationError> {
        let request = SpeechRequest {
            model: &self.config.speech_model,
            voice: &self.config.voice,
            input: prompt,
            response_format: format.as_str(),
        };

        let response = self.post("audio/speech", &request).await?;
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .filter(|value| !value.is_empty())
            .unwrap_or(format.mime_type())
            .to_string();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| GenerationError::from_transport(&e))?;

        debug!(model = %self.config.speech_model, format = format.as_str(), size = bytes.len(), "audio generated");
        Ok(GeneratedContent::new(bytes, content_type))
    }
}
