//! Generation request and result types.

use std::fmt;
use std::str::FromStr;

use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// What kind of artifact to generate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum GenerationKind {
    /// Plain text, stored as `.txt`.
    Text,
    /// Raster image, stored as `.png`, `.jpg` or `.jpeg`.
    Image,
    /// Spoken audio.
    Audio,
}

impl GenerationKind {
    /// Canonical lowercase name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Image => "image",
            Self::Audio => "audio",
        }
    }

    /// Extensions a persisted artifact of this kind may use.
    #[must_use]
    pub fn extensions(self) -> &'static [&'static str] {
        match self {
            Self::Text => &["txt"],
            Self::Image => &["png", "jpg", "jpeg"],
            Self::Audio => &["mp3", "opus", "aac", "flac", "wav", "pcm"],
        }
    }

    /// Whether `ext` (lowercase, without the dot) fits this kind.
    #[must_use]
    pub fn accepts_extension(self, ext: &str) -> bool {
        self.extensions().contains(&ext)
    }
}

impl fmt::Display for GenerationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GenerationKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "image" => Ok(Self::Image),
            "audio" | "text-to-speech" => Ok(Self::Audio),
            other => Err(format!(
                "unsupported kind '{other}', expected one of: text, image, audio"
            )),
        }
    }
}

impl TryFrom<String> for GenerationKind {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<GenerationKind> for String {
    fn from(kind: GenerationKind) -> Self {
        kind.as_str().to_string()
    }
}

/// Output encoding for speech synthesis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AudioFormat {
    /// MPEG layer 3, the default.
    #[default]
    Mp3,
    /// Opus in Ogg.
    Opus,
    /// AAC.
    Aac,
    /// Lossless FLAC.
    Flac,
    /// Uncompressed WAV.
    Wav,
    /// Raw 24kHz 16-bit PCM.
    Pcm,
}

impl AudioFormat {
    /// Pick the format named by a file extension.
    #[must_use]
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "mp3" => Some(Self::Mp3),
            "opus" => Some(Self::Opus),
            "aac" => Some(Self::Aac),
            "flac" => Some(Self::Flac),
            "wav" => Some(Self::Wav),
            "pcm" => Some(Self::Pcm),
            _ => None,
        }
    }

    /// Wire name used by the speech API.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Mp3 => "mp3",
            Self::Opus => "opus",
            Self::Aac => "aac",
            Self::Flac => "flac",
            Self::Wav => "wav",
            Self::Pcm => "pcm",
        }
    }

    /// MIME type of the encoded audio.
    #[must_use]
    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Mp3 => "audio/mpeg",
            Self::Opus => "audio/opus",
            Self::Aac => "audio/aac",
            Self::Flac => "audio/flac",
            Self::Wav => "audio/wav",
            Self::Pcm => "audio/pcm",
        }
    }
}

/// Bytes produced by a generator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedContent {
    /// Generated payload.
    pub bytes: Bytes,
    /// MIME type of the payload.
    pub content_type: String,
}

impl GeneratedContent {
    /// Wrap generated bytes.
    #[must_use]
    pub fn new(bytes: impl Into<Bytes>, content_type: impl Into<String>) -> Self {
        Self {
            bytes: bytes.into(),
            content_type: content_type.into(),
        }
    }
}
