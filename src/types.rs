//! Core data types shared across the adapter

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Role of a chat turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

/// A single prior chat turn. The adapter only reads the latest turn's text;
/// the full history is owned by the chat message store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: MessageRole,
    pub text: String,
}

impl ChatTurn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            text: text.into(),
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            text: text.into(),
        }
    }
}

/// A caller-supplied binary image file for the current turn.
#[derive(Debug, Clone)]
pub struct FileAttachment {
    /// File name, used for multipart part naming and extension-based MIME
    /// fallback.
    pub name: String,
    /// Raw file bytes.
    pub bytes: Vec<u8>,
    /// Declared MIME type, if the caller knows it.
    pub mime: Option<String>,
}

impl FileAttachment {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
            mime: None,
        }
    }

    pub fn with_mime(mut self, mime: impl Into<String>) -> Self {
        self.mime = Some(mime.into());
        self
    }
}

/// The remote operation selected for a call, decided once from the shape of
/// the inputs and consumed uniformly by body building and endpoint selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageOperation {
    /// Text-to-image synthesis, no input image.
    Generation,
    /// Modifies a supplied image, optionally guided by a mask and/or text.
    Edit,
    /// A novel image resembling the supplied image, no text guidance.
    Variation,
}

/// A single normalized image result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageResult {
    /// Hosted URL returned by the service.
    Url(String),
    /// Inline image as a `data:` URI (base64 payload with the data-URI
    /// prefix already applied).
    Base64(String),
}

/// Normalized response: images in the service's returned order, plus
/// pass-through metadata (`created`, revised prompts).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageResponse {
    pub images: Vec<ImageResult>,
    pub metadata: HashMap<String, serde_json::Value>,
}
