//! Inbound generation request and its cache key.

use serde::Deserialize;
use sha2::{Digest, Sha256};
use std::path::PathBuf;

/// Prefix shared by every audio cache key.
pub const CACHE_KEY_PREFIX: &str = "tts:cache:";

/// Body of `POST /generate`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GenerateRequest {
    /// Text to synthesize. Passed to the engine verbatim on stdin.
    pub text: String,
    /// Optional language hint. The process-based engine takes its language
    /// from the voice model, so this is only recorded in logs.
    #[serde(default)]
    pub language: Option<String>,
    /// Destination for the audio in file output mode.
    #[serde(default)]
    pub output_path: Option<PathBuf>,
}

/// Why a request body was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RequestError {
    #[error("body is not a valid generate request: {0}")]
    Malformed(String),

    #[error("text must not be empty")]
    EmptyText,
}

impl GenerateRequest {
    /// Create a request for `text` with no language hint or output path.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            language: None,
            output_path: None,
        }
    }

    /// Parse and validate a raw JSON body.
    pub fn from_json(body: &[u8]) -> Result<Self, RequestError> {
        let request: Self =
            serde_json::from_slice(body).map_err(|e| RequestError::Malformed(e.to_string()))?;
        if request.text.is_empty() {
            return Err(RequestError::EmptyText);
        }
        Ok(request)
    }

    /// Cache key for this request's text.
    pub fn cache_key(&self) -> String {
        cache_key(&self.text)
    }
}

/// Deterministic cache key for `text`.
///
/// SHA-256 over the exact UTF-8 bytes, hex encoded, behind [`CACHE_KEY_PREFIX`].
/// No normalization is applied: texts differing by a single byte get distinct keys.
pub fn cache_key(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    format!("{CACHE_KEY_PREFIX}{:x}", hasher.finalize())
}
