use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised by speech recognition
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RecognitionError {
    /// The audio was processed but contained no recognizable speech
    #[error("Speech could not be understood")]
    Unintelligible,

    /// The recognition service rejected or failed the request
    #[error("Recognition service error: {0}")]
    Service(String),

    /// Anything else, such as an unreadable input file
    #[error("Error recognizing speech: {0}")]
    Local(String),
}

/// Recognized text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecognitionResult {
    pub text: String,
    /// Confidence of the first alternative, when the backend reports one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f32>,
}

/// Audio handed to the recognizer
#[derive(Debug, Clone)]
pub enum AudioInput {
    File(PathBuf),
    Bytes(Bytes),
}

impl From<PathBuf> for AudioInput {
    fn from(path: PathBuf) -> Self {
        Self::File(path)
    }
}

impl From<&Path> for AudioInput {
    fn from(path: &Path) -> Self {
        Self::File(path.to_path_buf())
    }
}

impl From<Bytes> for AudioInput {
    fn from(data: Bytes) -> Self {
        Self::Bytes(data)
    }
}

impl From<Vec<u8>> for AudioInput {
    fn from(data: Vec<u8>) -> Self {
        Self::Bytes(Bytes::from(data))
    }
}

/// Remote recognition service operating on an audio file
#[async_trait]
pub trait RecognitionBackend: Send + Sync {
    /// Recognize the audio stored at `path`.
    ///
    /// `format` is the container/codec name (`wav`, `mp3`, `flac`, ...).
    async fn recognize_file(
        &self,
        path: &Path,
        format: &str,
    ) -> Result<RecognitionResult, RecognitionError>;
}
