use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{error, info, warn};

use super::base::{AudioInput, RecognitionBackend, RecognitionError, RecognitionResult};
use super::google::GoogleSpeechBackend;
use crate::utils::ScratchFile;

/// Format assumed when none is given and none can be inferred
pub const DEFAULT_AUDIO_FORMAT: &str = "wav";

/// Configuration for the production recognizer
#[derive(Debug, Clone)]
pub struct RecognizerConfig {
    pub api_key: String,
    pub api_url: String,
    /// BCP-47 language code, fixed for the recognizer's lifetime
    pub language: String,
    /// Directory for scratch files written from byte input
    pub scratch_dir: PathBuf,
}

/// Speech-to-text over a [`RecognitionBackend`]
#[derive(Clone)]
pub struct SpeechRecognizer {
    backend: Arc<dyn RecognitionBackend>,
    scratch_dir: PathBuf,
}

impl SpeechRecognizer {
    pub fn new(backend: Arc<dyn RecognitionBackend>, scratch_dir: impl Into<PathBuf>) -> Self {
        Self {
            backend,
            scratch_dir: scratch_dir.into(),
        }
    }

    /// Build a recognizer backed by Google Cloud Speech
    pub fn from_config(config: RecognizerConfig) -> Result<Self, RecognitionError> {
        let backend = GoogleSpeechBackend::new(config.api_key, config.api_url, config.language)?;
        Ok(Self::new(Arc::new(backend), config.scratch_dir))
    }

    pub fn scratch_dir(&self) -> &Path {
        &self.scratch_dir
    }

    /// Recognize speech from a file or a byte blob.
    ///
    /// `format` defaults to the file extension for file input and to `wav`
    /// for byte input. Byte input goes through a scratch file which is
    /// deleted before this returns, whatever the outcome.
    pub async fn recognize(
        &self,
        audio: impl Into<AudioInput>,
        format: Option<&str>,
    ) -> Result<RecognitionResult, RecognitionError> {
        let result = match audio.into() {
            AudioInput::File(path) => {
                let format = format
                    .map(str::to_string)
                    .or_else(|| {
                        path.extension()
                            .map(|ext| ext.to_string_lossy().to_lowercase())
                    })
                    .unwrap_or_else(|| DEFAULT_AUDIO_FORMAT.to_string());
                self.backend.recognize_file(&path, &format).await
            }
            AudioInput::Bytes(data) => {
                let format = format.unwrap_or(DEFAULT_AUDIO_FORMAT);
                let scratch = ScratchFile::with_bytes(&self.scratch_dir, format, &data)
                    .map_err(|e| RecognitionError::Local(e.to_string()))?;
                self.backend.recognize_file(scratch.path(), format).await
            }
        };

        match &result {
            Ok(recognized) => info!("Recognized speech: {}", recognized.text),
            Err(RecognitionError::Unintelligible) => warn!("Speech could not be understood"),
            Err(e) => error!("Speech recognition failed: {}", e),
        }

        result
    }
}
