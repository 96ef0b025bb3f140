use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

/// Errors raised by speech synthesis
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TTSError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Provider error: {0}")]
    ProviderError(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Audio generation failed: {0}")]
    AudioGenerationFailed(String),
}

pub type TTSResult<T> = Result<T, TTSError>;

/// One synthesis call.
///
/// Unset options fall back to the provider's configured defaults. `speed`
/// (nominally 0.5 - 2.0) and `volume` (0 - 100) are forwarded unvalidated.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SynthesisRequest {
    pub text: String,
    pub voice_id: String,
    pub model: Option<String>,
    pub format: Option<String>,
    pub sample_rate: Option<u32>,
    pub speed: Option<f32>,
    pub volume: Option<u32>,
}

impl SynthesisRequest {
    pub fn new(text: impl Into<String>, voice_id: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            voice_id: voice_id.into(),
            ..Default::default()
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    pub fn with_sample_rate(mut self, sample_rate: u32) -> Self {
        self.sample_rate = Some(sample_rate);
        self
    }

    pub fn with_speed(mut self, speed: f32) -> Self {
        self.speed = Some(speed);
        self
    }

    pub fn with_volume(mut self, volume: u32) -> Self {
        self.volume = Some(volume);
        self
    }
}

/// Synthesized audio
#[derive(Debug, Clone, PartialEq)]
pub struct SynthesisResult {
    /// Encoded audio exactly as returned by the provider
    pub audio: Bytes,
    /// Provider request identifier, for tracing a call on the provider side
    pub request_id: String,
    /// Container format of `audio` (`mp3`, `wav`, `pcm`)
    pub format: String,
}

/// Text-to-speech provider
#[async_trait]
pub trait BaseTTS: Send + Sync {
    /// Short provider identifier used in logs
    fn provider_name(&self) -> &'static str;

    /// Synthesize `request.text` in the voice `request.voice_id`
    async fn synthesize(&self, request: SynthesisRequest) -> TTSResult<SynthesisResult>;
}
