use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised by the enrollment service
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EnrollmentError {
    #[error("Enrollment request failed: {0}")]
    Network(String),

    #[error("Enrollment service error {code}: {message}")]
    Api { code: String, message: String },

    #[error("Invalid enrollment response: {0}")]
    InvalidResponse(String),

    #[error("Invalid enrollment configuration: {0}")]
    Configuration(String),
}

pub type EnrollmentResult<T> = Result<T, EnrollmentError>;

/// A voice as reported by the enrollment service
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteVoice {
    #[serde(default)]
    pub voice_id: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub gmt_create: Option<String>,
    #[serde(default)]
    pub gmt_modified: Option<String>,
    #[serde(default)]
    pub target_model: Option<String>,
    #[serde(default)]
    pub resource_link: Option<String>,
}

/// Voice cloning operations offered by the provider
#[async_trait]
pub trait VoiceEnrollment: Send + Sync {
    /// Start a clone job from the sample at `url`; returns the new voice id
    async fn create_voice(&self, target_model: &str, prefix: &str, url: &str)
    -> EnrollmentResult<String>;

    /// One page of the account's voices, optionally filtered by prefix
    async fn list_voices(
        &self,
        prefix: Option<&str>,
        page_index: u32,
        page_size: u32,
    ) -> EnrollmentResult<Vec<RemoteVoice>>;

    async fn query_voice(&self, voice_id: &str) -> EnrollmentResult<RemoteVoice>;

    /// Re-train `voice_id` from a new sample
    async fn update_voice(&self, voice_id: &str, url: &str) -> EnrollmentResult<()>;

    async fn delete_voice(&self, voice_id: &str) -> EnrollmentResult<()>;
}
