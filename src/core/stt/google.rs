//! Google Cloud Speech-to-Text v1 backend.
//!
//! Synchronous recognition over REST:
//!
//! ```text
//! POST https://speech.googleapis.com/v1/speech:recognize?key=<api key>
//! {"config": {"languageCode": "zh-CN", "encoding": "MP3"},
//!  "audio": {"content": "<base64>"}}
//! ```
//!
//! WAV input omits `encoding`; the service reads it from the header.

use std::path::Path;

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::base::{RecognitionBackend, RecognitionError, RecognitionResult};

/// Google Cloud Speech v1 synchronous recognize endpoint
pub const GOOGLE_SPEECH_URL: &str = "https://speech.googleapis.com/v1/speech:recognize";

// =============================================================================
// Wire types
// =============================================================================

#[derive(Debug, Serialize)]
struct RecognizeRequest<'a> {
    config: RecognitionConfig<'a>,
    audio: RecognitionAudio,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RecognitionConfig<'a> {
    language_code: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    encoding: Option<&'static str>,
}

#[derive(Debug, Serialize)]
struct RecognitionAudio {
    content: String,
}

#[derive(Debug, Default, Deserialize)]
struct RecognizeResponse {
    #[serde(default)]
    results: Vec<SpeechRecognitionResult>,
}

#[derive(Debug, Deserialize)]
struct SpeechRecognitionResult {
    #[serde(default)]
    alternatives: Vec<SpeechAlternative>,
}

#[derive(Debug, Deserialize)]
struct SpeechAlternative {
    #[serde(default)]
    transcript: String,
    confidence: Option<f32>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ApiError,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: Option<String>,
}

/// Encoding name for a container format, `None` when the service infers it
fn encoding_for(format: &str) -> Option<&'static str> {
    match format.trim_start_matches('.').to_lowercase().as_str() {
        "flac" => Some("FLAC"),
        "mp3" => Some("MP3"),
        "ogg" | "opus" => Some("OGG_OPUS"),
        "webm" => Some("WEBM_OPUS"),
        _ => None,
    }
}

// =============================================================================
// GoogleSpeechBackend
// =============================================================================

pub struct GoogleSpeechBackend {
    http: reqwest::Client,
    api_key: String,
    api_url: String,
    language: String,
}

impl GoogleSpeechBackend {
    pub fn new(
        api_key: impl Into<String>,
        api_url: impl Into<String>,
        language: impl Into<String>,
    ) -> Result<Self, RecognitionError> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(RecognitionError::Local(
                "speech API key must not be empty".to_string(),
            ));
        }

        Ok(Self {
            http: reqwest::Client::new(),
            api_key,
            api_url: api_url.into(),
            language: language.into(),
        })
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    fn transcript(response: RecognizeResponse) -> Result<RecognitionResult, RecognitionError> {
        let mut confidence = None;
        let parts: Vec<String> = response
            .results
            .into_iter()
            .filter_map(|result| result.alternatives.into_iter().next())
            .filter_map(|alternative| {
                let text = alternative.transcript.trim().to_string();
                if text.is_empty() {
                    return None;
                }
                confidence = confidence.or(alternative.confidence);
                Some(text)
            })
            .collect();

        if parts.is_empty() {
            return Err(RecognitionError::Unintelligible);
        }

        Ok(RecognitionResult {
            text: parts.join(" "),
            confidence,
        })
    }
}

#[async_trait]
impl RecognitionBackend for GoogleSpeechBackend {
    async fn recognize_file(
        &self,
        path: &Path,
        format: &str,
    ) -> Result<RecognitionResult, RecognitionError> {
        let audio = tokio::fs::read(path)
            .await
            .map_err(|e| RecognitionError::Local(format!("{}: {e}", path.display())))?;

        let request = RecognizeRequest {
            config: RecognitionConfig {
                language_code: &self.language,
                encoding: encoding_for(format),
            },
            audio: RecognitionAudio {
                content: BASE64.encode(&audio),
            },
        };

        debug!(
            "Sending {} bytes of {} audio for recognition (language={})",
            audio.len(),
            format,
            self.language
        );

        let response = self
            .http
            .post(&self.api_url)
            .query(&[("key", self.api_key.as_str())])
            .json(&request)
            .send()
            .await
            .map_err(|e| RecognitionError::Service(format!("Request failed: {e}")))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| RecognitionError::Service(format!("Failed to read response: {e}")))?;

        if !status.is_success() {
            let message = match serde_json::from_str::<ErrorEnvelope>(&body) {
                Ok(envelope) => match envelope.error.status {
                    Some(code) => format!("{code}: {}", envelope.error.message),
                    None => envelope.error.message,
                },
                Err(_) => format!("HTTP {status}: {body}"),
            };
            return Err(RecognitionError::Service(message));
        }

        let parsed: RecognizeResponse = if body.trim().is_empty() {
            RecognizeResponse::default()
        } else {
            serde_json::from_str(&body).map_err(|e| {
                RecognitionError::Service(format!("Failed to parse response: {e}"))
            })?
        };

        Self::transcript(parsed)
    }
}
