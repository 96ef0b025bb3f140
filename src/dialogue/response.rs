use serde::{Deserialize, Serialize};

use crate::core::registry::VoiceRecord;

/// Result of a text or voice pipeline run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogueResponse {
    pub success: bool,
    /// Signed URL of the spoken reply; expires with the storage URL TTL
    pub audio_url: Option<String>,
    /// The assistant's reply, present once the chat stage has succeeded
    pub response_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    /// Set by the voice pipeline whenever recognition succeeded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recognized_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DialogueResponse {
    pub fn success(audio_url: String, response_text: String, session_id: &str) -> Self {
        Self {
            success: true,
            audio_url: Some(audio_url),
            response_text: Some(response_text),
            session_id: Some(session_id.to_string()),
            recognized_text: None,
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>, response_text: Option<String>) -> Self {
        Self {
            success: false,
            audio_url: None,
            response_text,
            session_id: None,
            recognized_text: None,
            error: Some(error.into()),
        }
    }

    pub fn with_recognized_text(mut self, text: impl Into<String>) -> Self {
        self.recognized_text = Some(text.into());
        self
    }
}

/// Result of cloning a voice from an audio sample
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CloneResponse {
    pub success: bool,
    pub voice_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voice: Option<VoiceRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CloneResponse {
    pub fn success(voice: VoiceRecord) -> Self {
        Self {
            success: true,
            voice_id: Some(voice.voice_id.clone()),
            voice: Some(voice),
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            voice_id: None,
            voice: None,
            error: Some(error.into()),
        }
    }
}

/// Result of a text-only chat turn
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatReply {
    pub success: bool,
    pub response_text: Option<String>,
    pub session_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
