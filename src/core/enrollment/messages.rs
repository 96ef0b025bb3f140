//! DashScope customization request and response types.

use serde::{Deserialize, Serialize};

use super::base::RemoteVoice;

/// Model name the customization endpoint expects for every action
pub const ENROLLMENT_MODEL: &str = "voice-enrollment";

/// Action carried in the request `input`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum EnrollmentAction {
    CreateVoice {
        target_model: String,
        prefix: String,
        url: String,
    },
    ListVoice {
        #[serde(skip_serializing_if = "Option::is_none")]
        prefix: Option<String>,
        page_index: u32,
        page_size: u32,
    },
    QueryVoice {
        voice_id: String,
    },
    UpdateVoice {
        voice_id: String,
        url: String,
    },
    DeleteVoice {
        voice_id: String,
    },
}

impl EnrollmentAction {
    pub fn name(&self) -> &'static str {
        match self {
            Self::CreateVoice { .. } => "create_voice",
            Self::ListVoice { .. } => "list_voice",
            Self::QueryVoice { .. } => "query_voice",
            Self::UpdateVoice { .. } => "update_voice",
            Self::DeleteVoice { .. } => "delete_voice",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct EnrollmentRequest {
    pub model: &'static str,
    pub input: EnrollmentAction,
}

impl From<EnrollmentAction> for EnrollmentRequest {
    fn from(input: EnrollmentAction) -> Self {
        Self {
            model: ENROLLMENT_MODEL,
            input,
        }
    }
}

/// Response envelope; `output` is action specific
#[derive(Debug, Clone, Deserialize)]
pub struct EnrollmentResponse {
    #[serde(default)]
    pub output: Option<serde_json::Value>,
    #[serde(default)]
    pub request_id: Option<String>,
}

/// Error body returned with non-2xx statuses
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorResponse {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub request_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateVoiceOutput {
    pub voice_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ListVoiceOutput {
    #[serde(default)]
    pub voice_list: Vec<RemoteVoice>,
}
