use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::core::enrollment::RemoteVoice;

/// Synthesis model a cloned voice is trained for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TargetModel {
    #[serde(rename = "cosyvoice-v1")]
    CosyVoiceV1,
    #[default]
    #[serde(rename = "cosyvoice-v2")]
    CosyVoiceV2,
}

impl TargetModel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CosyVoiceV1 => "cosyvoice-v1",
            Self::CosyVoiceV2 => "cosyvoice-v2",
        }
    }
}

impl fmt::Display for TargetModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TargetModel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cosyvoice-v1" => Ok(Self::CosyVoiceV1),
            "cosyvoice-v2" => Ok(Self::CosyVoiceV2),
            other => Err(format!(
                "Unsupported target model: {other}. Supported: cosyvoice-v1, cosyvoice-v2"
            )),
        }
    }
}

/// Provider-side state of a cloned voice.
///
/// Stored as the provider's upper-case string; values this crate does not
/// know are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum VoiceStatus {
    Pending,
    Ok,
    Deploying,
    UnDeployed,
    Other(String),
}

impl From<String> for VoiceStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "PENDING" => Self::Pending,
            "OK" => Self::Ok,
            "DEPLOYING" => Self::Deploying,
            "UNDEPLOYED" => Self::UnDeployed,
            _ => Self::Other(value),
        }
    }
}

impl From<VoiceStatus> for String {
    fn from(status: VoiceStatus) -> Self {
        match status {
            VoiceStatus::Pending => "PENDING".to_string(),
            VoiceStatus::Ok => "OK".to_string(),
            VoiceStatus::Deploying => "DEPLOYING".to_string(),
            VoiceStatus::UnDeployed => "UNDEPLOYED".to_string(),
            VoiceStatus::Other(value) => value,
        }
    }
}

/// Locally cached metadata for one cloned voice
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoiceRecord {
    pub voice_id: String,
    pub name: String,
    pub description: String,
    pub target_model: TargetModel,
    pub audio_url: String,
    /// Provider creation timestamp, empty until the first refresh
    #[serde(default)]
    pub created_at: String,
    pub status: VoiceStatus,
}

impl VoiceRecord {
    /// A freshly enrolled voice, before the provider has reported on it
    pub fn pending(
        voice_id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        target_model: TargetModel,
        audio_url: impl Into<String>,
    ) -> Self {
        Self {
            voice_id: voice_id.into(),
            name: name.into(),
            description: description.into(),
            target_model,
            audio_url: audio_url.into(),
            created_at: String::new(),
            status: VoiceStatus::Pending,
        }
    }

    /// Overwrite status and creation time with values the provider reported
    pub(crate) fn refresh_status(&mut self, remote: &RemoteVoice) {
        if let Some(status) = &remote.status {
            self.status = VoiceStatus::from(status.clone());
        }
        if let Some(created) = &remote.gmt_create {
            self.created_at = created.clone();
        }
    }

    /// Like [`Self::refresh_status`], also taking the provider's target model
    pub(crate) fn refresh_details(&mut self, remote: &RemoteVoice) {
        self.refresh_status(remote);
        if let Some(model) = &remote.target_model {
            match model.parse::<TargetModel>() {
                Ok(model) => self.target_model = model,
                Err(e) => warn!(voice_id = %self.voice_id, "Keeping local target model: {}", e),
            }
        }
    }
}

/// Result of a registry lookup
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VoiceLookup {
    pub voice: VoiceRecord,
    /// `true` when the provider confirmed the record during this lookup,
    /// `false` when the cached copy was returned after a failed query
    pub fresh: bool,
}
