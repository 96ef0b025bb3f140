use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::{debug, error, info};

use super::MAX_PAGE_SIZE;
use super::base::{EnrollmentError, EnrollmentResult, RemoteVoice, VoiceEnrollment};
use super::messages::{
    CreateVoiceOutput, EnrollmentAction, EnrollmentRequest, EnrollmentResponse, ErrorResponse,
    ListVoiceOutput,
};

/// Default DashScope REST base URL
pub const DASHSCOPE_API_URL: &str = "https://dashscope.aliyuncs.com/api/v1";

const CUSTOMIZATION_PATH: &str = "services/audio/tts/customization";

#[derive(Debug, Clone)]
pub struct EnrollmentConfig {
    pub api_key: String,
    /// REST base URL, `https://dashscope.aliyuncs.com/api/v1` by default
    pub base_url: String,
}

impl EnrollmentConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DASHSCOPE_API_URL.to_string(),
        }
    }
}

pub struct DashScopeEnrollment {
    http: reqwest::Client,
    api_key: String,
    endpoint: String,
}

impl DashScopeEnrollment {
    pub fn new(config: EnrollmentConfig) -> EnrollmentResult<Self> {
        if config.api_key.trim().is_empty() {
            return Err(EnrollmentError::Configuration(
                "DashScope API key must not be empty".to_string(),
            ));
        }

        Ok(Self {
            http: reqwest::Client::new(),
            api_key: config.api_key,
            endpoint: format!(
                "{}/{CUSTOMIZATION_PATH}",
                config.base_url.trim_end_matches('/')
            ),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Post one action and return its `output` object
    async fn call(&self, action: EnrollmentAction) -> EnrollmentResult<serde_json::Value> {
        let name = action.name();
        debug!("DashScope enrollment action {}", name);

        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&EnrollmentRequest::from(action))
            .send()
            .await
            .map_err(|e| EnrollmentError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| EnrollmentError::Network(format!("Failed to read response: {e}")))?;

        if !status.is_success() {
            let (code, message) = match serde_json::from_str::<ErrorResponse>(&body) {
                Ok(err) => (
                    err.code.unwrap_or_else(|| status.as_u16().to_string()),
                    err.message.unwrap_or(body),
                ),
                Err(_) => (status.as_u16().to_string(), body),
            };
            error!("DashScope {} failed: {} {}", name, code, message);
            return Err(EnrollmentError::Api { code, message });
        }

        let parsed: EnrollmentResponse = serde_json::from_str(&body)
            .map_err(|e| EnrollmentError::InvalidResponse(e.to_string()))?;
        parsed
            .output
            .ok_or_else(|| EnrollmentError::InvalidResponse(format!("{name}: missing output")))
    }

    fn parse_output<T: DeserializeOwned>(output: serde_json::Value) -> EnrollmentResult<T> {
        serde_json::from_value(output).map_err(|e| EnrollmentError::InvalidResponse(e.to_string()))
    }
}

#[async_trait]
impl VoiceEnrollment for DashScopeEnrollment {
    async fn create_voice(
        &self,
        target_model: &str,
        prefix: &str,
        url: &str,
    ) -> EnrollmentResult<String> {
        let output = self
            .call(EnrollmentAction::CreateVoice {
                target_model: target_model.to_string(),
                prefix: prefix.to_string(),
                url: url.to_string(),
            })
            .await?;
        let created: CreateVoiceOutput = Self::parse_output(output)?;
        info!(voice_id = %created.voice_id, "Voice enrollment started");
        Ok(created.voice_id)
    }

    async fn list_voices(
        &self,
        prefix: Option<&str>,
        page_index: u32,
        page_size: u32,
    ) -> EnrollmentResult<Vec<RemoteVoice>> {
        let output = self
            .call(EnrollmentAction::ListVoice {
                prefix: prefix.map(str::to_string),
                page_index,
                page_size: page_size.min(MAX_PAGE_SIZE),
            })
            .await?;
        let listed: ListVoiceOutput = Self::parse_output(output)?;
        Ok(listed.voice_list)
    }

    async fn query_voice(&self, voice_id: &str) -> EnrollmentResult<RemoteVoice> {
        let output = self
            .call(EnrollmentAction::QueryVoice {
                voice_id: voice_id.to_string(),
            })
            .await?;
        let mut voice: RemoteVoice = Self::parse_output(output)?;
        if voice.voice_id.is_empty() {
            voice.voice_id = voice_id.to_string();
        }
        Ok(voice)
    }

    async fn update_voice(&self, voice_id: &str, url: &str) -> EnrollmentResult<()> {
        self.call(EnrollmentAction::UpdateVoice {
            voice_id: voice_id.to_string(),
            url: url.to_string(),
        })
        .await?;
        info!(voice_id = %voice_id, "Voice updated");
        Ok(())
    }

    async fn delete_voice(&self, voice_id: &str) -> EnrollmentResult<()> {
        self.call(EnrollmentAction::DeleteVoice {
            voice_id: voice_id.to_string(),
        })
        .await?;
        info!(voice_id = %voice_id, "Voice deleted");
        Ok(())
    }
}
