//! CosyVoice provider over the DashScope duplex WebSocket.

use async_trait::async_trait;
use bytes::BytesMut;
use futures_util::{SinkExt, StreamExt};
use http::HeaderValue;
use http::header::AUTHORIZATION;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tracing::{debug, error, info};
use uuid::Uuid;

use super::config::CosyVoiceConfig;
use super::messages::{ClientMessage, ServerEvent, ServerMessage, SynthesisParameters};
use crate::core::tts::base::{BaseTTS, SynthesisRequest, SynthesisResult, TTSError, TTSResult};

pub struct CosyVoiceTTS {
    config: CosyVoiceConfig,
}

impl CosyVoiceTTS {
    pub fn new(config: CosyVoiceConfig) -> TTSResult<Self> {
        config.validate().map_err(TTSError::InvalidConfiguration)?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &CosyVoiceConfig {
        &self.config
    }

    fn upgrade_request(&self) -> TTSResult<http::Request<()>> {
        let mut request = self
            .config
            .ws_url
            .as_str()
            .into_client_request()
            .map_err(|e| TTSError::ConnectionFailed(e.to_string()))?;

        let auth = HeaderValue::from_str(&format!("bearer {}", self.config.api_key))
            .map_err(|e| TTSError::InvalidConfiguration(format!("Invalid API key: {e}")))?;
        request.headers_mut().insert(AUTHORIZATION, auth);

        Ok(request)
    }

    /// Resolve the model and `run-task` parameters, filling unset request
    /// options from the configured defaults
    fn task_parameters(&self, request: &SynthesisRequest) -> (String, SynthesisParameters) {
        let model = request
            .model
            .clone()
            .unwrap_or_else(|| self.config.model.clone());
        let parameters = SynthesisParameters::plain_text(
            request.voice_id.clone(),
            request
                .format
                .clone()
                .unwrap_or_else(|| self.config.format.clone()),
            request.sample_rate.unwrap_or(self.config.sample_rate),
            request.volume.unwrap_or(self.config.volume),
            request.speed.unwrap_or(self.config.speed),
        );
        (model, parameters)
    }
}

fn encode(message: &ClientMessage) -> TTSResult<Message> {
    let json = message
        .to_json()
        .map_err(|e| TTSError::ProviderError(format!("Failed to serialize message: {e}")))?;
    Ok(Message::Text(json.into()))
}

#[async_trait]
impl BaseTTS for CosyVoiceTTS {
    fn provider_name(&self) -> &'static str {
        "cosyvoice"
    }

    async fn synthesize(&self, request: SynthesisRequest) -> TTSResult<SynthesisResult> {
        if request.text.trim().is_empty() {
            return Err(TTSError::AudioGenerationFailed(
                "Cannot synthesize empty text".to_string(),
            ));
        }
        if request.voice_id.trim().is_empty() {
            return Err(TTSError::InvalidConfiguration(
                "voice_id must not be empty".to_string(),
            ));
        }

        let task_id = Uuid::new_v4().simple().to_string();
        let (model, parameters) = self.task_parameters(&request);
        let format = parameters.format.clone();

        debug!(
            "Starting CosyVoice task {}: model={}, voice={}, format={}, rate={}, volume={}",
            task_id, model, parameters.voice, parameters.format, parameters.rate, parameters.volume
        );

        let (ws_stream, _response) = connect_async(self.upgrade_request()?)
            .await
            .map_err(|e| TTSError::ConnectionFailed(e.to_string()))?;
        let (mut write, mut read) = ws_stream.split();

        write
            .send(encode(&ClientMessage::run_task(&task_id, &model, parameters))?)
            .await
            .map_err(|e| TTSError::NetworkError(e.to_string()))?;

        let mut audio = BytesMut::new();
        let mut finished = false;

        while let Some(message) = read.next().await {
            match message.map_err(|e| TTSError::NetworkError(e.to_string()))? {
                Message::Text(text) => {
                    let event: ServerMessage = serde_json::from_str(&text).map_err(|e| {
                        TTSError::ProviderError(format!("Failed to parse server event: {e}"))
                    })?;

                    match event.header.event {
                        ServerEvent::TaskStarted => {
                            debug!("CosyVoice task {} started", task_id);
                            write
                                .send(encode(&ClientMessage::continue_task(
                                    &task_id,
                                    &request.text,
                                ))?)
                                .await
                                .map_err(|e| TTSError::NetworkError(e.to_string()))?;
                            write
                                .send(encode(&ClientMessage::finish_task(&task_id))?)
                                .await
                                .map_err(|e| TTSError::NetworkError(e.to_string()))?;
                        }
                        ServerEvent::ResultGenerated => {}
                        ServerEvent::TaskFinished => {
                            finished = true;
                            break;
                        }
                        ServerEvent::TaskFailed => {
                            let description = event.failure_description();
                            error!("CosyVoice task {} failed: {}", task_id, description);
                            let _ = write.close().await;
                            return Err(TTSError::ProviderError(description));
                        }
                        ServerEvent::Unknown => {
                            debug!("Ignoring unknown CosyVoice event: {}", text.as_str());
                        }
                    }
                }
                Message::Binary(data) => audio.extend_from_slice(&data),
                Message::Close(frame) => {
                    debug!("CosyVoice closed the connection: {:?}", frame);
                    break;
                }
                _ => {}
            }
        }

        let _ = write.close().await;

        if !finished {
            return Err(TTSError::ConnectionFailed(
                "Connection closed before the task finished".to_string(),
            ));
        }
        if audio.is_empty() {
            return Err(TTSError::AudioGenerationFailed(
                "Provider returned no audio".to_string(),
            ));
        }

        info!(
            "Synthesized {} bytes of {} audio (request_id={})",
            audio.len(),
            format,
            task_id
        );

        Ok(SynthesisResult {
            audio: audio.freeze(),
            request_id: task_id,
            format,
        })
    }
}
