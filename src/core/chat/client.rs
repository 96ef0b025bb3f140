use async_trait::async_trait;
use futures::StreamExt;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use super::base::{ChatCompletion, ChatError, ChatMessage, ChatResult, ChatStream};
use super::sse::{SseDecoder, SseEvent};

/// Chat endpoint connection settings
#[derive(Debug, Clone)]
pub struct ChatConfig {
    pub api_url: String,
    pub api_key: String,
    /// Application code identifying the assistant on the endpoint
    pub app_code: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    app_code: &'a str,
    messages: &'a [ChatMessage],
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

pub struct HttpChatClient {
    http: reqwest::Client,
    config: ChatConfig,
}

impl HttpChatClient {
    pub fn new(config: ChatConfig) -> ChatResult<Self> {
        if config.api_url.trim().is_empty() {
            return Err(ChatError::Configuration(
                "chat endpoint URL must not be empty".to_string(),
            ));
        }
        if config.api_key.trim().is_empty() {
            return Err(ChatError::Configuration(
                "chat API key must not be empty".to_string(),
            ));
        }

        Ok(Self {
            http: reqwest::Client::new(),
            config,
        })
    }

    async fn send(&self, messages: &[ChatMessage], stream: bool) -> ChatResult<reqwest::Response> {
        let body = ChatRequest {
            app_code: &self.config.app_code,
            messages,
            stream,
        };

        debug!(
            "Posting {} messages to chat endpoint (stream={})",
            messages.len(),
            stream
        );

        let response = self
            .http
            .post(&self.config.api_url)
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| ChatError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("Chat endpoint returned {}: {}", status, body);
            return Err(ChatError::Http {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response)
    }
}

#[async_trait]
impl ChatCompletion for HttpChatClient {
    async fn complete(&self, messages: &[ChatMessage]) -> ChatResult<String> {
        let response = self.send(messages, false).await?;
        let body = response
            .text()
            .await
            .map_err(|e| ChatError::Network(format!("Failed to read response: {e}")))?;

        let parsed: ChatResponse = serde_json::from_str(&body)
            .map_err(|e| ChatError::InvalidResponse(format!("{e}: {body}")))?;
        let reply = parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| ChatError::InvalidResponse("response has no choices".to_string()))?;

        info!("Chat endpoint replied with {} characters", reply.chars().count());
        Ok(reply)
    }

    async fn complete_stream(&self, messages: &[ChatMessage]) -> ChatResult<ChatStream> {
        let response = self.send(messages, true).await?;
        let mut body = Box::pin(response.bytes_stream());

        let stream = async_stream::try_stream! {
            let mut decoder = SseDecoder::new();
            let mut done = false;

            while let Some(chunk) = body.next().await {
                let chunk = chunk.map_err(|e| ChatError::Network(e.to_string()))?;
                for event in decoder.push(&chunk) {
                    match event {
                        SseEvent::Delta(content) => yield content,
                        SseEvent::Done => {
                            done = true;
                            break;
                        }
                    }
                }
                if done {
                    break;
                }
            }

            if !done {
                if let Some(SseEvent::Delta(content)) = decoder.finish() {
                    yield content;
                }
                debug!("Chat stream ended without a [DONE] marker");
            }
        };

        Ok(Box::pin(stream))
    }
}
