use async_trait::async_trait;
use futures::stream::BoxStream;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One turn of a conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Errors raised by the chat endpoint
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ChatError {
    #[error("Request failed: {0}")]
    Network(String),

    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Invalid chat configuration: {0}")]
    Configuration(String),
}

pub type ChatResult<T> = Result<T, ChatError>;

/// Content deltas of a streamed reply, in order
pub type ChatStream = BoxStream<'static, ChatResult<String>>;

/// Remote conversational assistant
#[async_trait]
pub trait ChatCompletion: Send + Sync {
    /// The assistant's reply to the full `messages` history
    async fn complete(&self, messages: &[ChatMessage]) -> ChatResult<String>;

    /// The assistant's reply as it is generated
    async fn complete_stream(&self, messages: &[ChatMessage]) -> ChatResult<ChatStream>;
}
