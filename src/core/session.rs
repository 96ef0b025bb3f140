//! Conversation sessions.
//!
//! Sessions are keyed by a caller-supplied opaque id and created lazily on
//! first append. The store is bounded by `max_sessions`; idle sessions can be
//! expired with `idle_ttl`, and per-session history can be capped with
//! `max_history` (oldest messages dropped first).

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::core::chat::ChatMessage;

/// Default bound on concurrently retained sessions
pub const DEFAULT_MAX_SESSIONS: u64 = 10_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    pub max_sessions: u64,
    /// Drop sessions not touched for this long; `None` keeps them
    pub idle_ttl: Option<Duration>,
    /// Keep at most this many messages per session; `None` keeps all
    pub max_history: Option<usize>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_sessions: DEFAULT_MAX_SESSIONS,
            idle_ttl: None,
            max_history: None,
        }
    }
}

/// Where a session's current pipeline run is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    #[default]
    Idle,
    AwaitingAiResponse,
    Synthesizing,
    Uploading,
}

#[derive(Debug, Default)]
struct Session {
    messages: Vec<ChatMessage>,
    stage: PipelineStage,
}

/// In-memory session map shared by the dialogue pipelines
#[derive(Clone)]
pub struct SessionStore {
    sessions: Cache<String, Arc<Mutex<Session>>>,
    max_history: Option<usize>,
}

impl SessionStore {
    pub fn new(config: SessionConfig) -> Self {
        let mut builder = Cache::builder().max_capacity(config.max_sessions);
        if let Some(ttl) = config.idle_ttl {
            builder = builder.time_to_idle(ttl);
        }

        Self {
            sessions: builder.build(),
            max_history: config.max_history,
        }
    }

    async fn session(&self, session_id: &str) -> Arc<Mutex<Session>> {
        self.sessions
            .get_with(session_id.to_string(), async {
                Arc::new(Mutex::new(Session::default()))
            })
            .await
    }

    /// Append a message, creating the session if needed, and return the
    /// resulting history
    pub async fn append(&self, session_id: &str, message: ChatMessage) -> Vec<ChatMessage> {
        let session = self.session(session_id).await;
        let mut session = session.lock();
        session.messages.push(message);

        if let Some(max) = self.max_history {
            let len = session.messages.len();
            if len > max {
                session.messages.drain(..len - max);
            }
        }

        session.messages.clone()
    }

    /// History of an existing session; unknown ids are not created
    pub async fn history(&self, session_id: &str) -> Option<Vec<ChatMessage>> {
        self.sessions
            .get(session_id)
            .await
            .map(|session| session.lock().messages.clone())
    }

    /// Forget a session and its history
    pub async fn clear(&self, session_id: &str) {
        self.sessions.invalidate(session_id).await;
    }

    pub async fn stage(&self, session_id: &str) -> PipelineStage {
        self.sessions
            .get(session_id)
            .await
            .map(|session| session.lock().stage)
            .unwrap_or_default()
    }

    pub(crate) async fn set_stage(&self, session_id: &str, stage: PipelineStage) {
        let session = self.session(session_id).await;
        session.lock().stage = stage;
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}
