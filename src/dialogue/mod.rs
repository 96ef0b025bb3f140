//! Dialogue orchestration.
//!
//! [`VoiceDialogue`] chains the components into two pipelines:
//!
//! - text in, audio out: chat → synthesis → upload → signed URL
//! - audio in, audio out: recognition, then the text pipeline
//!
//! plus cloning a voice from an audio sample. Each stage's failure ends the
//! run and is reported in the response; earlier side effects (session
//! messages, uploaded objects, registry entries) are kept.

mod response;

pub use response::{ChatReply, CloneResponse, DialogueResponse};

pub use crate::core::session::PipelineStage;

use std::path::PathBuf;
use std::sync::Arc;

use futures::StreamExt;
use tracing::{error, info};

use crate::config::{DialogueConfig, StorageKind};
use crate::core::chat::{
    ChatCompletion, ChatError, ChatMessage, ChatResult, ChatStream, HttpChatClient,
};
use crate::core::enrollment::DashScopeEnrollment;
use crate::core::registry::{TargetModel, VoiceRegistry};
use crate::core::session::SessionStore;
use crate::core::storage::{InMemoryBackend, ObjectStorage, S3Backend, StorageBackend};
use crate::core::stt::SpeechRecognizer;
use crate::core::tts::{BaseTTS, CosyVoiceTTS, SynthesisRequest};
use crate::errors::app_error::{AppError, AppResult};
use crate::utils::{ScratchFile, response_object_name, sample_object_name, unix_timestamp};

/// Collaborators for [`VoiceDialogue::new`]
pub struct DialogueComponents {
    pub chat: Arc<dyn ChatCompletion>,
    pub tts: Arc<dyn BaseTTS>,
    pub recognizer: SpeechRecognizer,
    pub storage: ObjectStorage,
    pub registry: Arc<VoiceRegistry>,
    pub sessions: SessionStore,
    /// Directory for scratch copies of incoming audio
    pub scratch_dir: PathBuf,
    /// Model voices cloned through [`VoiceDialogue::clone_voice_from_audio`] target
    pub clone_target_model: TargetModel,
}

pub struct VoiceDialogue {
    chat: Arc<dyn ChatCompletion>,
    tts: Arc<dyn BaseTTS>,
    recognizer: SpeechRecognizer,
    storage: ObjectStorage,
    registry: Arc<VoiceRegistry>,
    sessions: SessionStore,
    scratch_dir: PathBuf,
    clone_target_model: TargetModel,
}

impl VoiceDialogue {
    pub fn new(components: DialogueComponents) -> Self {
        Self {
            chat: components.chat,
            tts: components.tts,
            recognizer: components.recognizer,
            storage: components.storage,
            registry: components.registry,
            sessions: components.sessions,
            scratch_dir: components.scratch_dir,
            clone_target_model: components.clone_target_model,
        }
    }

    /// Build the production stack from configuration.
    ///
    /// Fails if any client is misconfigured or the storage bucket can neither
    /// be found nor created.
    pub async fn from_config(config: &DialogueConfig) -> AppResult<Self> {
        let chat = HttpChatClient::new(config.chat_config().map_err(AppError::Config)?)?;
        let tts = CosyVoiceTTS::new(config.cosyvoice_config().map_err(AppError::Config)?)?;
        let recognizer =
            SpeechRecognizer::from_config(config.recognizer_config().map_err(AppError::Config)?)?;

        let backend: Arc<dyn StorageBackend> = match config.storage_backend {
            StorageKind::S3 => Arc::new(S3Backend::new(
                config.storage_config().map_err(AppError::Config)?,
            )?),
            StorageKind::Memory => Arc::new(InMemoryBackend::new(config.storage_bucket.clone())),
        };
        let storage = ObjectStorage::connect(backend, config.signed_url_ttl()).await?;

        let enrollment =
            DashScopeEnrollment::new(config.enrollment_config().map_err(AppError::Config)?)?;
        let registry = VoiceRegistry::open(&config.voice_db_path, Arc::new(enrollment)).await?;

        let clone_target_model = config
            .clone_target_model
            .parse::<TargetModel>()
            .map_err(AppError::Config)?;

        tokio::fs::create_dir_all(&config.audio_cache_dir).await?;

        info!(
            bucket = %storage.bucket(),
            storage = %config.storage_backend,
            "Voice dialogue ready"
        );

        Ok(Self::new(DialogueComponents {
            chat: Arc::new(chat),
            tts: Arc::new(tts),
            recognizer,
            storage,
            registry: Arc::new(registry),
            sessions: SessionStore::new(config.session_config()),
            scratch_dir: config.audio_cache_dir.clone(),
            clone_target_model,
        }))
    }

    /// Session store shared by all pipelines
    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    /// Voice registry, for listing and managing cloned voices
    pub fn voices(&self) -> &VoiceRegistry {
        &self.registry
    }

    pub fn storage(&self) -> &ObjectStorage {
        &self.storage
    }

    /// Text in, spoken reply out.
    ///
    /// Session history keeps the user message, and the assistant reply once
    /// received, even when a later stage fails.
    pub async fn process_text_message(
        &self,
        text: &str,
        session_id: &str,
        voice_id: &str,
    ) -> DialogueResponse {
        let response = self.run_text_pipeline(text, session_id, voice_id).await;
        self.sessions.set_stage(session_id, PipelineStage::Idle).await;
        response
    }

    async fn run_text_pipeline(
        &self,
        text: &str,
        session_id: &str,
        voice_id: &str,
    ) -> DialogueResponse {
        let reply = match self.ask_assistant(text, session_id).await {
            Ok(reply) => reply,
            Err(e) => return DialogueResponse::failure(chat_failure(&e), None),
        };

        self.sessions
            .set_stage(session_id, PipelineStage::Synthesizing)
            .await;
        let synthesized = match self
            .tts
            .synthesize(SynthesisRequest::new(reply.as_str(), voice_id))
            .await
        {
            Ok(synthesized) => synthesized,
            Err(e) => {
                error!(session_id = %session_id, voice_id = %voice_id, "Synthesis failed: {}", e);
                return DialogueResponse::failure(e.to_string(), Some(reply));
            }
        };

        self.sessions
            .set_stage(session_id, PipelineStage::Uploading)
            .await;
        let object_name = response_object_name(session_id, unix_timestamp());
        let uploaded = match self
            .storage
            .upload_bytes(synthesized.audio, &object_name)
            .await
        {
            Ok(uploaded) => uploaded,
            Err(e) => {
                error!(session_id = %session_id, object_name = %object_name, "Upload failed: {}", e);
                return DialogueResponse::failure(e.to_string(), Some(reply));
            }
        };

        info!(
            session_id = %session_id,
            request_id = %synthesized.request_id,
            "Replied with audio {}",
            uploaded.object_name
        );
        DialogueResponse::success(uploaded.url, reply, session_id)
    }

    /// Record the user turn, ask the assistant and record its reply
    async fn ask_assistant(&self, text: &str, session_id: &str) -> Result<String, ChatError> {
        let history = self
            .sessions
            .append(session_id, ChatMessage::user(text))
            .await;

        self.sessions
            .set_stage(session_id, PipelineStage::AwaitingAiResponse)
            .await;
        let reply = self.chat.complete(&history).await.map_err(|e| {
            error!(session_id = %session_id, "Chat endpoint failed: {}", e);
            e
        })?;

        self.sessions
            .append(session_id, ChatMessage::assistant(reply.as_str()))
            .await;
        Ok(reply)
    }

    /// Audio in, spoken reply out.
    ///
    /// `audio` is a WAV recording. The recognized text is reported even if a
    /// later stage fails.
    pub async fn process_voice_message(
        &self,
        audio: &[u8],
        session_id: &str,
        voice_id: &str,
    ) -> DialogueResponse {
        let scratch = match ScratchFile::with_bytes(&self.scratch_dir, "wav", audio) {
            Ok(scratch) => scratch,
            Err(e) => {
                error!(session_id = %session_id, "Failed to write voice message: {}", e);
                return DialogueResponse::failure(format!("Error recognizing speech: {e}"), None);
            }
        };

        let recognized = self.recognizer.recognize(scratch.path(), None).await;
        drop(scratch);
        let recognized = match recognized {
            Ok(recognized) => recognized,
            Err(e) => return DialogueResponse::failure(e.to_string(), None),
        };

        self.process_text_message(&recognized.text, session_id, voice_id)
            .await
            .with_recognized_text(recognized.text)
    }

    /// Upload an audio sample and enroll a new voice from it.
    ///
    /// The sample is stored as `voice_samples/<ts>_<name>.wav`.
    pub async fn clone_voice_from_audio(
        &self,
        audio: &[u8],
        name: &str,
        description: &str,
    ) -> CloneResponse {
        let scratch = match ScratchFile::with_bytes(&self.scratch_dir, "wav", audio) {
            Ok(scratch) => scratch,
            Err(e) => {
                error!("Failed to write voice sample: {}", e);
                return CloneResponse::failure(format!("Failed to write voice sample: {e}"));
            }
        };

        let object_name = sample_object_name(name, unix_timestamp());
        let uploaded = match self
            .storage
            .upload_file(scratch.path(), Some(&object_name))
            .await
        {
            Ok(uploaded) => uploaded,
            Err(e) => return CloneResponse::failure(e.to_string()),
        };
        drop(scratch);

        match self
            .registry
            .create_voice(self.clone_target_model, name, description, &uploaded.url)
            .await
        {
            Ok(voice) => CloneResponse::success(voice),
            Err(e) => {
                error!(object_name = %uploaded.object_name, "Voice enrollment failed: {}", e);
                CloneResponse::failure(e.to_string())
            }
        }
    }

    /// Text in, text out, sharing history with the voice pipelines
    pub async fn chat(&self, text: &str, session_id: &str) -> ChatReply {
        let result = self.ask_assistant(text, session_id).await;
        self.sessions.set_stage(session_id, PipelineStage::Idle).await;

        match result {
            Ok(reply) => ChatReply {
                success: true,
                response_text: Some(reply),
                session_id: session_id.to_string(),
                error: None,
            },
            Err(e) => ChatReply {
                success: false,
                response_text: None,
                session_id: session_id.to_string(),
                error: Some(chat_failure(&e)),
            },
        }
    }

    /// Text in, reply streamed as content deltas.
    ///
    /// The user message is recorded immediately; the assistant reply is
    /// recorded once the stream has been read to the end without error.
    pub async fn chat_stream(
        &self,
        text: &str,
        session_id: &str,
    ) -> ChatResult<ChatStream> {
        let history = self
            .sessions
            .append(session_id, ChatMessage::user(text))
            .await;

        let mut deltas = self.chat.complete_stream(&history).await.map_err(|e| {
            error!(session_id = %session_id, "Chat stream failed to start: {}", e);
            e
        })?;

        let sessions = self.sessions.clone();
        let session_id = session_id.to_string();
        let stream = async_stream::try_stream! {
            let mut full_reply = String::new();
            while let Some(delta) = deltas.next().await {
                let delta = delta?;
                full_reply.push_str(&delta);
                yield delta;
            }
            sessions
                .append(&session_id, ChatMessage::assistant(full_reply))
                .await;
        };

        Ok(Box::pin(stream))
    }
}

fn chat_failure(e: &ChatError) -> String {
    format!("Error calling chat endpoint: {e}")
}
