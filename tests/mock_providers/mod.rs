//! Mock providers for the dialogue pipelines
//!
//! In-process stand-ins for every remote collaborator, each counting its
//! calls so tests can assert which stages ran:
//! - chat completion ([`MockChat`])
//! - speech synthesis ([`MockTTS`])
//! - speech recognition ([`MockRecognition`])
//! - voice enrollment ([`MockEnrollment`])
//! - object storage with a fixed signed URL ([`MockStorage`])
//!
//! The WebSocket synthesis server lives in [`websocket_mock`].

// Not every test binary uses every mock
#![allow(dead_code)]

pub mod websocket_mock;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream;
use parking_lot::Mutex;

use voice_dialogue::core::chat::{ChatCompletion, ChatError, ChatMessage, ChatResult, ChatStream};
use voice_dialogue::core::enrollment::{
    EnrollmentError, EnrollmentResult, RemoteVoice, VoiceEnrollment,
};
use voice_dialogue::core::storage::{InMemoryBackend, StorageBackend, StorageError, StorageResult};
use voice_dialogue::core::stt::{RecognitionBackend, RecognitionError, RecognitionResult};
use voice_dialogue::core::tts::{BaseTTS, SynthesisRequest, SynthesisResult, TTSError, TTSResult};

/// Chat endpoint answering every request with the same reply
pub struct MockChat {
    reply: Result<String, ChatError>,
    deltas: Vec<ChatResult<String>>,
    calls: AtomicUsize,
    last_history: Mutex<Vec<ChatMessage>>,
}

impl MockChat {
    pub fn replying(reply: &str) -> Self {
        Self {
            reply: Ok(reply.to_string()),
            deltas: vec![Ok(reply.to_string())],
            calls: AtomicUsize::new(0),
            last_history: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(error: ChatError) -> Self {
        Self {
            reply: Err(error.clone()),
            deltas: vec![Err(error)],
            calls: AtomicUsize::new(0),
            last_history: Mutex::new(Vec::new()),
        }
    }

    /// Stream these items from `complete_stream`
    pub fn with_deltas(mut self, deltas: Vec<ChatResult<String>>) -> Self {
        self.deltas = deltas;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// History passed with the most recent request
    pub fn last_history(&self) -> Vec<ChatMessage> {
        self.last_history.lock().clone()
    }
}

#[async_trait]
impl ChatCompletion for MockChat {
    async fn complete(&self, messages: &[ChatMessage]) -> ChatResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_history.lock() = messages.to_vec();
        self.reply.clone()
    }

    async fn complete_stream(&self, messages: &[ChatMessage]) -> ChatResult<ChatStream> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_history.lock() = messages.to_vec();
        Ok(Box::pin(stream::iter(self.deltas.clone())))
    }
}

/// Synthesizer returning fixed audio
pub struct MockTTS {
    result: TTSResult<Bytes>,
    calls: AtomicUsize,
    last_request: Mutex<Option<SynthesisRequest>>,
}

impl MockTTS {
    pub fn returning(audio: &'static [u8]) -> Self {
        Self {
            result: Ok(Bytes::from_static(audio)),
            calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
        }
    }

    pub fn failing(error: TTSError) -> Self {
        Self {
            result: Err(error),
            calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<SynthesisRequest> {
        self.last_request.lock().clone()
    }
}

#[async_trait]
impl BaseTTS for MockTTS {
    fn provider_name(&self) -> &'static str {
        "mock"
    }

    async fn synthesize(&self, request: SynthesisRequest) -> TTSResult<SynthesisResult> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock() = Some(request);
        let audio = self.result.clone()?;
        Ok(SynthesisResult {
            audio,
            request_id: "mock-task".to_string(),
            format: "mp3".to_string(),
        })
    }
}

/// Recognition backend with a canned result.
///
/// Records every path it was asked to read and whether that file existed at
/// the time.
pub struct MockRecognition {
    result: Result<RecognitionResult, RecognitionError>,
    seen: Mutex<Vec<(PathBuf, bool)>>,
}

impl MockRecognition {
    pub fn hearing(text: &str) -> Self {
        Self {
            result: Ok(RecognitionResult {
                text: text.to_string(),
                confidence: Some(0.9),
            }),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(error: RecognitionError) -> Self {
        Self {
            result: Err(error),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.seen.lock().len()
    }

    /// Paths handed to the backend, with whether each existed during the call
    pub fn seen(&self) -> Vec<(PathBuf, bool)> {
        self.seen.lock().clone()
    }
}

#[async_trait]
impl RecognitionBackend for MockRecognition {
    async fn recognize_file(
        &self,
        path: &Path,
        _format: &str,
    ) -> Result<RecognitionResult, RecognitionError> {
        self.seen.lock().push((path.to_path_buf(), path.exists()));
        self.result.clone()
    }
}

/// Per-operation call counters of [`MockEnrollment`]
#[derive(Debug, Default)]
pub struct EnrollmentCalls {
    pub create: AtomicUsize,
    pub list: AtomicUsize,
    pub query: AtomicUsize,
    pub update: AtomicUsize,
    pub delete: AtomicUsize,
}

impl EnrollmentCalls {
    pub fn total(&self) -> usize {
        self.create.load(Ordering::SeqCst)
            + self.list.load(Ordering::SeqCst)
            + self.query.load(Ordering::SeqCst)
            + self.update.load(Ordering::SeqCst)
            + self.delete.load(Ordering::SeqCst)
    }
}

/// Enrollment provider backed by an in-memory voice list
#[derive(Default)]
pub struct MockEnrollment {
    remote: Mutex<Vec<RemoteVoice>>,
    next_id: AtomicUsize,
    failing: Mutex<bool>,
    pub calls: EnrollmentCalls,
}

impl MockEnrollment {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Make every following call fail with an API error
    pub fn set_failing(&self, failing: bool) {
        *self.failing.lock() = failing;
    }

    /// Replace what the provider reports for `voice_id`
    pub fn set_remote(&self, voice: RemoteVoice) {
        let mut remote = self.remote.lock();
        remote.retain(|v| v.voice_id != voice.voice_id);
        remote.push(voice);
    }

    pub fn remote_ids(&self) -> Vec<String> {
        self.remote.lock().iter().map(|v| v.voice_id.clone()).collect()
    }

    fn check(&self) -> EnrollmentResult<()> {
        if *self.failing.lock() {
            return Err(EnrollmentError::Api {
                code: "Throttling".to_string(),
                message: "mock provider unavailable".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl VoiceEnrollment for MockEnrollment {
    async fn create_voice(
        &self,
        target_model: &str,
        prefix: &str,
        _url: &str,
    ) -> EnrollmentResult<String> {
        self.calls.create.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        let n = self.next_id.fetch_add(1, Ordering::SeqCst);
        let voice_id = format!("{target_model}-{prefix}-{n:04}");
        self.remote.lock().push(RemoteVoice {
            voice_id: voice_id.clone(),
            status: Some("DEPLOYING".to_string()),
            target_model: Some(target_model.to_string()),
            ..Default::default()
        });
        Ok(voice_id)
    }

    async fn list_voices(
        &self,
        _prefix: Option<&str>,
        _page_index: u32,
        _page_size: u32,
    ) -> EnrollmentResult<Vec<RemoteVoice>> {
        self.calls.list.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        Ok(self.remote.lock().clone())
    }

    async fn query_voice(&self, voice_id: &str) -> EnrollmentResult<RemoteVoice> {
        self.calls.query.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        self.remote
            .lock()
            .iter()
            .find(|v| v.voice_id == voice_id)
            .cloned()
            .ok_or_else(|| EnrollmentError::Api {
                code: "ResourceNotFound".to_string(),
                message: format!("voice {voice_id} not found"),
            })
    }

    async fn update_voice(&self, _voice_id: &str, _url: &str) -> EnrollmentResult<()> {
        self.calls.update.fetch_add(1, Ordering::SeqCst);
        self.check()
    }

    async fn delete_voice(&self, voice_id: &str) -> EnrollmentResult<()> {
        self.calls.delete.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        self.remote.lock().retain(|v| v.voice_id != voice_id);
        Ok(())
    }
}

/// In-memory storage whose signed URLs are always `url`.
///
/// Remembers every uploaded key.
pub struct MockStorage {
    inner: InMemoryBackend,
    url: String,
    fail_puts: bool,
    keys: Mutex<Vec<String>>,
}

impl MockStorage {
    pub fn new(url: &str) -> Arc<Self> {
        Arc::new(Self {
            inner: InMemoryBackend::new("voice-clone-bucket"),
            url: url.to_string(),
            fail_puts: false,
            keys: Mutex::new(Vec::new()),
        })
    }

    /// Storage rejecting every upload
    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            inner: InMemoryBackend::new("voice-clone-bucket"),
            url: String::new(),
            fail_puts: true,
            keys: Mutex::new(Vec::new()),
        })
    }

    pub fn uploaded_keys(&self) -> Vec<String> {
        self.keys.lock().clone()
    }

    pub async fn object(&self, key: &str) -> Bytes {
        self.inner.get(key).await.unwrap()
    }
}

#[async_trait]
impl StorageBackend for MockStorage {
    fn bucket(&self) -> &str {
        self.inner.bucket()
    }

    async fn bucket_exists(&self) -> StorageResult<bool> {
        self.inner.bucket_exists().await
    }

    async fn create_bucket(&self) -> StorageResult<()> {
        self.inner.create_bucket().await
    }

    async fn put(&self, key: &str, data: Bytes) -> StorageResult<()> {
        if self.fail_puts {
            return Err(StorageError::Http("503 Service Unavailable".to_string()));
        }
        self.keys.lock().push(key.to_string());
        self.inner.put(key, data).await
    }

    async fn get(&self, key: &str) -> StorageResult<Bytes> {
        self.inner.get(key).await
    }

    async fn delete(&self, key: &str) -> StorageResult<()> {
        self.inner.delete(key).await
    }

    async fn signed_url(&self, _key: &str, _expires_in: Duration) -> StorageResult<String> {
        Ok(self.url.clone())
    }
}
