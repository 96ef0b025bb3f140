pub mod chat;
pub mod enrollment;
pub mod registry;
pub mod session;
pub mod storage;
pub mod stt;
pub mod tts;

// Re-export commonly used types for convenience
pub use chat::{ChatCompletion, ChatError, ChatMessage, HttpChatClient, Role};
pub use enrollment::{DashScopeEnrollment, EnrollmentError, RemoteVoice, VoiceEnrollment};
pub use registry::{
    RegistryError, TargetModel, VoiceLookup, VoiceRecord, VoiceRegistry, VoiceStatus,
};
pub use session::{PipelineStage, SessionConfig, SessionStore};
pub use storage::{
    InMemoryBackend, ObjectStorage, S3Backend, StorageBackend, StorageError, UploadResult,
};
pub use stt::{
    AudioInput, GoogleSpeechBackend, RecognitionBackend, RecognitionError, RecognitionResult,
    SpeechRecognizer,
};
pub use tts::{BaseTTS, CosyVoiceTTS, SynthesisRequest, SynthesisResult, TTSError, save_audio};
