use thiserror::Error;

use crate::core::chat::ChatError;
use crate::core::enrollment::EnrollmentError;
use crate::core::registry::RegistryError;
use crate::core::storage::StorageError;
use crate::core::stt::RecognitionError;
use crate::core::tts::TTSError;

/// Result type for operations spanning several components
pub type AppResult<T> = Result<T, AppError>;

/// Errors surfaced while building or running the dialogue stack
#[derive(Debug, Error)]
pub enum AppError {
    /// Missing or invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Recognition(#[from] RecognitionError),

    #[error(transparent)]
    Synthesis(#[from] TTSError),

    #[error(transparent)]
    Enrollment(#[from] EnrollmentError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Chat(#[from] ChatError),

    /// Local filesystem failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
