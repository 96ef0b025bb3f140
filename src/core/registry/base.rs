use thiserror::Error;

use crate::core::enrollment::EnrollmentError;

/// Errors raised by the voice registry
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Voice not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Enrollment(#[from] EnrollmentError),

    #[error("Voice registry I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Voice registry file is malformed: {0}")]
    Malformed(#[from] serde_json::Error),
}

pub type RegistryResult<T> = Result<T, RegistryError>;
