//! Process-level setup helpers.
//!
//! A host application calls these once at startup, before building a
//! [`crate::VoiceDialogue`]:
//!
//! ```rust,no_run
//! use voice_dialogue::{DialogueConfig, VoiceDialogue, init};
//!
//! # async fn start() -> Result<(), Box<dyn std::error::Error>> {
//! init::load_dotenv();
//! init::init_tracing();
//! init::install_crypto_provider()?;
//!
//! let config = DialogueConfig::from_env()?;
//! let dialogue = VoiceDialogue::from_config(&config).await?;
//! # let _ = dialogue;
//! # Ok(())
//! # }
//! ```

use tracing_subscriber::EnvFilter;

use crate::errors::app_error::{AppError, AppResult};

/// Load a `.env` file from the working directory, if one exists.
///
/// Values already present in the process environment win over `.env` values.
pub fn load_dotenv() {
    if let Ok(path) = dotenvy::dotenv() {
        tracing::debug!("Loaded environment from {}", path.display());
    }
}

/// Install a `fmt` subscriber filtered by `RUST_LOG` (default `info`).
///
/// Does nothing if a global subscriber is already set.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Install the ring crypto provider for rustls.
///
/// Must run before the first TLS connection. Repeated calls are harmless.
pub fn install_crypto_provider() -> AppResult<()> {
    if rustls::crypto::CryptoProvider::get_default().is_some() {
        return Ok(());
    }
    rustls::crypto::ring::default_provider()
        .install_default()
        .map_err(|_| AppError::Config("Failed to install default crypto provider".to_string()))
}
