//! Speech synthesis.
//!
//! [`BaseTTS`] is the seam the dialogue pipelines synthesize through. The
//! production implementation is [`CosyVoiceTTS`], which speaks DashScope's
//! duplex WebSocket protocol and buffers the returned audio.

mod base;
pub mod cosyvoice;

pub use base::{BaseTTS, SynthesisRequest, SynthesisResult, TTSError, TTSResult};
pub use cosyvoice::{COSYVOICE_WS_URL, CosyVoiceConfig, CosyVoiceTTS};

use std::path::Path;

use tracing::{error, info};

/// Write synthesized audio to `path`, creating parent directories.
///
/// Returns `false` on any failure instead of raising.
pub async fn save_audio(audio: &[u8], path: &Path) -> bool {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        if let Err(e) = tokio::fs::create_dir_all(parent).await {
            error!("Failed to create directory {}: {}", parent.display(), e);
            return false;
        }
    }

    match tokio::fs::write(path, audio).await {
        Ok(()) => {
            info!("Saved {} bytes of audio to {}", audio.len(), path.display());
            true
        }
        Err(e) => {
            error!("Failed to save audio to {}: {}", path.display(), e);
            false
        }
    }
}
