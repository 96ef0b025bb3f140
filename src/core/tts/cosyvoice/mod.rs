//! DashScope CosyVoice synthesis.
//!
//! One WebSocket connection per synthesis call:
//!
//! 1. client `run-task` (model, voice, format, sample rate, volume, rate)
//! 2. server `task-started`
//! 3. client `continue-task` with the text, then `finish-task`
//! 4. server binary frames carrying audio, interleaved with `result-generated`
//! 5. server `task-finished`, or `task-failed` with an error code
//!
//! # Authentication
//!
//! `Authorization: bearer <DASHSCOPE_API_KEY>` on the upgrade request.

pub mod config;
pub mod messages;
pub mod provider;

pub use config::CosyVoiceConfig;
pub use messages::{ClientMessage, ServerEvent, ServerMessage, SynthesisParameters, TaskAction};
pub use provider::CosyVoiceTTS;

// =============================================================================
// API Constants
// =============================================================================

/// DashScope duplex inference endpoint
pub const COSYVOICE_WS_URL: &str = "wss://dashscope.aliyuncs.com/api-ws/v1/inference";

// =============================================================================
// Defaults
// =============================================================================

pub const DEFAULT_MODEL: &str = "cosyvoice-v2";

pub const DEFAULT_FORMAT: &str = "mp3";

/// Default sample rate in Hz
pub const DEFAULT_SAMPLE_RATE: u32 = 24000;

pub const DEFAULT_SPEED: f32 = 1.0;

pub const DEFAULT_VOLUME: u32 = 100;
