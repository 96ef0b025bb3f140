//! Remote voice enrollment (voice cloning).
//!
//! [`VoiceEnrollment`] is the provider seam used by the voice registry. The
//! production implementation is [`DashScopeEnrollment`], which drives the
//! DashScope customization REST endpoint:
//!
//! ```text
//! POST {base}/services/audio/tts/customization
//! Authorization: Bearer <DASHSCOPE_API_KEY>
//! {"model": "voice-enrollment", "input": {"action": "create_voice", ...}}
//! ```

mod base;
pub mod dashscope;
pub mod messages;

pub use base::{EnrollmentError, EnrollmentResult, RemoteVoice, VoiceEnrollment};
pub use dashscope::{DASHSCOPE_API_URL, DashScopeEnrollment, EnrollmentConfig};

/// Largest page the listing endpoint returns
pub const MAX_PAGE_SIZE: u32 = 100;
