pub mod config;
pub mod core;
pub mod dialogue;
pub mod errors;
pub mod init;
pub mod utils;

// Re-export commonly used items for convenience
pub use config::DialogueConfig;
pub use core::*;
pub use dialogue::{
    ChatReply, CloneResponse, DialogueComponents, DialogueResponse, PipelineStage, VoiceDialogue,
};
pub use errors::app_error::{AppError, AppResult};
