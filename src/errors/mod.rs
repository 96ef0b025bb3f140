//! Crate-level error types
//!
//! Each component owns its own error enum in its `base.rs`. `AppError`
//! aggregates them for operations that span several components, such as
//! wiring a [`crate::VoiceDialogue`] from configuration.

pub mod app_error;
