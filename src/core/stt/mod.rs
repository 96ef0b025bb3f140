//! Speech recognition.
//!
//! [`SpeechRecognizer`] turns a file or a byte blob into text. Byte input is
//! first written to a scratch file that is removed once the call returns.
//! The remote call is made by a [`RecognitionBackend`]; the production
//! backend is [`GoogleSpeechBackend`] (Cloud Speech-to-Text v1 REST).
//!
//! Two failure kinds are kept apart:
//! - [`RecognitionError::Unintelligible`]: the backend answered but heard no words
//! - [`RecognitionError::Service`]: the backend call itself failed

mod base;
pub mod google;
pub mod recognizer;

pub use base::{AudioInput, RecognitionBackend, RecognitionError, RecognitionResult};
pub use google::{GOOGLE_SPEECH_URL, GoogleSpeechBackend};
pub use recognizer::{DEFAULT_AUDIO_FORMAT, RecognizerConfig, SpeechRecognizer};
