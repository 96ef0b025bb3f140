pub mod naming;
pub use naming::{response_object_name, sample_object_name, unix_timestamp, voice_prefix};
pub mod scratch;
pub use scratch::ScratchFile;
