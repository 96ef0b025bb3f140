//! Per-call scratch files for audio blobs
//!
//! Byte payloads that must be handed to a path-based consumer are written to a
//! uniquely named file inside a configured scratch directory. The file is
//! removed when the [`ScratchFile`] is dropped, on every exit path.

use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

/// A uniquely named temporary file that is deleted on drop
#[derive(Debug)]
pub struct ScratchFile {
    file: NamedTempFile,
}

impl ScratchFile {
    /// Create a scratch file in `dir` holding `data`.
    ///
    /// `extension` is appended as the file suffix (`wav` gives `*.wav`).
    /// The directory is created if it does not exist.
    pub fn with_bytes(dir: &Path, extension: &str, data: &[u8]) -> std::io::Result<Self> {
        std::fs::create_dir_all(dir)?;

        let suffix = format!(".{}", extension.trim_start_matches('.'));
        let mut file = tempfile::Builder::new()
            .prefix("audio_")
            .suffix(&suffix)
            .tempfile_in(dir)?;
        file.write_all(data)?;
        file.flush()?;

        Ok(Self { file })
    }

    /// Path of the scratch file on disk
    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// File name component, used when the file is uploaded under its own name
    pub fn file_name(&self) -> Option<String> {
        self.path()
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
    }

    /// Owned copy of the path
    pub fn to_path_buf(&self) -> PathBuf {
        self.path().to_path_buf()
    }
}
