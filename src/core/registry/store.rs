//! Flat JSON file holding the voice records.
//!
//! The whole array is read on every operation and rewritten on every
//! mutation. Writes go to a temporary file in the same directory which is
//! then renamed over the target, so readers never observe a partial file.

use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use super::base::{RegistryError, RegistryResult};
use super::record::VoiceRecord;

#[derive(Debug, Clone)]
pub struct JsonStore {
    path: PathBuf,
}

impl JsonStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create the parent directory and an empty `[]` file if missing
    pub async fn ensure_exists(&self) -> RegistryResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        if !tokio::fs::try_exists(&self.path).await? {
            self.save(&[]).await?;
        }
        Ok(())
    }

    pub async fn load(&self) -> RegistryResult<Vec<VoiceRecord>> {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        if contents.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_str(&contents)?)
    }

    /// Replace the file contents with `records`, pretty-printed
    pub async fn save(&self, records: &[VoiceRecord]) -> RegistryResult<()> {
        let json = serde_json::to_vec_pretty(records)?;
        let path = self.path.clone();

        tokio::task::spawn_blocking(move || write_atomic(&path, &json))
            .await
            .map_err(|e| RegistryError::Io(std::io::Error::other(e)))?
    }
}

fn write_atomic(path: &Path, contents: &[u8]) -> RegistryResult<()> {
    let dir = match path.parent().filter(|p| !p.as_os_str().is_empty()) {
        Some(dir) => dir,
        None => Path::new("."),
    };

    let mut file = NamedTempFile::new_in(dir)?;
    file.write_all(contents)?;
    file.as_file().sync_all()?;
    file.persist(path).map_err(|e| RegistryError::Io(e.error))?;
    Ok(())
}
