use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use tracing::{error, info};

use super::base::{StorageBackend, StorageError, StorageResult, UploadResult};
use crate::utils::unix_timestamp;

/// Default validity of signed download URLs
pub const DEFAULT_SIGNED_URL_TTL: Duration = Duration::from_secs(600);

/// Bucket client used by the dialogue pipelines
#[derive(Clone)]
pub struct ObjectStorage {
    backend: Arc<dyn StorageBackend>,
    url_ttl: Duration,
}

impl ObjectStorage {
    /// Wrap `backend`, creating its bucket if it does not exist.
    ///
    /// Failing to check or create the bucket is fatal.
    pub async fn connect(
        backend: Arc<dyn StorageBackend>,
        url_ttl: Duration,
    ) -> StorageResult<Self> {
        if !backend.bucket_exists().await? {
            info!(bucket = %backend.bucket(), "Bucket does not exist, creating it");
            backend.create_bucket().await?;
        }

        Ok(Self { backend, url_ttl })
    }

    pub fn bucket(&self) -> &str {
        self.backend.bucket()
    }

    /// Validity window of URLs returned by uploads
    pub fn url_ttl(&self) -> Duration {
        self.url_ttl
    }

    /// Upload a local file.
    ///
    /// Without `object_name` the key is `<unix_ts>_<file name>`.
    pub async fn upload_file(
        &self,
        path: &Path,
        object_name: Option<&str>,
    ) -> StorageResult<UploadResult> {
        let object_name = match object_name {
            Some(name) => name.to_string(),
            None => {
                let file_name = path
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned())
                    .ok_or_else(|| {
                        StorageError::InvalidObjectName(format!(
                            "cannot derive object name from {}",
                            path.display()
                        ))
                    })?;
                format!("{}_{}", unix_timestamp(), file_name)
            }
        };

        let data = tokio::fs::read(path).await.map_err(|e| {
            error!("Failed to read {} for upload: {}", path.display(), e);
            StorageError::Io(e)
        })?;

        self.upload_bytes(data, &object_name).await
    }

    /// Upload a byte blob under `object_name`
    pub async fn upload_bytes(
        &self,
        data: impl Into<Bytes>,
        object_name: &str,
    ) -> StorageResult<UploadResult> {
        let data = data.into();
        let size = data.len();

        if let Err(e) = self.backend.put(object_name, data).await {
            error!(object_name = %object_name, "Upload failed: {}", e);
            return Err(e);
        }

        let url = self.signed_url(object_name).await?;
        info!(object_name = %object_name, size, "Uploaded object");

        Ok(UploadResult {
            url,
            object_name: object_name.to_string(),
        })
    }

    /// Download an object to `dest`, creating parent directories
    pub async fn download_file(&self, object_name: &str, dest: &Path) -> StorageResult<()> {
        let data = self.backend.get(object_name).await.map_err(|e| {
            error!(object_name = %object_name, "Download failed: {}", e);
            e
        })?;

        if let Some(parent) = dest.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(dest, &data).await?;

        info!(object_name = %object_name, "Downloaded object to {}", dest.display());
        Ok(())
    }

    pub async fn delete_object(&self, object_name: &str) -> StorageResult<()> {
        self.backend.delete(object_name).await.map_err(|e| {
            error!(object_name = %object_name, "Delete failed: {}", e);
            e
        })?;
        info!(object_name = %object_name, "Deleted object");
        Ok(())
    }

    /// Fresh signed GET URL for an existing object
    pub async fn signed_url(&self, object_name: &str) -> StorageResult<String> {
        self.backend.signed_url(object_name, self.url_ttl).await
    }
}
