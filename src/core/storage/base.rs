use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use object_store::path::Path as ObjectPath;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised by object storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Object store error: {0}")]
    ObjectStore(#[from] object_store::Error),

    #[error("Object not found: {0}")]
    NotFound(String),

    #[error("Invalid object name: {0}")]
    InvalidObjectName(String),

    #[error("Bucket error: {0}")]
    Bucket(String),

    #[error("Storage configuration error: {0}")]
    Configuration(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(String),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Outcome of a successful upload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadResult {
    /// Signed, time-limited GET URL for the object
    pub url: String,
    /// Key the object was stored under
    pub object_name: String,
}

/// Backend operations over a single bucket
#[async_trait]
pub trait StorageBackend: Send + Sync {
    /// Name of the bucket this backend addresses
    fn bucket(&self) -> &str;

    async fn bucket_exists(&self) -> StorageResult<bool>;

    /// Create the bucket as private
    async fn create_bucket(&self) -> StorageResult<()>;

    async fn put(&self, key: &str, data: Bytes) -> StorageResult<()>;

    async fn get(&self, key: &str) -> StorageResult<Bytes>;

    async fn delete(&self, key: &str) -> StorageResult<()>;

    /// Signed GET URL for `key`, valid for `expires_in`
    async fn signed_url(&self, key: &str, expires_in: Duration) -> StorageResult<String>;
}

/// Parse an object key into a store path.
///
/// Keys are `/`-separated and must be non-empty.
pub fn object_path(key: &str) -> StorageResult<ObjectPath> {
    if key.trim().is_empty() {
        return Err(StorageError::InvalidObjectName(
            "object name must not be empty".to_string(),
        ));
    }
    ObjectPath::parse(key).map_err(|e| StorageError::InvalidObjectName(format!("{key}: {e}")))
}

/// Map a store error to [`StorageError::NotFound`] where applicable
pub(crate) fn map_store_error(key: &str, err: object_store::Error) -> StorageError {
    match err {
        object_store::Error::NotFound { .. } => StorageError::NotFound(key.to_string()),
        other => StorageError::ObjectStore(other),
    }
}
