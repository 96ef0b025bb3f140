//! Process-local storage backend.
//!
//! Objects live in an [`object_store::memory::InMemory`] store for the
//! lifetime of the backend. Signed URLs use a `memory://` scheme and are not
//! fetchable over the network; they are stable so tests can assert on them.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use object_store::memory::InMemory;
use object_store::{ObjectStore, PutPayload};

use super::base::{StorageBackend, StorageResult, map_store_error, object_path};

pub struct InMemoryBackend {
    store: InMemory,
    bucket: String,
    bucket_created: AtomicBool,
}

impl InMemoryBackend {
    /// Create a backend for `bucket`. The bucket starts out absent.
    pub fn new(bucket: impl Into<String>) -> Self {
        Self {
            store: InMemory::new(),
            bucket: bucket.into(),
            bucket_created: AtomicBool::new(false),
        }
    }
}

#[async_trait]
impl StorageBackend for InMemoryBackend {
    fn bucket(&self) -> &str {
        &self.bucket
    }

    async fn bucket_exists(&self) -> StorageResult<bool> {
        Ok(self.bucket_created.load(Ordering::SeqCst))
    }

    async fn create_bucket(&self) -> StorageResult<()> {
        self.bucket_created.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn put(&self, key: &str, data: Bytes) -> StorageResult<()> {
        let path = object_path(key)?;
        self.store.put(&path, PutPayload::from(data)).await?;
        Ok(())
    }

    async fn get(&self, key: &str) -> StorageResult<Bytes> {
        let path = object_path(key)?;
        let result = self
            .store
            .get(&path)
            .await
            .map_err(|e| map_store_error(key, e))?;
        Ok(result.bytes().await?)
    }

    async fn delete(&self, key: &str) -> StorageResult<()> {
        let path = object_path(key)?;
        self.store
            .delete(&path)
            .await
            .map_err(|e| map_store_error(key, e))
    }

    async fn signed_url(&self, key: &str, expires_in: Duration) -> StorageResult<String> {
        let path = object_path(key)?;
        Ok(format!(
            "memory://{}/{}?expires={}",
            self.bucket,
            path,
            expires_in.as_secs()
        ))
    }
}
