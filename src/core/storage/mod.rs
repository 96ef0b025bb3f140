//! Object storage for synthesized replies and voice samples.
//!
//! [`ObjectStorage`] is the client the rest of the crate talks to. It sits on
//! a [`StorageBackend`], which is either an S3-compatible bucket
//! ([`S3Backend`], used for Aliyun OSS, AWS S3 or MinIO) or a process-local
//! store ([`InMemoryBackend`]).
//!
//! Every successful upload returns a signed GET URL that expires after the
//! configured TTL (600 seconds by default). Callers must not cache the URL
//! beyond that window.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use voice_dialogue::core::storage::{InMemoryBackend, ObjectStorage, DEFAULT_SIGNED_URL_TTL};
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let backend = Arc::new(InMemoryBackend::new("voice-clone-bucket"));
//! let storage = ObjectStorage::connect(backend, DEFAULT_SIGNED_URL_TTL).await?;
//! let uploaded = storage.upload_bytes(vec![1u8, 2, 3], "responses/s1/1.mp3").await?;
//! println!("{}", uploaded.url);
//! # Ok(())
//! # }
//! ```

mod base;
pub mod client;
pub mod memory;
pub mod s3;

pub use base::{StorageBackend, StorageError, StorageResult, UploadResult, object_path};
pub use client::{DEFAULT_SIGNED_URL_TTL, ObjectStorage};
pub use memory::InMemoryBackend;
pub use s3::{S3Backend, S3StorageConfig};
