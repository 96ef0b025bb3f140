//! S3-compatible storage backend.
//!
//! Object reads and writes go through `object_store`'s `AmazonS3` client.
//! `object_store` has no bucket management API, so bucket existence and
//! creation are done with presigned `HEAD` / `PUT` requests on the bucket
//! root, signed by the same credentials.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use object_store::aws::{AmazonS3, AmazonS3Builder};
use object_store::path::Path as ObjectPath;
use object_store::signer::Signer;
use object_store::{ObjectStore, PutPayload};
use reqwest::StatusCode;
use tracing::{debug, info};
use url::Url;

use super::base::{StorageBackend, StorageError, StorageResult, map_store_error, object_path};

/// Region whose buckets must be created without a location constraint
const US_EAST_1: &str = "us-east-1";

/// Validity of the presigned requests used for bucket management
const BUCKET_REQUEST_TTL: Duration = Duration::from_secs(60);

/// Configuration for an S3-compatible bucket
#[derive(Debug, Clone)]
pub struct S3StorageConfig {
    pub bucket: String,
    pub region: String,
    /// Service endpoint, e.g. `https://oss-cn-hangzhou.aliyuncs.com`.
    /// `None` uses the AWS endpoint for `region`.
    pub endpoint: Option<String>,
    pub access_key_id: String,
    pub secret_access_key: String,
    /// Address the bucket as a subdomain of the endpoint
    pub virtual_hosted_style: bool,
}

pub struct S3Backend {
    store: AmazonS3,
    bucket: String,
    region: String,
    http: reqwest::Client,
}

impl S3Backend {
    pub fn new(config: S3StorageConfig) -> StorageResult<Self> {
        if config.bucket.trim().is_empty() {
            return Err(StorageError::Configuration(
                "bucket name must not be empty".to_string(),
            ));
        }

        let mut builder = AmazonS3Builder::new()
            .with_bucket_name(&config.bucket)
            .with_region(&config.region)
            .with_access_key_id(&config.access_key_id)
            .with_secret_access_key(&config.secret_access_key)
            .with_virtual_hosted_style_request(config.virtual_hosted_style);

        if let Some(endpoint) = &config.endpoint {
            let endpoint = if config.virtual_hosted_style {
                bucket_endpoint(endpoint, &config.bucket)?
            } else {
                endpoint.trim_end_matches('/').to_string()
            };
            debug!("Using S3 endpoint {}", endpoint);
            builder = builder
                .with_allow_http(endpoint.starts_with("http://"))
                .with_endpoint(endpoint);
        }

        let store = builder.build()?;

        Ok(Self {
            store,
            bucket: config.bucket,
            region: config.region,
            http: reqwest::Client::new(),
        })
    }

    /// Presigned URL addressing the bucket itself rather than an object
    async fn bucket_url(&self, method: http::Method) -> StorageResult<Url> {
        Ok(self
            .store
            .signed_url(method, &ObjectPath::default(), BUCKET_REQUEST_TTL)
            .await?)
    }

    fn create_bucket_body(&self) -> Option<String> {
        (self.region != US_EAST_1).then(|| {
            format!(
                "<CreateBucketConfiguration xmlns=\"http://s3.amazonaws.com/doc/2006-03-01/\">\
                 <LocationConstraint>{}</LocationConstraint>\
                 </CreateBucketConfiguration>",
                self.region
            )
        })
    }
}

/// With virtual-hosted addressing the endpoint must already name the bucket
fn bucket_endpoint(endpoint: &str, bucket: &str) -> StorageResult<String> {
    let mut url = Url::parse(endpoint)
        .map_err(|e| StorageError::Configuration(format!("invalid endpoint {endpoint}: {e}")))?;
    let host = url
        .host_str()
        .ok_or_else(|| StorageError::Configuration(format!("endpoint has no host: {endpoint}")))?
        .to_string();

    let bucket_prefix = format!("{bucket}.");
    if !host.starts_with(&bucket_prefix) {
        url.set_host(Some(&format!("{bucket_prefix}{host}")))
            .map_err(|e| StorageError::Configuration(e.to_string()))?;
    }

    Ok(url.as_str().trim_end_matches('/').to_string())
}

#[async_trait]
impl StorageBackend for S3Backend {
    fn bucket(&self) -> &str {
        &self.bucket
    }

    async fn bucket_exists(&self) -> StorageResult<bool> {
        let url = self.bucket_url(http::Method::HEAD).await?;
        let response = self
            .http
            .head(url)
            .send()
            .await
            .map_err(|e| StorageError::Http(e.to_string()))?;

        match response.status() {
            status if status.is_success() => Ok(true),
            StatusCode::NOT_FOUND => Ok(false),
            status => Err(StorageError::Bucket(format!(
                "checking bucket {} returned {status}",
                self.bucket
            ))),
        }
    }

    async fn create_bucket(&self) -> StorageResult<()> {
        let url = self.bucket_url(http::Method::PUT).await?;
        let mut request = self.http.put(url);
        if let Some(body) = self.create_bucket_body() {
            request = request.header("Content-Type", "application/xml").body(body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| StorageError::Http(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StorageError::Bucket(format!(
                "creating bucket {} returned {status}: {body}",
                self.bucket
            )));
        }

        info!(bucket = %self.bucket, "Created bucket");
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
        let url = self
            .store
            .signed_url(http::Method::GET, &path, expires_in)
            .await?;
        Ok(url.to_string())
    }
}
