//! The transfer collaborator seam.
//!
//! [`ObjectStore`] abstracts the storage SDK behind a single `put`
//! operation so the publisher logic can be exercised against a test
//! double. The real implementation wraps a rusoto `S3Client`; dropping
//! the in-flight `put` future aborts the underlying HTTP request, which
//! is how cancellation reaches the wire.

use async_trait::async_trait;
use log::debug;
use rusoto_core::ByteStream;
use rusoto_s3::{PutObjectRequest, S3Client, S3};

use crate::error::{PublishError, Result};

/// One transfer request for the storage collaborator.
///
/// `content_length` must match the number of bytes `body` yields;
/// `storage_class` is passed through opaquely, `None` meaning the
/// provider default.
pub struct PutRequest {
    pub bucket: String,
    pub key: String,
    pub acl: String,
    pub storage_class: Option<String>,
    pub content_type: String,
    pub content_length: u64,
    pub body: ByteStream,
}

/// An opaque remote transfer primitive.
///
/// Implementations own retry, checksum and multipart semantics. `put`
/// resolves to the remote location string on success and must surface
/// the underlying cause verbatim on failure.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn put(&self, request: PutRequest) -> Result<String>;
}

/// The real S3-backed store.
pub struct S3Store {
    client: S3Client,
}

impl S3Store {
    pub fn new(client: S3Client) -> Self {
        S3Store { client }
    }
}

#[async_trait]
impl ObjectStore for S3Store {
    async fn put(&self, request: PutRequest) -> Result<String> {
        // put_object returns no location header, so it is synthesized
        // from the request coordinates.
        let location = format!("s3://{}/{}", request.bucket, request.key);
        debug!(
            "Putting {} bytes to {} ({})",
            request.content_length, location, request.content_type
        );

        let put = PutObjectRequest {
            bucket: request.bucket,
            key: request.key,
            acl: Some(request.acl),
            body: Some(request.body),
            content_length: Some(request.content_length as i64),
            content_type: Some(request.content_type),
            storage_class: request.storage_class,
            ..Default::default()
        };

        self.client
            .put_object(put)
            .await
            .map_err(PublishError::transfer)?;

        Ok(location)
    }
}
