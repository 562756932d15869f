//! The S3 artifact publisher.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, warn};
use rusoto_core::{ByteStream, HttpClient, Region};
use rusoto_credential::StaticProvider;
use rusoto_s3::S3Client;
use tokio::fs::File;

use crate::cancel::run_cancellable;
use crate::config::{PublishContext, S3Options};
use crate::constants::DEFAULT_ACL;
use crate::credentials::CredentialProvider;
use crate::error::{PublishError, Result};
use crate::progress::{FileProgressStream, ProgressReporter, SourceErrorSlot};
use crate::publisher::store::{ObjectStore, PutRequest, S3Store};
use crate::publisher::Publisher;

/// Publishes build artifacts to an S3 bucket.
///
/// One upload call moves through `stat -> stream -> settled`: the file is
/// statted for its size, a progress-tracking stream over the file becomes
/// the transfer body, and the transfer runs under the session cancellation
/// token until it succeeds, fails or is cancelled. Terminal outcomes are
/// final; the file handle is owned by the body stream and dropped on every
/// exit path.
pub struct S3Publisher {
    context: PublishContext,
    options: S3Options,
    store: Arc<dyn ObjectStore>,
}

impl S3Publisher {
    /// Construct a publisher for one bucket.
    ///
    /// Credentials are resolved eagerly so a missing or blank variable
    /// fails here, before any network activity, with an error naming the
    /// variable. An unparseable region falls back to the SDK default.
    pub fn new(
        context: PublishContext,
        options: S3Options,
        credentials: &dyn CredentialProvider,
    ) -> Result<Self> {
        debug!("Creating S3 publisher for bucket: {}", options.bucket);

        let resolved = credentials.resolve()?;

        let region = match options.region.as_deref() {
            Some(name) => match name.parse::<Region>() {
                Ok(region) => region,
                Err(_) => {
                    warn!("Invalid region '{}', using default", name);
                    Region::default()
                }
            },
            None => Region::default(),
        };

        let http_client = HttpClient::new().map_err(|e| PublishError::Configuration {
            message: format!("Failed to create HTTP client: {}", e),
        })?;
        let provider =
            StaticProvider::new_minimal(resolved.access_key_id, resolved.secret_access_key);
        let client = S3Client::new_with(http_client, provider, region);

        Ok(S3Publisher {
            context,
            options,
            store: Arc::new(S3Store::new(client)),
        })
    }

    /// Construct a publisher over an explicit store implementation.
    ///
    /// This is the seam used by tests to substitute the transfer
    /// collaborator; production code goes through [`S3Publisher::new`].
    pub fn with_store(
        context: PublishContext,
        options: S3Options,
        store: Arc<dyn ObjectStore>,
    ) -> Self {
        S3Publisher {
            context,
            options,
            store,
        }
    }

    /// Run one transfer under the session token and classify its outcome.
    ///
    /// The storage SDK reports a failing body stream as a transfer-level
    /// dispatch error, so a failed transfer is checked against the read
    /// error slot first: a recorded read error means the local file, not
    /// the network, killed the upload, and the outcome is a source-read
    /// failure.
    async fn transfer(
        &self,
        key: &str,
        content_type: String,
        content_length: u64,
        body: ByteStream,
        read_error: SourceErrorSlot,
    ) -> Result<String> {
        let request = PutRequest {
            bucket: self.options.bucket.clone(),
            key: key.to_string(),
            acl: self
                .options
                .acl
                .clone()
                .unwrap_or_else(|| DEFAULT_ACL.to_string()),
            storage_class: self.options.storage_class.clone(),
            content_type,
            content_length,
            body,
        };

        let abort_key = key.to_string();
        run_cancellable(
            &self.context.cancellation,
            self.store.put(request),
            // Dropping the put future aborts the in-flight request; this
            // hook only records that the abort happened.
            move || warn!("Upload of {} aborted by cancellation request", abort_key),
        )
        .await
        .map_err(|error| read_error.classify(error))
    }

    fn destination_key(file: &Path, artifact_name: Option<&str>) -> Result<String> {
        match artifact_name {
            Some(name) => Ok(name.to_string()),
            None => file
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .ok_or_else(|| {
                    PublishError::SourceRead(std::io::Error::new(
                        std::io::ErrorKind::InvalidInput,
                        format!("No file name component in {}", file.display()),
                    ))
                }),
        }
    }
}

#[async_trait]
impl Publisher for S3Publisher {
    async fn upload(&self, file: &Path, artifact_name: Option<&str>) -> Result<String> {
        // A session that is already cancelled must not touch the file or
        // the network at all.
        if self.context.is_cancelled() {
            return Err(PublishError::Cancelled);
        }

        let key = Self::destination_key(file, artifact_name)?;

        let metadata = tokio::fs::metadata(file)
            .await
            .map_err(PublishError::SourceRead)?;
        if !metadata.is_file() {
            return Err(PublishError::SourceRead(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("{} is not a regular file", file.display()),
            )));
        }
        let size = metadata.len();

        let reporter = Arc::new(ProgressReporter::new(&key, size));
        let handle = File::open(file).await.map_err(PublishError::SourceRead)?;
        let body = FileProgressStream::from_file(handle, size, Arc::clone(&reporter));
        let read_error = body.error_slot();

        let content_type = mime_guess::from_path(&key)
            .first_or_octet_stream()
            .essence_str()
            .to_string();

        let location = self
            .transfer(&key, content_type, size, ByteStream::new(body), read_error)
            .await?;

        debug!("{} was uploaded to {}", key, location);
        Ok(location)
    }

    fn provider_name(&self) -> &'static str {
        "S3"
    }
}

impl fmt::Display for S3Publisher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "S3 (bucket: {})", self.options.bucket)
    }
}

#[cfg(test)]
mod tests {
    use std::io::{self, Write};

    use bytes::BytesMut;
    use futures::StreamExt;
    use tempfile::NamedTempFile;

    use super::*;
    use crate::progress::ProgressTrackingStream;
    use crate::publisher::store::MockObjectStore;

    /// Drains the body the way a real storage client does: a body stream
    /// error surfaces as a transfer-level dispatch failure, never as a
    /// source-read error.
    struct DispatchFailingStore;

    #[async_trait]
    impl ObjectStore for DispatchFailingStore {
        async fn put(&self, request: PutRequest) -> Result<String> {
            let location = format!("s3://{}/{}", request.bucket, request.key);
            let mut body = request.body;
            while let Some(chunk) = body.next().await {
                if let Err(error) = chunk {
                    return Err(PublishError::transfer(error));
                }
            }
            Ok(location)
        }
    }

    fn publisher_with(store: MockObjectStore, options: S3Options) -> S3Publisher {
        S3Publisher::with_store(PublishContext::new(), options, Arc::new(store))
    }

    fn temp_artifact(contents: &[u8]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents).unwrap();
        file
    }

    #[tokio::test]
    async fn test_upload_resolves_with_store_location() {
        let mut store = MockObjectStore::new();
        store
            .expect_put()
            .withf(|req| req.bucket == "releases" && req.acl == "public-read")
            .returning(|req| Ok(format!("s3://{}/{}", req.bucket, req.key)));

        let publisher = publisher_with(store, S3Options::new("releases"));
        let artifact = temp_artifact(b"installer bytes");

        let location = publisher
            .upload(artifact.path(), Some("app-1.0.0.exe"))
            .await
            .unwrap();
        assert_eq!(location, "s3://releases/app-1.0.0.exe");
    }

    #[tokio::test]
    async fn test_key_defaults_to_basename() {
        let mut store = MockObjectStore::new();
        store
            .expect_put()
            .returning(|req| Ok(format!("s3://{}/{}", req.bucket, req.key)));

        let publisher = publisher_with(store, S3Options::new("releases"));
        let artifact = temp_artifact(b"data");
        let basename = artifact
            .path()
            .file_name()
            .unwrap()
            .to_string_lossy()
            .into_owned();

        let location = publisher.upload(artifact.path(), None).await.unwrap();
        assert_eq!(location, format!("s3://releases/{}", basename));
    }

    #[tokio::test]
    async fn test_request_carries_metadata_and_options() {
        let mut store = MockObjectStore::new();
        store
            .expect_put()
            .withf(|req| {
                req.key == "app-1.0.0.exe"
                    && req.content_length == 15
                    && req.content_type == "application/x-msdownload"
                    && req.acl == "private"
                    && req.storage_class.as_deref() == Some("STANDARD_IA")
            })
            .returning(|_| Ok("s3://releases/app-1.0.0.exe".to_string()));

        let options = S3Options::new("releases")
            .acl("private")
            .storage_class("STANDARD_IA");
        let publisher = publisher_with(store, options);
        let artifact = temp_artifact(b"installer bytes");

        publisher
            .upload(artifact.path(), Some("app-1.0.0.exe"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_missing_file_is_source_read_error() {
        let store = MockObjectStore::new();
        let publisher = publisher_with(store, S3Options::new("releases"));

        let result = publisher
            .upload(Path::new("/nonexistent/app.exe"), None)
            .await;
        assert!(matches!(result, Err(PublishError::SourceRead(_))));
    }

    #[tokio::test]
    async fn test_transfer_error_surfaces_verbatim() {
        let mut store = MockObjectStore::new();
        store.expect_put().returning(|_| {
            Err(PublishError::transfer(std::io::Error::new(
                std::io::ErrorKind::Other,
                "network unreachable",
            )))
        });

        let publisher = publisher_with(store, S3Options::new("releases"));
        let artifact = temp_artifact(b"data");

        let result = publisher.upload(artifact.path(), None).await;
        match result {
            Err(PublishError::Transfer(cause)) => {
                assert!(cause.to_string().contains("network unreachable"));
            }
            other => panic!("expected transfer error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_cancelled_session_rejects_before_transfer() {
        let mut store = MockObjectStore::new();
        // put must never be reached once the session is cancelled.
        store.expect_put().never();

        let context = PublishContext::new();
        context.cancel();
        let publisher =
            S3Publisher::with_store(context, S3Options::new("releases"), Arc::new(store));
        let artifact = temp_artifact(b"data");

        let result = publisher.upload(artifact.path(), None).await;
        assert!(matches!(result, Err(PublishError::Cancelled)));
    }

    #[tokio::test]
    async fn test_two_uploads_are_independent() {
        let mut store = MockObjectStore::new();
        store
            .expect_put()
            .times(2)
            .returning(|req| Ok(format!("s3://{}/{}", req.bucket, req.key)));

        let publisher = publisher_with(store, S3Options::new("releases"));
        let artifact = temp_artifact(b"data");

        let first = publisher.upload(artifact.path(), Some("a.bin")).await;
        let second = publisher.upload(artifact.path(), Some("a.bin")).await;
        assert!(first.is_ok());
        assert!(second.is_ok());
    }

    #[tokio::test]
    async fn test_midstream_read_error_is_classified_as_source_read() {
        let publisher = S3Publisher::with_store(
            PublishContext::new(),
            S3Options::new("releases"),
            Arc::new(DispatchFailingStore),
        );

        let reporter = Arc::new(ProgressReporter::new("app-1.0.0.exe", 100));
        let source = futures::stream::iter(vec![
            Ok(BytesMut::from(&b"data"[..])),
            Err(io::Error::new(io::ErrorKind::Other, "read failed mid-stream")),
        ]);
        let body = ProgressTrackingStream::new(source, 100, reporter);
        let read_error = body.error_slot();

        let result = publisher
            .transfer(
                "app-1.0.0.exe",
                "application/x-msdownload".to_string(),
                100,
                ByteStream::new(body),
                read_error,
            )
            .await;

        match result {
            Err(PublishError::SourceRead(cause)) => {
                assert_eq!(cause.to_string(), "read failed mid-stream");
            }
            other => panic!("expected source read error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_remote_failure_without_read_error_stays_transfer() {
        // The store itself fails after a clean body; classification must
        // leave the transfer error untouched.
        let mut store = MockObjectStore::new();
        store.expect_put().returning(|_| {
            Err(PublishError::transfer(io::Error::new(
                io::ErrorKind::ConnectionReset,
                "connection reset",
            )))
        });
        let publisher = S3Publisher::with_store(
            PublishContext::new(),
            S3Options::new("releases"),
            Arc::new(store),
        );

        let reporter = Arc::new(ProgressReporter::new("app.exe", 4));
        let source = futures::stream::iter(vec![Ok(BytesMut::from(&b"data"[..]))]);
        let body = ProgressTrackingStream::new(source, 4, reporter);
        let read_error = body.error_slot();

        let result = publisher
            .transfer(
                "app.exe",
                "application/x-msdownload".to_string(),
                4,
                ByteStream::new(body),
                read_error,
            )
            .await;
        assert!(matches!(result, Err(PublishError::Transfer(_))));
    }

    #[test]
    fn test_display_names_bucket() {
        let publisher = S3Publisher::with_store(
            PublishContext::new(),
            S3Options::new("releases"),
            Arc::new(MockObjectStore::new()),
        );
        assert_eq!(publisher.to_string(), "S3 (bucket: releases)");
        assert_eq!(publisher.provider_name(), "S3");
    }
}
