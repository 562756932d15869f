//! Publish session configuration.
//!
//! [`S3Options`] carries the per-destination settings; [`PublishContext`]
//! carries the session-wide state shared by every publisher, currently
//! just the cancellation signal. The context is injected explicitly so
//! publishers hold no hidden shared state.

use tokio_util::sync::CancellationToken;

/// Destination settings for an object-storage publisher.
///
/// `acl` defaults to `public-read` at the point of use when unset.
/// `storage_class` is an opaque passthrough; its values are validated by
/// the storage provider, not here. `None` means the provider default.
#[derive(Debug, Clone)]
pub struct S3Options {
    pub bucket: String,
    pub acl: Option<String>,
    pub storage_class: Option<String>,
    pub region: Option<String>,
}

impl S3Options {
    pub fn new(bucket: &str) -> Self {
        S3Options {
            bucket: bucket.to_string(),
            acl: None,
            storage_class: None,
            region: None,
        }
    }

    pub fn acl(mut self, acl: &str) -> Self {
        self.acl = Some(acl.to_string());
        self
    }

    pub fn storage_class(mut self, storage_class: &str) -> Self {
        self.storage_class = Some(storage_class.to_string());
        self
    }

    pub fn region(mut self, region: &str) -> Self {
        self.region = Some(region.to_string());
        self
    }
}

/// Session-scoped state shared across all publishers of one publish run.
///
/// Cloning the context shares the same cancellation signal, so cancelling
/// through any clone aborts every in-flight upload of the session.
#[derive(Debug, Clone, Default)]
pub struct PublishContext {
    pub cancellation: CancellationToken,
}

impl PublishContext {
    pub fn new() -> Self {
        PublishContext {
            cancellation: CancellationToken::new(),
        }
    }

    /// Request cancellation of every upload running under this context.
    pub fn cancel(&self) {
        self.cancellation.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancellation.is_cancelled()
    }
}
