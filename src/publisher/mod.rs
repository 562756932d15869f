//! Publisher implementations for pushing build artifacts to remote
//! destinations.
//!
//! A [`Publisher`] owns the upload contract for one destination type.
//! The orchestrator constructs one publisher per configured destination,
//! hands every publisher the same session [`PublishContext`], and calls
//! [`Publisher::upload`] once per artifact. Each call is an independent
//! operation with its own file handle, metadata and progress state; the
//! only thing concurrent uploads share is the session cancellation
//! signal.
//!
//! The actual network transfer is delegated to an [`ObjectStore`], an
//! opaque collaborator that owns retries, checksumming and multipart
//! mechanics. This crate only wires a progress-tracked body into it and
//! keeps the operation abortable.
//!
//! [`PublishContext`]: crate::config::PublishContext
//! [`ObjectStore`]: store::ObjectStore

use std::fmt;
use std::path::Path;

use async_trait::async_trait;

use crate::error::Result;

pub mod s3;
pub mod store;

pub use s3::S3Publisher;
pub use store::{ObjectStore, PutRequest, S3Store};

/// The upload contract implemented once per destination type.
///
/// `Display` supplies the human-readable destination descriptor shown in
/// orchestrator output, e.g. `S3 (bucket: releases)`.
#[async_trait]
pub trait Publisher: Send + Sync + fmt::Display {
    /// Upload one artifact, resolving to the remote location string.
    ///
    /// The destination key is `artifact_name` when given, otherwise the
    /// file's base name. Two calls for the same file perform two
    /// independent transfers; nothing is deduplicated.
    async fn upload(&self, file: &Path, artifact_name: Option<&str>) -> Result<String>;

    /// Short provider tag used in diagnostics.
    fn provider_name(&self) -> &'static str;
}
