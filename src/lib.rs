//! # artifact-publisher
//!
//! A cancellable, progress-tracked artifact publishing library. Given a
//! locally built file (for example an installer produced by a build
//! pipeline), it uploads the artifact to a remote object-storage bucket,
//! reports progress as the bytes flow, and supports cooperative
//! cancellation mid-transfer.
//!
//! ## Overview
//!
//! The crate implements one variant of a generic [`Publisher`]
//! abstraction used by build/release orchestrators to push outputs to
//! various destinations. The S3 variant streams the file through a
//! progress-tracking body into the storage SDK and keeps the whole
//! operation abortable through a shared session token.
//!
//! ## Features
//!
//! - **Streaming uploads**: the file is read in chunks and streamed as
//!   the transfer body, never buffered whole in memory
//! - **Progress tracking**: every chunk read advances a per-upload
//!   reporter rendering throttled progress lines
//! - **Cooperative cancellation**: a session-wide token aborts all
//!   in-flight uploads promptly, with a distinct `Cancelled` outcome
//! - **Typed failure taxonomy**: configuration, source-read, transfer
//!   and cancellation failures are distinguishable by the caller
//! - **Injected credentials**: credential lookup is a collaborator, not
//!   an ambient environment read, so composition roots and tests control
//!   it explicitly
//!
//! ## Usage
//!
//! ```no_run
//! use artifact_publisher::config::{PublishContext, S3Options};
//! use artifact_publisher::credentials::EnvCredentialProvider;
//! use artifact_publisher::publisher::{Publisher, S3Publisher};
//! use std::path::Path;
//!
//! # async fn example() -> artifact_publisher::error::Result<()> {
//! let context = PublishContext::new();
//! let options = S3Options::new("releases");
//! let publisher = S3Publisher::new(context.clone(), options, &EnvCredentialProvider)?;
//!
//! let location = publisher
//!     .upload(Path::new("build/app-1.0.0.exe"), None)
//!     .await?;
//! println!("Published to {}", location);
//! # Ok(())
//! # }
//! ```

pub mod cancel;
pub mod config;
pub mod constants;
pub mod credentials;
pub mod error;
pub mod progress;
pub mod publisher;

pub use config::{PublishContext, S3Options};
pub use error::{PublishError, Result};
pub use publisher::{Publisher, S3Publisher};
