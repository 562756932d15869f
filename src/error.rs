//! Error types for the artifact publisher.
//!
//! Every failure an upload can produce maps onto exactly one variant so
//! that orchestrators can branch on the kind of failure, in particular
//! telling a cancelled upload apart from a transfer that genuinely failed.

use thiserror::Error;

/// Result type alias for publisher operations
pub type Result<T> = std::result::Result<T, PublishError>;

/// Error taxonomy for publishing operations.
///
/// Exactly one of these variants terminates every failed upload:
///
/// * `Configuration` - required configuration or credentials were missing
///   at construction, before any network activity
/// * `SourceRead` - the local artifact could not be opened or failed
///   mid-stream
/// * `Transfer` - the remote storage collaborator reported a failure;
///   the underlying cause is surfaced verbatim, no retry at this layer
/// * `Cancelled` - the session's cancellation signal fired while the
///   upload was in flight
#[derive(Debug, Error)]
pub enum PublishError {
    /// Required configuration missing or invalid at construction
    #[error("{message}")]
    Configuration { message: String },

    /// The local artifact could not be read
    #[error("Failed to read source artifact: {0}")]
    SourceRead(#[source] std::io::Error),

    /// The remote transfer collaborator reported a failure
    #[error("Transfer failed: {0}")]
    Transfer(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The upload was aborted by the session's cancellation signal
    #[error("Upload cancelled")]
    Cancelled,
}

impl PublishError {
    /// Build a configuration error for a missing environment variable,
    /// naming the variable so the operator knows what to set.
    pub fn missing_env(variable: &str) -> Self {
        PublishError::Configuration {
            message: format!("Env {} is not set", variable),
        }
    }

    /// Wrap a transfer collaborator failure.
    pub fn transfer<E>(cause: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        PublishError::Transfer(Box::new(cause))
    }

    /// True if this outcome is a cancellation rather than a failure.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, PublishError::Cancelled)
    }
}
