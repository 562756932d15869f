//! Global constants for the artifact publisher.
//!
//! This module centralizes hardcoded values to improve maintainability
//! and make configuration changes easier.

/// Default ACL applied to uploaded objects when none is configured
pub const DEFAULT_ACL: &str = "public-read";

/// Read buffer size for streaming file chunks into the transfer body (64KB)
pub const STREAM_CHUNK_SIZE: usize = 64 * 1024;

/// Progress is logged each time the transferred percentage crosses
/// a multiple of this step
pub const PROGRESS_LOG_STEP_PERCENT: u64 = 10;

/// Environment variable holding the storage access key id
pub const ENV_ACCESS_KEY_ID: &str = "AWS_ACCESS_KEY_ID";

/// Environment variable holding the storage secret access key
pub const ENV_SECRET_ACCESS_KEY: &str = "AWS_SECRET_ACCESS_KEY";

/// Exit code reported when a publish session is cancelled by the user
pub const EXIT_CODE_CANCELLED: i32 = 130;
