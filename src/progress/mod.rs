//! Upload progress tracking.
//!
//! Two pieces cooperate here:
//!
//! - [`ProgressReporter`] holds the byte counters for one upload and
//!   renders a throttled, human-readable progress line. It knows nothing
//!   about files or the network.
//! - [`ProgressTrackingStream`] wraps the raw chunk stream feeding the
//!   transfer body so that every chunk read also advances the reporter,
//!   and read errors surface immediately instead of stalling the upload.
//!
//! Counters are atomics so the stream can update them from the polling
//! context without locks, and so concurrent uploads never share state:
//! each upload owns its own reporter for the duration of one call.

pub mod reporter;
pub mod stream;

pub use reporter::{ProgressReporter, TransferProgress};
pub use stream::{FileProgressStream, ProgressTrackingStream, SourceErrorSlot};
