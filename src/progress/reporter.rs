//! Progress reporting for a single upload.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use log::info;

use crate::constants::PROGRESS_LOG_STEP_PERCENT;

/// A point-in-time view of one upload's transfer progress.
///
/// `bytes_transferred` is monotonically non-decreasing over the lifetime
/// of the upload; `total_bytes` is fixed when the reporter is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferProgress {
    pub bytes_transferred: u64,
    pub total_bytes: u64,
}

impl TransferProgress {
    /// Whole-number percentage of the transfer completed. Zero-byte
    /// uploads report 0; their completion state lives in the reporter's
    /// finished flag, not in the percentage.
    pub fn percent(&self) -> u64 {
        if self.total_bytes == 0 {
            0
        } else {
            self.bytes_transferred * 100 / self.total_bytes
        }
    }
}

/// Renders upload progress for one artifact, keyed by its destination name.
///
/// `update` is cheap and never blocks or panics: it only touches atomic
/// counters and emits at most one log line per percentage step crossed.
/// `finish` marks completion as a state distinct from any partial
/// percentage, which matters for zero-byte artifacts where 0 of 0 bytes
/// is simultaneously nothing and everything.
#[derive(Debug)]
pub struct ProgressReporter {
    name: String,
    total_bytes: u64,
    bytes_transferred: AtomicU64,
    last_logged_step: AtomicU64,
    finished: AtomicBool,
}

impl ProgressReporter {
    pub fn new(name: &str, total_bytes: u64) -> Self {
        ProgressReporter {
            name: name.to_string(),
            total_bytes,
            bytes_transferred: AtomicU64::new(0),
            last_logged_step: AtomicU64::new(0),
            finished: AtomicBool::new(false),
        }
    }

    /// Record the cumulative byte count transferred so far.
    ///
    /// Values are clamped to the total and applied with `fetch_max`, so
    /// the observed sequence is non-decreasing even if callers race.
    pub fn update(&self, bytes_transferred: u64) {
        let clamped = bytes_transferred.min(self.total_bytes);
        let previous = self.bytes_transferred.fetch_max(clamped, Ordering::SeqCst);
        if clamped <= previous || self.finished.load(Ordering::SeqCst) {
            return;
        }

        let progress = self.snapshot();
        let step = progress.percent() / PROGRESS_LOG_STEP_PERCENT;
        let last = self.last_logged_step.swap(step, Ordering::SeqCst);
        if step > last {
            info!(
                "Uploading {}: {}/{} bytes ({}%)",
                self.name,
                progress.bytes_transferred,
                progress.total_bytes,
                progress.percent()
            );
        }
    }

    /// Mark the upload complete. Idempotent; only the first call logs.
    pub fn finish(&self) {
        self.bytes_transferred
            .store(self.total_bytes, Ordering::SeqCst);
        if !self.finished.swap(true, Ordering::SeqCst) {
            info!(
                "Uploading {}: done ({} bytes)",
                self.name, self.total_bytes
            );
        }
    }

    pub fn is_finished(&self) -> bool {
        self.finished.load(Ordering::SeqCst)
    }

    pub fn snapshot(&self) -> TransferProgress {
        TransferProgress {
            bytes_transferred: self.bytes_transferred.load(Ordering::SeqCst),
            total_bytes: self.total_bytes,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_updates_are_monotonic() {
        let reporter = ProgressReporter::new("app.exe", 1000);
        reporter.update(400);
        reporter.update(200);
        assert_eq!(reporter.snapshot().bytes_transferred, 400);
        reporter.update(900);
        assert_eq!(reporter.snapshot().bytes_transferred, 900);
    }

    #[test]
    fn test_update_clamps_to_total() {
        let reporter = ProgressReporter::new("app.exe", 100);
        reporter.update(5000);
        let progress = reporter.snapshot();
        assert_eq!(progress.bytes_transferred, 100);
        assert_eq!(progress.percent(), 100);
    }

    #[test]
    fn test_finish_is_distinct_and_idempotent() {
        let reporter = ProgressReporter::new("app.exe", 100);
        reporter.update(50);
        assert!(!reporter.is_finished());
        reporter.finish();
        assert!(reporter.is_finished());
        assert_eq!(reporter.snapshot().bytes_transferred, 100);
        // Second finish and late updates change nothing.
        reporter.finish();
        reporter.update(10);
        assert_eq!(reporter.snapshot().bytes_transferred, 100);
        assert!(reporter.is_finished());
    }

    #[test]
    fn test_zero_byte_upload() {
        let reporter = ProgressReporter::new("empty.txt", 0);
        assert_eq!(reporter.snapshot().percent(), 0);
        reporter.finish();
        assert!(reporter.is_finished());
        assert_eq!(reporter.snapshot().bytes_transferred, 0);
    }

    #[test]
    fn test_percent_calculation() {
        let progress = TransferProgress {
            bytes_transferred: 250,
            total_bytes: 1000,
        };
        assert_eq!(progress.percent(), 25);
    }
}
