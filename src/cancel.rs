//! Cancellation wiring for in-flight uploads.
//!
//! A publish session shares one [`CancellationToken`] across all of its
//! uploads. The token is level-triggered: observing it late is safe, it
//! stays cancelled. The abort action itself is edge-triggered and runs
//! at most once per operation.

use std::future::Future;

use tokio_util::sync::CancellationToken;

use crate::error::{PublishError, Result};

/// Drive an upload future to completion unless the session token fires first.
///
/// If the token is cancelled before the operation settles, `on_abort` is
/// invoked exactly once, the in-flight future is dropped (which aborts the
/// underlying request), and the outcome is [`PublishError::Cancelled`].
///
/// A token that is already cancelled on entry short-circuits without
/// polling the operation at all. Once the operation has settled, firing
/// the token has no observable effect: the abort hook is consumed and
/// nothing remains listening.
pub async fn run_cancellable<T, F, A>(
    token: &CancellationToken,
    operation: F,
    on_abort: A,
) -> Result<T>
where
    F: Future<Output = Result<T>>,
    A: FnOnce(),
{
    tokio::select! {
        // Check the token first so an already-cancelled session never
        // starts a transfer.
        biased;
        _ = token.cancelled() => {
            on_abort();
            Err(PublishError::Cancelled)
        }
        outcome = operation => outcome,
    }
}
