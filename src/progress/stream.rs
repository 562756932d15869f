//! A chunk stream that reports progress as it is consumed.

use std::io;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};

use bytes::{Bytes, BytesMut};
use futures::Stream;
use tokio::fs::File;
use tokio_util::codec::{BytesCodec, FramedRead};

use crate::constants::STREAM_CHUNK_SIZE;
use crate::error::PublishError;
use crate::progress::reporter::ProgressReporter;

/// The concrete stream type used for real file uploads.
pub type FileProgressStream = ProgressTrackingStream<FramedRead<File, BytesCodec>>;

/// Records the first read error a [`ProgressTrackingStream`] encounters.
///
/// The storage SDK consumes the body stream internally, so a local read
/// failure comes back from the transfer collaborator wrapped as a
/// dispatch error indistinguishable from a network fault. The stream
/// stashes the original error here before forwarding it, letting the
/// owning upload classify the failed transfer as a source-read failure
/// instead of a transfer failure.
#[derive(Clone, Debug, Default)]
pub struct SourceErrorSlot {
    inner: Arc<Mutex<Option<io::Error>>>,
}

impl SourceErrorSlot {
    pub fn new() -> Self {
        SourceErrorSlot::default()
    }

    /// Stash the error, returning an equivalent error to forward
    /// downstream. Only the first error is kept.
    fn record(&self, error: io::Error) -> io::Error {
        let forwarded = io::Error::new(error.kind(), error.to_string());
        if let Ok(mut slot) = self.inner.lock() {
            if slot.is_none() {
                *slot = Some(error);
            }
        }
        forwarded
    }

    pub fn take(&self) -> Option<io::Error> {
        self.inner.lock().ok().and_then(|mut slot| slot.take())
    }

    /// Reclassify a failed transfer that was caused by a local read error.
    ///
    /// A transfer failure keeps its own cause when no read error was
    /// recorded; cancellation and every other outcome pass through
    /// untouched.
    pub fn classify(&self, error: PublishError) -> PublishError {
        match error {
            PublishError::Transfer(cause) => match self.take() {
                Some(read_error) => PublishError::SourceRead(read_error),
                None => PublishError::Transfer(cause),
            },
            other => other,
        }
    }
}

/// Wraps a chunk source so every chunk read advances a [`ProgressReporter`].
///
/// The wrapper is transparent: chunks pass through unmodified and in
/// order. On end-of-stream the reporter is finished exactly once; on a
/// read error the error is forwarded immediately without buffering or
/// replay, so the owning operation fails fast.
///
/// The cumulative count is clamped so the reported bytes never exceed the
/// total given at construction, even if the underlying source yields more
/// data than the file size recorded beforehand.
pub struct ProgressTrackingStream<S> {
    inner: S,
    reporter: Arc<ProgressReporter>,
    read_error: SourceErrorSlot,
    bytes_read: u64,
    total_bytes: u64,
    finished: bool,
}

impl FileProgressStream {
    /// Build the tracking stream for an opened artifact file.
    ///
    /// The file handle is owned by the stream and closed when the stream
    /// is dropped, on every exit path of the upload.
    pub fn from_file(file: File, total_bytes: u64, reporter: Arc<ProgressReporter>) -> Self {
        let inner = FramedRead::with_capacity(file, BytesCodec::new(), STREAM_CHUNK_SIZE);
        ProgressTrackingStream::new(inner, total_bytes, reporter)
    }
}

impl<S> ProgressTrackingStream<S>
where
    S: Stream<Item = io::Result<BytesMut>> + Unpin,
{
    pub fn new(inner: S, total_bytes: u64, reporter: Arc<ProgressReporter>) -> Self {
        ProgressTrackingStream {
            inner,
            reporter,
            read_error: SourceErrorSlot::new(),
            bytes_read: 0,
            total_bytes,
            finished: false,
        }
    }

    /// Cumulative bytes read through this stream so far.
    pub fn bytes_read(&self) -> u64 {
        self.bytes_read
    }

    /// Handle to the slot that will hold the first read error, for the
    /// owning upload to inspect after the stream has been consumed.
    pub fn error_slot(&self) -> SourceErrorSlot {
        self.read_error.clone()
    }
}

impl<S> Stream for ProgressTrackingStream<S>
where
    S: Stream<Item = io::Result<BytesMut>> + Unpin,
{
    type Item = io::Result<Bytes>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        match Pin::new(&mut this.inner).poll_next(cx) {
            Poll::Ready(Some(Ok(chunk))) => {
                let chunk = chunk.freeze();
                this.bytes_read = this.bytes_read.saturating_add(chunk.len() as u64);
                this.reporter.update(this.bytes_read.min(this.total_bytes));
                Poll::Ready(Some(Ok(chunk)))
            }
            Poll::Ready(Some(Err(error))) => {
                Poll::Ready(Some(Err(this.read_error.record(error))))
            }
            Poll::Ready(None) => {
                if !this.finished {
                    this.finished = true;
                    this.reporter.finish();
                }
                Poll::Ready(None)
            }
            Poll::Pending => Poll::Pending,
        }
    }
}
