//! Error types raised by the sequence helpers themselves.
//!
//! Failures raised by caller-supplied selectors, actions, or futures are never wrapped in these types unless noted;
//! they are returned unchanged so callers can match on their own error types.

/// A chunk size of zero was requested, see [`chunks`](crate::chunks).
#[derive(Debug, Eq, PartialEq, Clone, Copy, thiserror::Error)]
#[error("chunk size must be positive, got {size}")]
pub struct InvalidChunkSize {
    /// The rejected chunk size.
    pub size: usize,
}

/// The cancellation signal was observed before the next element was drawn, see
/// [`AsCancellable`](crate::cancellable::AsCancellable).
#[derive(Debug, Eq, PartialEq, Clone, Copy, thiserror::Error)]
#[error("iteration cancelled")]
pub struct Cancelled;

/// An error from [`chunked`](crate::chunked).
#[derive(Debug, Eq, PartialEq, Clone, thiserror::Error)]
pub enum ChunkedError<E> {
    /// The chunk size was rejected before any chunk was processed.
    #[error(transparent)]
    InvalidChunkSize(#[from] InvalidChunkSize),
    /// The per-chunk action failed on the chunk with the given (zero-based) index. Later chunks were not processed.
    #[error("chunk action failed on chunk {index}")]
    Action {
        /// Index of the failing chunk.
        index: usize,
        /// The action's error.
        #[source]
        source: E,
    },
}
