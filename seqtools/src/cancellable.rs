//! [`AsCancellable`], [`AsCancellableStream`], and the [`CancellationSignal`] they observe.
use core::iter::FusedIterator;
use core::pin::Pin;
use core::sync::atomic::{AtomicBool, Ordering};
use core::task::{Context, Poll};
use std::sync::Arc;

use futures_util::Stream;
use futures_util::stream::FusedStream;
use pin_project_lite::pin_project;

use crate::error::Cancelled;

/// A monotonic cancellation flag: once it reports `true`, it must keep reporting `true`.
///
/// Only ever read by this crate, never set.
pub trait CancellationSignal {
    /// Returns `true` if cancellation has been requested.
    fn is_cancelled(&self) -> bool;
}

impl<S> CancellationSignal for &S
where
    S: CancellationSignal + ?Sized,
{
    fn is_cancelled(&self) -> bool {
        (**self).is_cancelled()
    }
}

impl<S> CancellationSignal for Arc<S>
where
    S: CancellationSignal + ?Sized,
{
    fn is_cancelled(&self) -> bool {
        (**self).is_cancelled()
    }
}

/// Cancelled once set to `true`. Callers must never reset it to `false`.
impl CancellationSignal for AtomicBool {
    fn is_cancelled(&self) -> bool {
        self.load(Ordering::Acquire)
    }
}

#[cfg(feature = "tokio-util")]
#[cfg_attr(docsrs, doc(cfg(feature = "tokio-util")))]
impl CancellationSignal for tokio_util::sync::CancellationToken {
    fn is_cancelled(&self) -> bool {
        tokio_util::sync::CancellationToken::is_cancelled(self)
    }
}

/// An [`Iterator`] which checks a [`CancellationSignal`] before drawing each item from the wrapped iterator.
///
/// Yields `Ok(item)` until the signal is observed, then yields a single `Err(Cancelled)` and stops. The wrapped
/// iterator is not advanced again after cancellation. No buffering is added.
///
/// The signal is checked before the wrapped iterator is asked for its next item, so a signal raised after the last
/// element but before the wrapped iterator has reported its end yields `Err(Cancelled)` rather than `None`.
#[must_use = "iterators are lazy and do nothing unless consumed"]
#[derive(Debug, Clone)]
pub struct AsCancellable<I, S> {
    iter: I,
    signal: S,
    done: bool,
}

impl<I, S> AsCancellable<I, S>
where
    I: Iterator,
    S: CancellationSignal,
{
    /// Wraps `iter`, observing `signal`.
    pub fn new(iter: I, signal: S) -> Self {
        Self {
            iter,
            signal,
            done: false,
        }
    }

    /// Unwraps the inner iterator.
    pub fn into_inner(self) -> I {
        self.iter
    }
}

impl<I, S> Iterator for AsCancellable<I, S>
where
    I: Iterator,
    S: CancellationSignal,
{
    type Item = Result<I::Item, Cancelled>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        if self.signal.is_cancelled() {
            tracing::debug!("Cancellation observed, stopping iteration.");
            self.done = true;
            return Some(Err(Cancelled));
        }
        let item = self.iter.next();
        if item.is_none() {
            self.done = true;
        }
        item.map(Ok)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.done {
            return (0, Some(0));
        }
        // May end early with one extra `Err`.
        let (_, upper) = self.iter.size_hint();
        (0, upper.and_then(|n| n.checked_add(1)))
    }
}

impl<I, S> FusedIterator for AsCancellable<I, S>
where
    I: Iterator,
    S: CancellationSignal,
{
}

pin_project! {
    /// Same as [`AsCancellable`] but as a [`Stream`].
    ///
    /// The signal is checked only when a new item is requested. Once the wrapped stream has returned
    /// [`Poll::Pending`] for an item, that item is allowed to finish without further checks.
    #[must_use = "streams do nothing unless polled"]
    pub struct AsCancellableStream<St, S> {
        #[pin]
        stream: St,
        signal: S,
        // An item is in progress in `stream`.
        in_flight: bool,
        done: bool,
    }
}

impl<St, S> AsCancellableStream<St, S>
where
    St: Stream,
    S: CancellationSignal,
{
    /// Wraps `stream`, observing `signal`.
    pub fn new(stream: St, signal: S) -> Self {
        Self {
            stream,
            signal,
            in_flight: false,
            done: false,
        }
    }
}

impl<St, S> Stream for AsCancellableStream<St, S>
where
    St: Stream,
    S: CancellationSignal,
{
    type Item = Result<St::Item, Cancelled>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.project();

        if *this.done {
            return Poll::Ready(None);
        }
        if !*this.in_flight && this.signal.is_cancelled() {
            tracing::debug!("Cancellation observed, stopping stream.");
            *this.done = true;
            return Poll::Ready(Some(Err(Cancelled)));
        }
        match this.stream.poll_next(cx) {
            Poll::Ready(Some(item)) => {
                *this.in_flight = false;
                Poll::Ready(Some(Ok(item)))
            }
            Poll::Ready(None) => {
                *this.done = true;
                Poll::Ready(None)
            }
            Poll::Pending => {
                *this.in_flight = true;
                Poll::Pending
            }
        }
    }
}

impl<St, S> FusedStream for AsCancellableStream<St, S>
where
    St: Stream,
    S: CancellationSignal,
{
    fn is_terminated(&self) -> bool {
        self.done
    }
}
