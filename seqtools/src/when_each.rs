//! [`WhenEach`] and related items.
use core::pin::Pin;
use core::task::{Context, Poll, ready};

use futures_util::Stream;
use futures_util::stream::{FusedStream, FuturesUnordered, StreamExt};
use pin_project_lite::pin_project;

/// A finished operation yielded by [`WhenEach`].
///
/// The output is handed back as-is: if the operation's output is a [`Result`], a failure is only visible once the
/// caller inspects it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Completed<O> {
    index: usize,
    output: O,
}
impl<O> Completed<O> {
    /// Position of the operation in the submitted collection.
    pub fn index(&self) -> usize {
        self.index
    }

    /// The operation's output.
    pub fn output(&self) -> &O {
        &self.output
    }

    /// Takes the operation's output.
    pub fn into_output(self) -> O {
        self.output
    }

    /// Returns `(index, output)`.
    pub fn into_parts(self) -> (usize, O) {
        (self.index, self.output)
    }
}

pin_project! {
    /// Tags a future's output with its submission index.
    #[must_use = "futures do nothing unless polled"]
    struct Indexed<Fut> {
        #[pin]
        fut: Fut,
        index: usize,
    }
}
impl<Fut> Future for Indexed<Fut>
where
    Fut: Future,
{
    type Output = Completed<Fut::Output>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.project();
        let output = ready!(this.fut.poll(cx));
        Poll::Ready(Completed {
            index: *this.index,
            output,
        })
    }
}

/// [`Stream`] of operations in the order they complete, created by [`when_each`].
///
/// Each submitted operation is yielded exactly once. The stream ends when no operations remain pending. If several
/// operations are ready at the same time, which one is yielded first is unspecified.
///
/// Operations are only driven while this stream is polled; nothing is spawned.
#[must_use = "streams do nothing unless polled"]
pub struct WhenEach<Fut> {
    pending: FuturesUnordered<Indexed<Fut>>,
}
impl<Fut> WhenEach<Fut>
where
    Fut: Future,
{
    /// Number of operations not yet yielded.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Returns `true` if every operation has been yielded.
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
impl<Fut> Stream for WhenEach<Fut>
where
    Fut: Future,
{
    type Item = Completed<Fut::Output>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let completed = ready!(self.pending.poll_next_unpin(cx));
        if let Some(completed) = completed.as_ref() {
            tracing::trace!(
                index = completed.index,
                remaining = self.pending.len(),
                "Operation completed."
            );
        }
        Poll::Ready(completed)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.pending.len();
        (len, Some(len))
    }
}
impl<Fut> FusedStream for WhenEach<Fut>
where
    Fut: Future,
{
    fn is_terminated(&self) -> bool {
        self.pending.is_terminated()
    }
}

/// Yields each of `operations` as it completes, tagged with its submission index.
///
/// ```rust
/// use futures_util::StreamExt;
/// use futures_util::future::ready;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let mut completed = seqtools::when_each([ready(1), ready(2)]);
/// let mut outputs = Vec::new();
/// while let Some(done) = completed.next().await {
///     outputs.push(done.into_output());
/// }
/// outputs.sort();
/// assert_eq!(vec![1, 2], outputs);
/// # }
/// ```
pub fn when_each<I>(operations: I) -> WhenEach<I::Item>
where
    I: IntoIterator,
    I::Item: Future,
{
    let pending = operations
        .into_iter()
        .enumerate()
        .map(|(index, fut)| Indexed { fut, index })
        .collect::<FuturesUnordered<_>>();
    tracing::trace!(operations = pending.len(), "Waiting for operations.");
    WhenEach { pending }
}
