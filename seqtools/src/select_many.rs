//! [`SelectMany`], [`TrySelectMany`], and related items.
use core::pin::Pin;
use core::task::{Context, Poll, ready};

use futures_util::stream::FusedStream;
use futures_util::{Stream, TryStream};
use pin_project_lite::pin_project;

pin_project! {
    /// Flattens a [`Stream`] by mapping each item to an inner [`Stream`], created by
    /// [`select_many()`](crate::select_many()).
    ///
    /// Each inner stream is drained completely before the next outer item is requested, so output is in outer-major
    /// order and inner streams never interleave.
    #[must_use = "streams do nothing unless polled"]
    pub struct SelectMany<St, Func, Inner> {
        #[pin]
        stream: St,
        func: Func,
        // Inner stream currently being drained.
        #[pin]
        inner: Option<Inner>,
        done: bool,
    }
}

impl<St, Func, Inner> SelectMany<St, Func, Inner>
where
    St: Stream,
    Func: FnMut(St::Item) -> Inner,
    Inner: Stream,
{
    /// Create with outer `stream` and projection `func`.
    pub fn new(stream: St, func: Func) -> Self {
        Self {
            stream,
            func,
            inner: None,
            done: false,
        }
    }
}

impl<St, Func, Inner> Stream for SelectMany<St, Func, Inner>
where
    St: Stream,
    Func: FnMut(St::Item) -> Inner,
    Inner: Stream,
{
    type Item = Inner::Item;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let mut this = self.project();

        if *this.done {
            return Poll::Ready(None);
        }
        loop {
            if let Some(inner) = this.inner.as_mut().as_pin_mut() {
                if let Some(item) = ready!(inner.poll_next(cx)) {
                    return Poll::Ready(Some(item));
                }
                this.inner.set(None);
            }

            match ready!(this.stream.as_mut().poll_next(cx)) {
                Some(outer) => this.inner.set(Some((this.func)(outer))),
                None => {
                    *this.done = true;
                    return Poll::Ready(None);
                }
            }
        }
    }
}

impl<St, Func, Inner> FusedStream for SelectMany<St, Func, Inner>
where
    St: Stream,
    Func: FnMut(St::Item) -> Inner,
    Inner: Stream,
{
    fn is_terminated(&self) -> bool {
        self.done
    }
}

pin_project! {
    /// Fallible version of [`SelectMany`], created by [`try_select_many()`](crate::try_select_many()).
    ///
    /// The first error, whether from the outer stream, the projection, or an inner stream, is yielded and then the
    /// stream ends. Items yielded before the error are unaffected.
    #[must_use = "streams do nothing unless polled"]
    pub struct TrySelectMany<St, Func, Inner> {
        #[pin]
        stream: St,
        func: Func,
        #[pin]
        inner: Option<Inner>,
        done: bool,
    }
}

impl<St, Func, Inner> TrySelectMany<St, Func, Inner>
where
    St: TryStream,
    Func: FnMut(St::Ok) -> Result<Inner, St::Error>,
    Inner: TryStream<Error = St::Error>,
{
    /// Create with outer `stream` and fallible projection `func`.
    pub fn new(stream: St, func: Func) -> Self {
        Self {
            stream,
            func,
            inner: None,
            done: false,
        }
    }
}

impl<St, Func, Inner> Stream for TrySelectMany<St, Func, Inner>
where
    St: TryStream,
    Func: FnMut(St::Ok) -> Result<Inner, St::Error>,
    Inner: TryStream<Error = St::Error>,
{
    type Item = Result<Inner::Ok, St::Error>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let mut this = self.project();

        if *this.done {
            return Poll::Ready(None);
        }
        let error = loop {
            if let Some(inner) = this.inner.as_mut().as_pin_mut() {
                match ready!(inner.try_poll_next(cx)) {
                    Some(Ok(item)) => return Poll::Ready(Some(Ok(item))),
                    Some(Err(error)) => break error,
                    None => this.inner.set(None),
                }
                continue;
            }

            match ready!(this.stream.as_mut().try_poll_next(cx)) {
                Some(Ok(outer)) => match (this.func)(outer) {
                    Ok(inner) => this.inner.set(Some(inner)),
                    Err(error) => break error,
                },
                Some(Err(error)) => break error,
                None => {
                    *this.done = true;
                    return Poll::Ready(None);
                }
            }
        };

        tracing::debug!("Flattening aborted by error.");
        *this.done = true;
        this.inner.set(None);
        Poll::Ready(Some(Err(error)))
    }
}

impl<St, Func, Inner> FusedStream for TrySelectMany<St, Func, Inner>
where
    St: TryStream,
    Func: FnMut(St::Ok) -> Result<Inner, St::Error>,
    Inner: TryStream<Error = St::Error>,
{
    fn is_terminated(&self) -> bool {
        self.done
    }
}

#[cfg(test)]
mod test {
    use std::cell::Cell;

    use futures_util::StreamExt;
    use futures_util::stream;

    use super::*;

    #[tokio::test]
    async fn test_select_many_order() {
        let flattened = SelectMany::new(stream::iter([1, 2]), |x| stream::iter([x * 10, x * 10 + 1]));
        assert_eq!(vec![10, 11, 20, 21], flattened.collect::<Vec<_>>().await);
    }

    #[tokio::test]
    async fn test_select_many_empty_inner() {
        let flattened = SelectMany::new(stream::iter(0..4), |x| stream::iter(0..x));
        assert_eq!(vec![0, 0, 1, 0, 1, 2], flattened.collect::<Vec<_>>().await);
    }

    #[tokio::test]
    async fn test_select_many_suspending_inner() {
        // Inner streams suspend on every item; output must still be outer-major.
        let flattened = SelectMany::new(stream::iter(['a', 'b']), |c| {
            stream::iter(0..3).then(move |i| async move {
                tokio::task::yield_now().await;
                format!("{c}{i}")
            })
        });
        assert_eq!(
            vec!["a0", "a1", "a2", "b0", "b1", "b2"],
            flattened.collect::<Vec<_>>().await
        );
    }

    #[tokio::test]
    async fn test_select_many_lazy() {
        let calls = Cell::new(0);
        let mut flattened = SelectMany::new(stream::iter(0..100), |x| {
            calls.set(calls.get() + 1);
            stream::iter([x])
        });
        assert_eq!(Some(0), flattened.next().await);
        assert_eq!(Some(1), flattened.next().await);
        assert_eq!(2, calls.get());
    }

    #[tokio::test]
    async fn test_try_select_many_ok() {
        let flattened = TrySelectMany::new(stream::iter([Ok::<_, &str>(1), Ok(2)]), |x| {
            Ok(stream::iter([Ok(x * 10), Ok(x * 10 + 1)]))
        });
        assert_eq!(
            vec![Ok(10), Ok(11), Ok(20), Ok(21)],
            flattened.collect::<Vec<_>>().await
        );
    }

    #[tokio::test]
    async fn test_try_select_many_inner_error() {
        let mut flattened = TrySelectMany::new(stream::iter([Ok::<_, &str>(1), Ok(2)]), |x| {
            Ok(stream::iter([Ok(x), Err("inner failed"), Ok(x + 100)]))
        });
        assert_eq!(Some(Ok(1)), flattened.next().await);
        assert_eq!(Some(Err("inner failed")), flattened.next().await);
        assert_eq!(None, flattened.next().await);
        assert!(flattened.is_terminated());
    }

    #[tokio::test]
    async fn test_try_select_many_project_error() {
        let flattened = TrySelectMany::new(stream::iter([Ok::<_, &str>(1), Ok(2), Ok(3)]), |x| {
            if x == 2 {
                Err("bad outer item")
            } else {
                Ok(stream::iter([Ok(x)]))
            }
        });
        assert_eq!(
            vec![Ok(1), Err("bad outer item")],
            flattened.collect::<Vec<_>>().await
        );
    }

    #[tokio::test]
    async fn test_try_select_many_outer_error() {
        let flattened = TrySelectMany::new(stream::iter([Ok(1), Err("outer failed"), Ok(3)]), |x| {
            Ok(stream::iter([Ok(x), Ok(x)]))
        });
        assert_eq!(
            vec![Ok(1), Ok(1), Err("outer failed")],
            flattened.collect::<Vec<_>>().await
        );
    }
}
