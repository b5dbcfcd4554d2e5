#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]

use core::hash::Hash;

use futures_util::{Stream, TryStream};

pub mod cancellable;
pub mod chunk;
pub mod comparer;
pub mod duplicates;
pub mod error;
pub mod group;
pub mod select_many;
pub mod when_each;

use cancellable::{AsCancellable, AsCancellableStream, CancellationSignal};
pub use chunk::{Chunks, DEFAULT_CHUNK_SIZE, chunked, chunks};
use comparer::{DefaultComparer, EqualityComparer};
pub use duplicates::{duplicates, duplicates_by, try_duplicates_by};
pub use error::{Cancelled, ChunkedError, InvalidChunkSize};
pub use group::{Groups, group_by, try_group_by};
use select_many::{SelectMany, TrySelectMany};
pub use when_each::{Completed, WhenEach, when_each};

/// Grouping, chunking, and cancellation adaptors for any [`Iterator`].
///
/// Every grouping method is a shorthand for [`try_group_by`] with the omitted pieces filled in: the item itself as
/// key or element, and [`DefaultComparer`] as comparer.
pub trait SeqTools: Iterator {
    /// Groups items by themselves, using natural equality.
    fn group(self) -> Groups<Self::Item, Self::Item>
    where
        Self: Sized,
        Self::Item: Eq + Hash + Clone,
    {
        group_by(self, |item| item.clone(), |item| item, DefaultComparer)
    }

    /// Groups items by `key_fn(&item)`, using natural equality on keys.
    fn group_by_key<K, KeyFn>(self, key_fn: KeyFn) -> Groups<K, Self::Item>
    where
        Self: Sized,
        K: Eq + Hash,
        KeyFn: FnMut(&Self::Item) -> K,
    {
        group_by(self, key_fn, |item| item, DefaultComparer)
    }

    /// Groups `elem_fn(item)` by `key_fn(&item)`, telling keys apart with `comparer`. See [`group_by`].
    fn group_with<K, E, C, KeyFn, ElemFn>(
        self,
        key_fn: KeyFn,
        elem_fn: ElemFn,
        comparer: C,
    ) -> Groups<K, E, C>
    where
        Self: Sized,
        KeyFn: FnMut(&Self::Item) -> K,
        ElemFn: FnMut(Self::Item) -> E,
        C: EqualityComparer<K>,
    {
        group_by(self, key_fn, elem_fn, comparer)
    }

    /// Fallible version of [`Self::group_with`]. See [`try_group_by`].
    fn try_group_with<K, E, C, KeyFn, ElemFn, Error>(
        self,
        key_fn: KeyFn,
        elem_fn: ElemFn,
        comparer: C,
    ) -> Result<Groups<K, E, C>, Error>
    where
        Self: Sized,
        KeyFn: FnMut(&Self::Item) -> Result<K, Error>,
        ElemFn: FnMut(Self::Item) -> Result<E, Error>,
        C: EqualityComparer<K>,
    {
        try_group_by(self, key_fn, elem_fn, comparer)
    }

    /// Finds items occurring more than once, using natural equality. See [`duplicates()`].
    fn duplicates(self) -> Groups<Self::Item, Self::Item>
    where
        Self: Sized,
        Self::Item: Eq + Hash + Clone,
    {
        duplicates(self)
    }

    /// Finds keys shared by more than one item, using natural equality on keys.
    fn duplicates_by_key<K, KeyFn>(self, key_fn: KeyFn) -> Groups<K, Self::Item>
    where
        Self: Sized,
        K: Eq + Hash,
        KeyFn: FnMut(&Self::Item) -> K,
    {
        duplicates_by(self, key_fn, |item| item, DefaultComparer)
    }

    /// Same as [`Self::group_with`], but keeps only keys with more than one element. See [`duplicates_by`].
    fn duplicates_with<K, E, C, KeyFn, ElemFn>(
        self,
        key_fn: KeyFn,
        elem_fn: ElemFn,
        comparer: C,
    ) -> Groups<K, E, C>
    where
        Self: Sized,
        KeyFn: FnMut(&Self::Item) -> K,
        ElemFn: FnMut(Self::Item) -> E,
        C: EqualityComparer<K>,
    {
        duplicates_by(self, key_fn, elem_fn, comparer)
    }

    /// Fallible version of [`Self::duplicates_with`]. See [`try_duplicates_by`].
    fn try_duplicates_with<K, E, C, KeyFn, ElemFn, Error>(
        self,
        key_fn: KeyFn,
        elem_fn: ElemFn,
        comparer: C,
    ) -> Result<Groups<K, E, C>, Error>
    where
        Self: Sized,
        KeyFn: FnMut(&Self::Item) -> Result<K, Error>,
        ElemFn: FnMut(Self::Item) -> Result<E, Error>,
        C: EqualityComparer<K>,
    {
        try_duplicates_by(self, key_fn, elem_fn, comparer)
    }

    /// Splits items into consecutive chunks of `chunk_size`. See [`chunks()`].
    fn chunks(self, chunk_size: usize) -> Result<Chunks<Self::Item>, InvalidChunkSize>
    where
        Self: Sized,
    {
        chunks(self, chunk_size)
    }

    /// Checks `signal` before drawing each item. See [`AsCancellable`].
    fn as_cancellable<S>(self, signal: S) -> AsCancellable<Self, S>
    where
        Self: Sized,
        S: CancellationSignal,
    {
        AsCancellable::new(self, signal)
    }
}
impl<I> SeqTools for I where I: Iterator {}

/// Flattening and cancellation adaptors for any [`Stream`].
pub trait StreamTools: Stream {
    /// Maps each item to a stream and flattens them in outer-major order. See [`select_many()`].
    fn select_many<Func, Inner>(self, func: Func) -> SelectMany<Self, Func, Inner>
    where
        Self: Sized,
        Func: FnMut(Self::Item) -> Inner,
        Inner: Stream,
    {
        SelectMany::new(self, func)
    }

    /// Fallible version of [`Self::select_many`]. See [`try_select_many()`].
    fn try_select_many<Func, Inner>(self, func: Func) -> TrySelectMany<Self, Func, Inner>
    where
        Self: Sized + TryStream,
        Func: FnMut(Self::Ok) -> Result<Inner, Self::Error>,
        Inner: TryStream<Error = Self::Error>,
    {
        TrySelectMany::new(self, func)
    }

    /// Checks `signal` before requesting each item. See [`AsCancellableStream`].
    fn as_cancellable_stream<S>(self, signal: S) -> AsCancellableStream<Self, S>
    where
        Self: Sized,
        S: CancellationSignal,
    {
        AsCancellableStream::new(self, signal)
    }
}
impl<St> StreamTools for St where St: Stream {}

/// Creates a [`SelectMany`] stream which maps each item of `stream` to an inner stream and yields the inner items in
/// order.
///
/// ```rust
/// use futures_util::{StreamExt, stream};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let flattened = seqtools::select_many(stream::iter([1, 2]), |x| stream::iter([x * 10, x * 10 + 1]));
/// assert_eq!(vec![10, 11, 20, 21], flattened.collect::<Vec<_>>().await);
/// # }
/// ```
pub fn select_many<St, Func, Inner>(stream: St, func: Func) -> SelectMany<St, Func, Inner>
where
    St: Stream,
    Func: FnMut(St::Item) -> Inner,
    Inner: Stream,
{
    SelectMany::new(stream, func)
}

/// Creates a [`TrySelectMany`] stream, which ends after the first error from `stream`, `func`, or an inner stream.
pub fn try_select_many<St, Func, Inner>(stream: St, func: Func) -> TrySelectMany<St, Func, Inner>
where
    St: TryStream,
    Func: FnMut(St::Ok) -> Result<Inner, St::Error>,
    Inner: TryStream<Error = St::Error>,
{
    TrySelectMany::new(stream, func)
}
