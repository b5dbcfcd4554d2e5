//! [`Chunks`] and related items.
use core::iter::FusedIterator;

use crate::comparer::DefaultComparer;
use crate::error::{ChunkedError, InvalidChunkSize};
use crate::group::group_by;

/// Chunk size used when callers have no preference.
pub const DEFAULT_CHUNK_SIZE: usize = 2000;

/// Iterator over consecutive batches of a source, created by [`chunks`].
///
/// Every chunk holds exactly `chunk_size` items except possibly the last, which holds the remainder.
#[must_use = "iterators are lazy and do nothing unless consumed"]
#[derive(Debug, Clone)]
pub struct Chunks<T> {
    groups: std::vec::IntoIter<(usize, Vec<T>)>,
}

impl<T> Iterator for Chunks<T> {
    type Item = Vec<T>;

    fn next(&mut self) -> Option<Self::Item> {
        self.groups.next().map(|(_, chunk)| chunk)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.groups.size_hint()
    }
}
impl<T> ExactSizeIterator for Chunks<T> {}
impl<T> FusedIterator for Chunks<T> {}

/// Splits `source` into consecutive chunks of `chunk_size` items.
///
/// Each item is grouped under `position / chunk_size`. Returns [`InvalidChunkSize`] for a zero `chunk_size` before
/// `source` is touched.
///
/// ```rust
/// let chunks = seqtools::chunks(1..=7, 3).unwrap();
/// assert_eq!(vec![vec![1, 2, 3], vec![4, 5, 6], vec![7]], chunks.collect::<Vec<_>>());
/// ```
pub fn chunks<I>(source: I, chunk_size: usize) -> Result<Chunks<I::Item>, InvalidChunkSize>
where
    I: IntoIterator,
{
    if chunk_size == 0 {
        return Err(InvalidChunkSize { size: chunk_size });
    }
    let groups = group_by(
        source.into_iter().enumerate(),
        |&(position, _)| position / chunk_size,
        |(_, item)| item,
        DefaultComparer,
    );
    // Keys are first seen in ascending order, so group order is chunk order.
    Ok(Chunks {
        groups: groups.into_iter(),
    })
}

/// Runs `action` on each chunk of `source`, in order, then hands `source` back for further use.
///
/// The first failing chunk stops processing and is reported as [`ChunkedError::Action`].
pub fn chunked<S, T, F, E>(source: S, chunk_size: usize, mut action: F) -> Result<S, ChunkedError<E>>
where
    for<'a> &'a S: IntoIterator<Item = &'a T>,
    F: FnMut(Vec<&T>) -> Result<(), E>,
{
    let batches = chunks(&source, chunk_size)?;
    let count = batches.len();
    for (index, chunk) in batches.enumerate() {
        tracing::trace!(index, count, len = chunk.len(), "Processing chunk.");
        action(chunk).map_err(|source| ChunkedError::Action { index, source })?;
    }
    Ok(source)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_chunks_remainder() {
        let chunks = chunks(0..10, 4).unwrap();
        assert_eq!(3, chunks.len());
        assert_eq!(
            vec![vec![0, 1, 2, 3], vec![4, 5, 6, 7], vec![8, 9]],
            chunks.collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_chunks_exact() {
        let chunks = chunks(["a", "b", "c", "d"], 2).unwrap();
        assert_eq!(vec![vec!["a", "b"], vec!["c", "d"]], chunks.collect::<Vec<_>>());
    }

    #[test]
    fn test_chunks_empty() {
        assert_eq!(0, chunks(Vec::<u8>::new(), 5).unwrap().count());
    }

    #[test]
    fn test_chunks_zero_size() {
        assert_eq!(InvalidChunkSize { size: 0 }, chunks(0..10, 0).unwrap_err());
    }

    #[test]
    fn test_chunks_default_size() {
        let chunks = chunks(0..4500, DEFAULT_CHUNK_SIZE).unwrap();
        assert_eq!(
            vec![2000, 2000, 500],
            chunks.map(|chunk| chunk.len()).collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_chunked() {
        let mut seen = Vec::new();
        let source = chunked(vec![1, 2, 3, 4, 5], 2, |chunk| {
            seen.push(chunk.into_iter().copied().collect::<Vec<_>>());
            Ok::<_, ()>(())
        })
        .unwrap();
        assert_eq!(vec![1, 2, 3, 4, 5], source);
        assert_eq!(vec![vec![1, 2], vec![3, 4], vec![5]], seen);
    }

    #[test]
    fn test_chunked_action_error_stops() {
        let mut calls = 0;
        let result = chunked(vec![1, 2, 3, 4, 5], 2, |chunk| {
            calls += 1;
            if chunk.contains(&&3) { Err("three") } else { Ok(()) }
        });
        assert_eq!(
            Err(ChunkedError::Action {
                index: 1,
                source: "three"
            }),
            result
        );
        assert_eq!(2, calls);
    }

    #[test]
    fn test_chunked_zero_size() {
        let mut calls = 0;
        let result = chunked(vec![1, 2, 3], 0, |_| {
            calls += 1;
            Ok::<_, ()>(())
        });
        assert_eq!(Err(ChunkedError::InvalidChunkSize(InvalidChunkSize { size: 0 })), result);
        assert_eq!(0, calls);
    }
}
