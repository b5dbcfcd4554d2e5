//! Duplicate detection on top of [`group`](crate::group).
use core::hash::Hash;

use crate::comparer::{DefaultComparer, EqualityComparer};
use crate::group::{Groups, group_by, try_group_by};

/// Same as [`try_group_by`], but keeps only keys with more than one element.
pub fn try_duplicates_by<I, K, E, C, KeyFn, ElemFn, Error>(
    source: I,
    key_fn: KeyFn,
    elem_fn: ElemFn,
    comparer: C,
) -> Result<Groups<K, E, C>, Error>
where
    I: IntoIterator,
    KeyFn: FnMut(&I::Item) -> Result<K, Error>,
    ElemFn: FnMut(I::Item) -> Result<E, Error>,
    C: EqualityComparer<K>,
{
    let groups = try_group_by(source, key_fn, elem_fn, comparer)?;
    Ok(filter_duplicates(groups))
}

/// Same as [`group_by`], but keeps only keys with more than one element.
///
/// All-unique keys result in an empty mapping.
pub fn duplicates_by<I, K, E, C, KeyFn, ElemFn>(
    source: I,
    key_fn: KeyFn,
    elem_fn: ElemFn,
    comparer: C,
) -> Groups<K, E, C>
where
    I: IntoIterator,
    KeyFn: FnMut(&I::Item) -> K,
    ElemFn: FnMut(I::Item) -> E,
    C: EqualityComparer<K>,
{
    filter_duplicates(group_by(source, key_fn, elem_fn, comparer))
}

/// Finds items which occur more than once in `source`, using natural equality.
///
/// ```rust
/// let dups = seqtools::duplicates([3, 1, 3, 2, 1, 3]);
/// assert_eq!(
///     vec![(3, vec![3, 3, 3]), (1, vec![1, 1])],
///     dups.into_iter().collect::<Vec<_>>(),
/// );
/// ```
pub fn duplicates<I>(source: I) -> Groups<I::Item, I::Item>
where
    I: IntoIterator,
    I::Item: Eq + Hash + Clone,
{
    duplicates_by(source, |item: &I::Item| item.clone(), |item| item, DefaultComparer)
}

fn filter_duplicates<K, E, C>(groups: Groups<K, E, C>) -> Groups<K, E, C>
where
    C: EqualityComparer<K>,
{
    let before = groups.len();
    let groups = groups.into_duplicates();
    tracing::trace!(groups = before, duplicates = groups.len(), "Filtered duplicates.");
    groups
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::comparer::by_key;

    #[test]
    fn test_duplicates_all_unique() {
        let dups = duplicates(["a", "b", "c"]);
        assert!(dups.is_empty());
    }

    #[test]
    fn test_duplicates_by_key() {
        let people = [("ann", 31), ("bob", 42), ("cat", 31), ("dan", 27), ("eve", 42)];
        let dups = duplicates_by(people, |&(_, age)| age, |(name, _)| name, DefaultComparer);
        assert_eq!(
            vec![(31, vec!["ann", "cat"]), (42, vec!["bob", "eve"])],
            dups.into_iter().collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_duplicates_custom_comparer() {
        let dups = duplicates_by(
            ["Foo", "bar", "FOO", "baz"],
            |&s| s,
            |s| s,
            by_key(|s: &&str| s.to_ascii_lowercase()),
        );
        assert_eq!(1, dups.len());
        assert_eq!(Some(&["Foo", "FOO"][..]), dups.get(&"foo"));
    }

    #[test]
    fn test_try_duplicates_by_key_error() {
        let result = try_duplicates_by(
            ["1", "1", "two"],
            |s| s.parse::<i32>(),
            |s| Ok(s),
            DefaultComparer,
        );
        assert_eq!(Err("two".parse::<i32>().unwrap_err()), result.map(|_| ()));
    }

    #[test]
    fn test_try_duplicates_by_element_error() {
        let result = try_duplicates_by(
            [("a", "1"), ("a", "x"), ("b", "2"), ("a", "y")],
            |&(key, _)| Ok(key),
            |(_, value)| value.parse::<u32>().map_err(|_| value),
            DefaultComparer,
        );
        assert_eq!(Err("x"), result.map(|_| ()));
    }

    #[test]
    fn test_duplicates_agree_with_group() {
        let source = [5, 1, 5, 2, 2, 9, 5];
        let mut groups = group_by(source, |&x| x % 4, |x| x, DefaultComparer);
        groups.retain(|_, v| 1 < v.len());
        let dups = duplicates_by(source, |&x| x % 4, |x| x, DefaultComparer);
        assert_eq!(
            groups.into_iter().collect::<Vec<_>>(),
            dups.into_iter().collect::<Vec<_>>()
        );
    }
}
