//! [`Groups`] and the grouping engine.
use core::convert::Infallible;
use core::fmt;

use hashbrown::HashTable;

use crate::comparer::{DefaultComparer, EqualityComparer};

/// A mapping from keys to the ordered elements grouped under them.
///
/// Built by [`group_by`] and [`try_group_by`]. Keys are unique according to the comparer `C`. Within a group, elements
/// keep the order of the source; groups are ordered by the first occurrence of their key in the source.
#[derive(Clone)]
pub struct Groups<K, E, C = DefaultComparer> {
    /// Groups in first-occurrence order.
    entries: Vec<(K, Vec<E>)>,
    /// `(hash, index into entries)`. Invariant: every entry index appears exactly once, paired with its key's comparer
    /// hash.
    index: HashTable<(u64, usize)>,
    comparer: C,
}

impl<K, E, C> Groups<K, E, C>
where
    C: EqualityComparer<K>,
{
    /// Creates an empty mapping using `comparer` to tell keys apart.
    pub(crate) fn with_comparer(comparer: C) -> Self {
        Self {
            entries: Vec::new(),
            index: HashTable::new(),
            comparer,
        }
    }

    /// Appends `element` to the group for `key`, creating the group at the end if no existing key matches.
    pub(crate) fn push(&mut self, key: K, element: E) {
        let hash = self.comparer.hash(&key);
        match self.find(hash, &key) {
            Some(i) => self.entries[i].1.push(element),
            None => {
                self.index
                    .insert_unique(hash, (hash, self.entries.len()), |&(h, _)| h);
                self.entries.push((key, vec![element]));
            }
        }
    }

    /// Index into `entries` of the group whose key equals `key`. `hash` must be `key`'s comparer hash.
    fn find(&self, hash: u64, key: &K) -> Option<usize> {
        let Self {
            entries,
            index,
            comparer,
        } = self;
        index
            .find(hash, |&(h, i)| h == hash && comparer.eq(&entries[i].0, key))
            .map(|&(_, i)| i)
    }

    fn position(&self, key: &K) -> Option<usize> {
        self.find(self.comparer.hash(key), key)
    }

    /// Rebuilds `index` after `entries` was modified.
    fn reindex(&mut self) {
        self.index.clear();
        for (i, (key, _)) in self.entries.iter().enumerate() {
            let hash = self.comparer.hash(key);
            self.index.insert_unique(hash, (hash, i), |&(h, _)| h);
        }
    }

    /// Returns the elements grouped under `key`, if any.
    pub fn get(&self, key: &K) -> Option<&[E]> {
        self.position(key).map(|i| &*self.entries[i].1)
    }

    /// Returns `true` if a group exists for `key`.
    pub fn contains_key(&self, key: &K) -> bool {
        self.position(key).is_some()
    }

    /// Keeps only the groups for which `pred` returns `true`. Order is preserved.
    pub fn retain(&mut self, mut pred: impl FnMut(&K, &[E]) -> bool) {
        self.entries.retain(|(key, elements)| pred(key, elements));
        self.reindex();
    }

    /// Keeps only groups with more than one element.
    pub fn into_duplicates(mut self) -> Self {
        self.retain(|_, elements| 1 < elements.len());
        self
    }
}

impl<K, E, C> Groups<K, E, C> {
    /// Number of groups (distinct keys).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if there are no groups.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The comparer used to tell keys apart.
    pub fn comparer(&self) -> &C {
        &self.comparer
    }

    /// Iterates `(key, elements)` pairs in group order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (&K, &[E])> {
        self.entries
            .iter()
            .map(|(key, elements)| (key, &**elements))
    }

    /// Iterates keys in group order.
    pub fn keys(&self) -> impl ExactSizeIterator<Item = &K> {
        self.entries.iter().map(|(key, _)| key)
    }

    /// Iterates element groups in group order.
    pub fn values(&self) -> impl ExactSizeIterator<Item = &[E]> {
        self.entries.iter().map(|(_, elements)| &**elements)
    }

    /// Consumes the mapping, returning just the element groups in group order.
    pub fn into_values(self) -> impl ExactSizeIterator<Item = Vec<E>> {
        self.entries.into_iter().map(|(_, elements)| elements)
    }
}

impl<K, E, C> IntoIterator for Groups<K, E, C> {
    type Item = (K, Vec<E>);
    type IntoIter = std::vec::IntoIter<(K, Vec<E>)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<K, E, C> fmt::Debug for Groups<K, E, C>
where
    K: fmt::Debug,
    E: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

/// Groups `source` by `key_fn`, storing `elem_fn(item)` under each key. Keys are told apart with `comparer`.
///
/// Makes a single pass over `source`. The first `Err` returned by either selector aborts grouping and is returned
/// unchanged; no partial mapping is produced.
pub fn try_group_by<I, K, E, C, KeyFn, ElemFn, Error>(
    source: I,
    mut key_fn: KeyFn,
    mut elem_fn: ElemFn,
    comparer: C,
) -> Result<Groups<K, E, C>, Error>
where
    I: IntoIterator,
    KeyFn: FnMut(&I::Item) -> Result<K, Error>,
    ElemFn: FnMut(I::Item) -> Result<E, Error>,
    C: EqualityComparer<K>,
{
    let mut groups = Groups::with_comparer(comparer);
    let mut count = 0_usize;
    for item in source {
        let key = key_fn(&item)?;
        let element = elem_fn(item)?;
        groups.push(key, element);
        count += 1;
    }
    tracing::trace!(items = count, groups = groups.len(), "Grouped source.");
    Ok(groups)
}

/// Infallible version of [`try_group_by`].
///
/// ```rust
/// use seqtools::comparer::DefaultComparer;
///
/// let groups = seqtools::group_by(["a", "bb", "cc", "d"], |s| s.len(), |s| s, DefaultComparer);
/// assert_eq!(Some(&["a", "d"][..]), groups.get(&1));
/// assert_eq!(Some(&["bb", "cc"][..]), groups.get(&2));
/// ```
pub fn group_by<I, K, E, C, KeyFn, ElemFn>(
    source: I,
    mut key_fn: KeyFn,
    mut elem_fn: ElemFn,
    comparer: C,
) -> Groups<K, E, C>
where
    I: IntoIterator,
    KeyFn: FnMut(&I::Item) -> K,
    ElemFn: FnMut(I::Item) -> E,
    C: EqualityComparer<K>,
{
    let result = try_group_by(
        source,
        |item| Ok::<_, Infallible>(key_fn(item)),
        |item| Ok(elem_fn(item)),
        comparer,
    );
    match result {
        Ok(groups) => groups,
        Err(never) => match never {},
    }
}
