//! [`EqualityComparer`] and related items.
use core::hash::{Hash, Hasher};
use core::marker::PhantomData;

use rustc_hash::FxHasher;

/// Decides when two keys belong to the same group.
///
/// Implementations must be consistent: if `eq(a, b)` then `hash(a) == hash(b)`. The hash is only used to narrow the
/// search for a matching group, [`Self::eq`] alone decides group membership.
pub trait EqualityComparer<K: ?Sized> {
    /// Returns `true` if `a` and `b` are the same key.
    fn eq(&self, a: &K, b: &K) -> bool;

    /// Hashes `key` consistently with [`Self::eq`].
    fn hash(&self, key: &K) -> u64;
}

impl<K: ?Sized, C> EqualityComparer<K> for &C
where
    C: EqualityComparer<K> + ?Sized,
{
    fn eq(&self, a: &K, b: &K) -> bool {
        (**self).eq(a, b)
    }

    fn hash(&self, key: &K) -> u64 {
        (**self).hash(key)
    }
}

/// Natural equality: [`Eq`] and [`Hash`], hashed with [`FxHasher`].
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultComparer;

impl<K> EqualityComparer<K> for DefaultComparer
where
    K: Eq + Hash + ?Sized,
{
    fn eq(&self, a: &K, b: &K) -> bool {
        a == b
    }

    fn hash(&self, key: &K) -> u64 {
        let mut hasher = FxHasher::default();
        key.hash(&mut hasher);
        hasher.finish()
    }
}

/// An [`EqualityComparer`] built from a pair of closures.
///
/// Created by [`from_fns`].
#[derive(Clone)]
pub struct FnComparer<EqFn, HashFn> {
    eq_fn: EqFn,
    hash_fn: HashFn,
}

impl<K: ?Sized, EqFn, HashFn> EqualityComparer<K> for FnComparer<EqFn, HashFn>
where
    EqFn: Fn(&K, &K) -> bool,
    HashFn: Fn(&K) -> u64,
{
    fn eq(&self, a: &K, b: &K) -> bool {
        (self.eq_fn)(a, b)
    }

    fn hash(&self, key: &K) -> u64 {
        (self.hash_fn)(key)
    }
}

/// Creates an [`EqualityComparer`] from an equality closure and a hash closure.
///
/// The two closures must agree: keys that `eq_fn` considers equal must get the same `hash_fn` value. A constant hash
/// is always correct, just slower.
pub fn from_fns<K: ?Sized, EqFn, HashFn>(eq_fn: EqFn, hash_fn: HashFn) -> FnComparer<EqFn, HashFn>
where
    EqFn: Fn(&K, &K) -> bool,
    HashFn: Fn(&K) -> u64,
{
    FnComparer { eq_fn, hash_fn }
}

/// Compares keys by a projection, using [`DefaultComparer`] on the projected values.
///
/// Created by [`by_key`].
pub struct KeyComparer<K: ?Sized, Func> {
    func: Func,
    _phantom: PhantomData<fn(&K)>,
}

impl<K: ?Sized, Func: Clone> Clone for KeyComparer<K, Func> {
    fn clone(&self) -> Self {
        Self {
            func: self.func.clone(),
            _phantom: PhantomData,
        }
    }
}

impl<K: ?Sized, Func, Proj> EqualityComparer<K> for KeyComparer<K, Func>
where
    Func: Fn(&K) -> Proj,
    Proj: Eq + Hash,
{
    fn eq(&self, a: &K, b: &K) -> bool {
        (self.func)(a) == (self.func)(b)
    }

    fn hash(&self, key: &K) -> u64 {
        EqualityComparer::hash(&DefaultComparer, &(self.func)(key))
    }
}

/// Creates an [`EqualityComparer`] which compares keys by `func(key)`.
///
/// ```rust
/// use seqtools::comparer::{EqualityComparer, by_key};
///
/// let case_insensitive = by_key(|s: &str| s.to_ascii_lowercase());
/// assert!(case_insensitive.eq("Hello", "hELLO"));
/// ```
pub fn by_key<K: ?Sized, Func, Proj>(func: Func) -> KeyComparer<K, Func>
where
    Func: Fn(&K) -> Proj,
    Proj: Eq + Hash,
{
    KeyComparer {
        func,
        _phantom: PhantomData,
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_default_comparer() {
        assert!(DefaultComparer.eq(&1, &1));
        assert!(!DefaultComparer.eq(&1, &2));
        assert_eq!(
            EqualityComparer::hash(&DefaultComparer, "abc"),
            EqualityComparer::hash(&DefaultComparer, "abc"),
        );
    }

    #[test]
    fn test_by_key() {
        let cmp = by_key(|s: &str| s.to_ascii_lowercase());
        assert!(cmp.eq("Rust", "rUST"));
        assert!(!cmp.eq("Rust", "Rest"));
        assert_eq!(cmp.hash("Rust"), cmp.hash("RUST"));
    }

    #[test]
    fn test_from_fns() {
        // Modulo-10 equality with a constant hash.
        let cmp = from_fns(|a: &u32, b: &u32| a % 10 == b % 10, |_| 0);
        assert!(cmp.eq(&3_u32, &13));
        assert!(!cmp.eq(&3_u32, &14));
        assert_eq!(cmp.hash(&3_u32), cmp.hash(&14_u32));
    }

    #[test]
    fn test_by_ref() {
        let cmp = by_key(|x: &i32| x.abs());
        let by_ref = &cmp;
        assert!(by_ref.eq(&-4, &4));
    }
}
