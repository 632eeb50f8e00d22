//! Pluggable key/value semantics: hashing, equivalence and release hooks.
//!
//! A table holds one boxed strategy of each kind. Closures implement the
//! traits directly, so `table.set_hasher(|k: &u32| *k as u64)` works without
//! a wrapper type.

use core::hash::{BuildHasher, Hash};
use core::ops::Deref;
use std::collections::hash_map::RandomState;

/// Maps a key to the hash code used to pick its bucket.
pub trait KeyHasher<K: ?Sized> {
    fn hash_key(&self, key: &K) -> u64;
}

/// Decides whether two keys (or two values) are the same entry.
pub trait Equivalence<T: ?Sized> {
    fn equivalent(&self, a: &T, b: &T) -> bool;
}

/// Takes ownership of a key or value the table lets go of.
///
/// Called exactly once per item, after the item has been unlinked from the
/// table: on overwrite by `put`, on `remove`, on `remove_all`, and when the
/// table is dropped.
pub trait Release<T> {
    fn release(&mut self, item: T);
}

impl<K: ?Sized, F> KeyHasher<K> for F
where
    F: Fn(&K) -> u64,
{
    #[inline]
    fn hash_key(&self, key: &K) -> u64 {
        self(key)
    }
}

impl<T: ?Sized, F> Equivalence<T> for F
where
    F: Fn(&T, &T) -> bool,
{
    #[inline]
    fn equivalent(&self, a: &T, b: &T) -> bool {
        self(a, b)
    }
}

impl<T, F> Release<T> for F
where
    F: FnMut(T),
{
    #[inline]
    fn release(&mut self, item: T) {
        self(item)
    }
}

// Boxed strategies, as passed through the capability layer.

impl<K: ?Sized> KeyHasher<K> for Box<dyn KeyHasher<K>> {
    #[inline]
    fn hash_key(&self, key: &K) -> u64 {
        (**self).hash_key(key)
    }
}

impl<T: ?Sized> Equivalence<T> for Box<dyn Equivalence<T>> {
    #[inline]
    fn equivalent(&self, a: &T, b: &T) -> bool {
        (**self).equivalent(a, b)
    }
}

impl<T> Release<T> for Box<dyn Release<T>> {
    #[inline]
    fn release(&mut self, item: T) {
        (**self).release(item)
    }
}

/// Hashes keys through their `Hash` impl with a `BuildHasher`.
#[derive(Clone, Debug, Default)]
pub struct StdHash<S = RandomState>(pub S);

impl<K, S> KeyHasher<K> for StdHash<S>
where
    K: ?Sized + Hash,
    S: BuildHasher,
{
    #[inline]
    fn hash_key(&self, key: &K) -> u64 {
        self.0.hash_one(key)
    }
}

/// Compares through `PartialEq`.
#[derive(Clone, Copy, Debug, Default)]
pub struct EqEquivalence;

impl<T: ?Sized + PartialEq> Equivalence<T> for EqEquivalence {
    #[inline]
    fn equivalent(&self, a: &T, b: &T) -> bool {
        a == b
    }
}

/// Address identity for pointer-like keys (`&T`, `Box<T>`, `Rc<T>`).
///
/// Two keys are equivalent only if they point at the same object; the hash
/// is the address with its low four bits dropped, since allocations are
/// aligned and those bits carry little information.
#[derive(Clone, Copy, Debug, Default)]
pub struct PointerIdentity;

impl PointerIdentity {
    #[inline]
    fn addr<P: Deref>(p: &P) -> usize {
        (&**p as *const P::Target).cast::<()>() as usize
    }
}

impl<P> KeyHasher<P> for PointerIdentity
where
    P: Deref,
{
    #[inline]
    fn hash_key(&self, key: &P) -> u64 {
        (Self::addr(key) >> 4) as u64
    }
}

impl<P> Equivalence<P> for PointerIdentity
where
    P: Deref,
{
    #[inline]
    fn equivalent(&self, a: &P, b: &P) -> bool {
        Self::addr(a) == Self::addr(b)
    }
}

/// String-key hashing, optionally folding ASCII case.
#[derive(Clone, Copy, Debug, Default)]
pub struct StrHash {
    pub ignore_case: bool,
}

impl<K> KeyHasher<K> for StrHash
where
    K: ?Sized + AsRef<str>,
{
    fn hash_key(&self, key: &K) -> u64 {
        // FNV-1a over the (optionally lowercased) bytes.
        let mut h: u64 = 0xcbf2_9ce4_8422_2325;
        for b in key.as_ref().bytes() {
            let b = if self.ignore_case {
                b.to_ascii_lowercase()
            } else {
                b
            };
            h ^= b as u64;
            h = h.wrapping_mul(0x0000_0100_0000_01b3);
        }
        h
    }
}

/// String-key equality, optionally ignoring ASCII case. Pair with a
/// `StrHash` using the same `ignore_case` setting.
#[derive(Clone, Copy, Debug, Default)]
pub struct StrEquivalence {
    pub ignore_case: bool,
}

impl<K> Equivalence<K> for StrEquivalence
where
    K: ?Sized + AsRef<str>,
{
    #[inline]
    fn equivalent(&self, a: &K, b: &K) -> bool {
        if self.ignore_case {
            a.as_ref().eq_ignore_ascii_case(b.as_ref())
        } else {
            a.as_ref() == b.as_ref()
        }
    }
}

/// The full strategy set of a table.
///
/// Release hooks are optional; without one, a released item is dropped.
///
/// Identity checks are optional too. When `put` overwrites an entry and the
/// identity check says the incoming key (or value) is the very object already
/// stored, the stored one stays and nothing is released. Without a check no
/// two items are ever identical, which is right for owned, moved-in data.
/// Handle-like keys such as `&T` or `Rc<T>` want `PointerIdentity` here.
pub struct Strategies<K, V> {
    pub(crate) hasher: Box<dyn KeyHasher<K>>,
    pub(crate) key_eq: Box<dyn Equivalence<K>>,
    pub(crate) value_eq: Box<dyn Equivalence<V>>,
    pub(crate) key_identity: Option<Box<dyn Equivalence<K>>>,
    pub(crate) value_identity: Option<Box<dyn Equivalence<V>>>,
    pub(crate) key_release: Option<Box<dyn Release<K>>>,
    pub(crate) value_release: Option<Box<dyn Release<V>>>,
}

impl<K, V> Strategies<K, V>
where
    K: Eq + Hash,
    V: PartialEq,
{
    /// `Hash`/`Eq` on keys with a random-seeded hasher, `PartialEq` on values.
    pub fn standard() -> Self {
        Self::new(StdHash::<RandomState>::default(), EqEquivalence, EqEquivalence)
    }
}

impl<K, V> Strategies<K, V> {
    pub fn new<H, KE, VE>(hasher: H, key_eq: KE, value_eq: VE) -> Self
    where
        H: KeyHasher<K> + 'static,
        KE: Equivalence<K> + 'static,
        VE: Equivalence<V> + 'static,
    {
        Self {
            hasher: Box::new(hasher),
            key_eq: Box::new(key_eq),
            value_eq: Box::new(value_eq),
            key_identity: None,
            value_identity: None,
            key_release: None,
            value_release: None,
        }
    }

    pub fn with_release_hooks<KR, VR>(self, key_release: KR, value_release: VR) -> Self
    where
        KR: Release<K> + 'static,
        VR: Release<V> + 'static,
    {
        self.with_key_release(key_release)
            .with_value_release(value_release)
    }

    pub fn with_key_release<R: Release<K> + 'static>(mut self, key_release: R) -> Self {
        self.key_release = Some(Box::new(key_release));
        self
    }

    pub fn with_value_release<R: Release<V> + 'static>(mut self, value_release: R) -> Self {
        self.value_release = Some(Box::new(value_release));
        self
    }

    pub fn with_key_identity<E: Equivalence<K> + 'static>(mut self, key_identity: E) -> Self {
        self.key_identity = Some(Box::new(key_identity));
        self
    }

    pub fn with_value_identity<E: Equivalence<V> + 'static>(mut self, value_identity: E) -> Self {
        self.value_identity = Some(Box::new(value_identity));
        self
    }

    #[inline]
    pub(crate) fn hash(&self, key: &K) -> u64 {
        self.hasher.hash_key(key)
    }

    #[inline]
    pub(crate) fn keys_match(&self, a: &K, b: &K) -> bool {
        self.key_eq.equivalent(a, b)
    }

    #[inline]
    pub(crate) fn values_match(&self, a: &V, b: &V) -> bool {
        self.value_eq.equivalent(a, b)
    }

    /// Whether `incoming` is the object already stored as `stored`.
    #[inline]
    pub(crate) fn same_key(&self, stored: &K, incoming: &K) -> bool {
        self.key_identity
            .as_ref()
            .is_some_and(|same| same.equivalent(stored, incoming))
    }

    #[inline]
    pub(crate) fn same_value(&self, stored: &V, incoming: &V) -> bool {
        self.value_identity
            .as_ref()
            .is_some_and(|same| same.equivalent(stored, incoming))
    }

    pub(crate) fn release_key(&mut self, key: K) {
        match self.key_release.as_mut() {
            Some(hook) => hook.release(key),
            None => drop(key),
        }
    }

    pub(crate) fn release_value(&mut self, value: V) {
        match self.value_release.as_mut() {
            Some(hook) => hook.release(value),
            None => drop(value),
        }
    }
}

impl<K, V> core::fmt::Debug for Strategies<K, V> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Strategies")
            .field("key_identity", &self.key_identity.is_some())
            .field("value_identity", &self.value_identity.is_some())
            .field("key_release", &self.key_release.is_some())
            .field("value_release", &self.value_release.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    #[test]
    fn closures_are_strategies() {
        let h = |k: &u32| *k as u64 * 2;
        assert_eq!(KeyHasher::<u32>::hash_key(&h, &21), 42);
        let e = |a: &i32, b: &i32| (a - b).abs() <= 1;
        assert!(Equivalence::<i32>::equivalent(&e, &3, &4));
        assert!(!Equivalence::<i32>::equivalent(&e, &3, &5));
    }

    #[test]
    fn pointer_identity_ignores_contents() {
        let a = Rc::new(String::from("same"));
        let b = Rc::new(String::from("same"));
        let a2 = Rc::clone(&a);
        assert!(PointerIdentity.equivalent(&a, &a2));
        assert!(!PointerIdentity.equivalent(&a, &b));
        assert_eq!(PointerIdentity.hash_key(&a), PointerIdentity.hash_key(&a2));
    }

    #[test]
    fn case_insensitive_string_strategies_agree() {
        let h = StrHash { ignore_case: true };
        let e = StrEquivalence { ignore_case: true };
        assert_eq!(h.hash_key("Content-Type"), h.hash_key("content-type"));
        assert!(e.equivalent("Content-Type", "CONTENT-TYPE"));

        let h = StrHash { ignore_case: false };
        let e = StrEquivalence { ignore_case: false };
        assert_ne!(h.hash_key("A"), h.hash_key("a"));
        assert!(!e.equivalent("A", "a"));
    }

    #[test]
    fn release_falls_back_to_drop() {
        let tracker = Rc::new(());
        let mut s: Strategies<u8, Rc<()>> = Strategies::standard();
        s.release_value(Rc::clone(&tracker));
        assert_eq!(Rc::strong_count(&tracker), 1);

        let seen = Rc::new(core::cell::Cell::new(0));
        let seen2 = Rc::clone(&seen);
        let mut s: Strategies<u8, u8> =
            Strategies::standard().with_release_hooks(|_k: u8| {}, move |v: u8| {
                seen2.set(seen2.get() + v as usize)
            });
        s.release_value(5);
        assert_eq!(seen.get(), 5);
    }

    #[test]
    fn identity_defaults_to_never_same() {
        let s: Strategies<u8, u8> = Strategies::standard();
        assert!(!s.same_key(&1, &1));
        assert!(!s.same_value(&1, &1));

        let a = Rc::new(1u8);
        let b = Rc::new(1u8);
        let s: Strategies<Rc<u8>, Rc<u8>> =
            Strategies::new(PointerIdentity, PointerIdentity, EqEquivalence)
                .with_key_identity(PointerIdentity)
                .with_value_identity(PointerIdentity);
        assert!(s.same_key(&a, &Rc::clone(&a)));
        assert!(!s.same_key(&a, &b));
        assert!(s.same_value(&b, &Rc::clone(&b)));
    }
}
