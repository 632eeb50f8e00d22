//! Capability surface: an object-safe operation set callers can program
//! against without naming the concrete table type.
//!
//! Every method of `HashTableOps` forwards to the `ChainedHashTable` method
//! of the same meaning; no logic lives here.

use crate::error::TableError;
use crate::iter::Cursor;
use crate::strategy::{Equivalence, KeyHasher, Release};
use crate::table::ChainedHashTable;

/// Revision of the `HashTableOps` operation set.
pub const CAPABILITY_VERSION: u32 = 1;

/// Hash table operations behind an opaque handle, usually
/// `Box<dyn HashTableOps<K, V>>`.
pub trait HashTableOps<K, V> {
    fn version(&self) -> u32 {
        CAPABILITY_VERSION
    }

    /// Destroy the table, releasing every entry.
    fn release(self: Box<Self>);

    /// Duplicate the table. Implementations may refuse with
    /// `TableError::NotSupported`.
    fn try_clone(&self) -> Result<Box<dyn HashTableOps<K, V>>, TableError>;

    /// Release every entry and shrink to the minimum bucket count.
    fn clear(&mut self);

    fn contains_key(&self, key: &K) -> bool;

    fn contains_value(&self, value: &V) -> bool;

    fn put(&mut self, key: K, value: V) -> Result<(), TableError>;

    fn get(&self, key: &K) -> Option<&V>;

    fn remove(&mut self, key: &K) -> bool;

    fn is_empty(&self) -> bool;

    fn size(&self) -> usize;

    fn bucket_count(&self) -> usize;

    /// `0` picks the ideal bucket count.
    fn rehash(&mut self, bucket_count: usize);

    fn first(&self) -> Option<(Cursor, &K, &V)>;

    fn next(&self, cursor: Cursor) -> Result<Option<(Cursor, &K, &V)>, TableError>;

    fn set_key_comparator(&mut self, key_eq: Box<dyn Equivalence<K>>);

    fn set_value_comparator(&mut self, value_eq: Box<dyn Equivalence<V>>);

    fn set_hash_function(&mut self, hasher: Box<dyn KeyHasher<K>>);

    /// Replace both release hooks. `None` means items are dropped.
    fn set_release_hooks(
        &mut self,
        key_release: Option<Box<dyn Release<K>>>,
        value_release: Option<Box<dyn Release<V>>>,
    );
}

impl<K: 'static, V: 'static> HashTableOps<K, V> for ChainedHashTable<K, V> {
    fn release(self: Box<Self>) {
        ChainedHashTable::destroy(*self)
    }

    fn try_clone(&self) -> Result<Box<dyn HashTableOps<K, V>>, TableError> {
        Err(TableError::NotSupported("clone"))
    }

    fn clear(&mut self) {
        ChainedHashTable::remove_all(self)
    }

    fn contains_key(&self, key: &K) -> bool {
        ChainedHashTable::contains_key(self, key)
    }

    fn contains_value(&self, value: &V) -> bool {
        ChainedHashTable::contains_value(self, value)
    }

    fn put(&mut self, key: K, value: V) -> Result<(), TableError> {
        ChainedHashTable::put(self, key, value)
    }

    fn get(&self, key: &K) -> Option<&V> {
        ChainedHashTable::get(self, key)
    }

    fn remove(&mut self, key: &K) -> bool {
        ChainedHashTable::remove(self, key)
    }

    fn is_empty(&self) -> bool {
        ChainedHashTable::is_empty(self)
    }

    fn size(&self) -> usize {
        ChainedHashTable::len(self)
    }

    fn bucket_count(&self) -> usize {
        ChainedHashTable::bucket_count(self)
    }

    fn rehash(&mut self, bucket_count: usize) {
        ChainedHashTable::rehash(self, bucket_count)
    }

    fn first(&self) -> Option<(Cursor, &K, &V)> {
        ChainedHashTable::first(self)
    }

    fn next(&self, cursor: Cursor) -> Result<Option<(Cursor, &K, &V)>, TableError> {
        ChainedHashTable::next(self, cursor)
    }

    fn set_key_comparator(&mut self, key_eq: Box<dyn Equivalence<K>>) {
        ChainedHashTable::set_key_equivalence(self, key_eq)
    }

    fn set_value_comparator(&mut self, value_eq: Box<dyn Equivalence<V>>) {
        ChainedHashTable::set_value_equivalence(self, value_eq)
    }

    fn set_hash_function(&mut self, hasher: Box<dyn KeyHasher<K>>) {
        ChainedHashTable::set_hasher(self, hasher)
    }

    fn set_release_hooks(
        &mut self,
        key_release: Option<Box<dyn Release<K>>>,
        value_release: Option<Box<dyn Release<V>>>,
    ) {
        ChainedHashTable::replace_release_hooks(self, key_release, value_release)
    }
}
