//! ChainedHashTable: strategies, load-factor policy and the keyed operations
//! on top of `BucketArray`.

use crate::buckets::BucketArray;
use crate::config::{TableConfig, MIN_BUCKET_COUNT};
use crate::error::TableError;
use crate::iter::{Cursor, Iter};
use crate::rehash::ideal_bucket_count;
use crate::strategy::{Equivalence, KeyHasher, Release, Strategies};
use core::hash::Hash;
use core::mem;
use std::sync::atomic::{AtomicU64, Ordering};

// Source of per-table ids, so a cursor is only ever accepted by its own table.
static NEXT_TABLE_ID: AtomicU64 = AtomicU64::new(0);

/// Separate-chaining hash table with pluggable key/value semantics.
///
/// The table owns every key and value put into it. Whatever it lets go of,
/// on overwrite, `remove`, `remove_all` or drop, goes to the configured
/// release hook, or is dropped when no hook is set.
///
/// Swapping the hasher or the key equivalence on a non-empty table leaves
/// existing entries filed under the old scheme; call `rehash` with a bucket
/// count different from the current one afterwards so every node is placed
/// again.
pub struct ChainedHashTable<K, V> {
    buckets: BucketArray<K, V>,
    strategies: Strategies<K, V>,
    config: TableConfig,
    id: u64,
    // Bumped by every structural mutation; stamps cursors.
    generation: u64,
}

impl<K, V> ChainedHashTable<K, V>
where
    K: Eq + Hash,
    V: PartialEq,
{
    /// Table with `bucket_count` empty buckets, `Hash`/`Eq` keys and the
    /// default `TableConfig`.
    pub fn new(bucket_count: usize) -> Result<Self, TableError> {
        Self::with_strategies(bucket_count, Strategies::standard())
    }

    pub fn with_config(bucket_count: usize, config: TableConfig) -> Result<Self, TableError> {
        Self::from_parts(bucket_count, config, Strategies::standard())
    }
}

impl<K, V> ChainedHashTable<K, V> {
    pub fn with_strategies(
        bucket_count: usize,
        strategies: Strategies<K, V>,
    ) -> Result<Self, TableError> {
        Self::from_parts(bucket_count, TableConfig::default(), strategies)
    }

    pub fn from_parts(
        bucket_count: usize,
        config: TableConfig,
        strategies: Strategies<K, V>,
    ) -> Result<Self, TableError> {
        config.validate()?;
        Ok(Self {
            buckets: BucketArray::with_buckets(bucket_count)?,
            strategies,
            config,
            id: NEXT_TABLE_ID.fetch_add(1, Ordering::Relaxed),
            generation: 0,
        })
    }

    /// Release every entry and the table itself. Same as dropping it.
    pub fn destroy(self) {
        drop(self)
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.len() == 0
    }

    pub fn bucket_count(&self) -> usize {
        self.buckets.bucket_count()
    }

    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    /// Replace the load-factor policy. Takes effect at the next `put` or
    /// `remove`; no rehash happens here.
    pub fn set_config(&mut self, config: TableConfig) -> Result<(), TableError> {
        config.validate()?;
        self.config = config;
        Ok(())
    }

    #[inline]
    fn ratio(&self) -> f64 {
        self.len() as f64 / self.bucket_count() as f64
    }

    #[inline]
    fn bucket_of(&self, key: &K) -> usize {
        self.buckets.slot_of(self.strategies.hash(key))
    }

    #[inline]
    fn bump_generation(&mut self) {
        self.generation = self.generation.wrapping_add(1);
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        let bucket = self.bucket_of(key);
        let strategies = &self.strategies;
        let id = self
            .buckets
            .find(bucket, |stored| strategies.keys_match(key, stored))?;
        self.buckets.node(id).map(|n| &n.value)
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.get(key).is_some()
    }

    /// Linear scan over every chain.
    pub fn contains_value(&self, value: &V) -> bool {
        self.iter()
            .any(|(_, stored)| self.strategies.values_match(value, stored))
    }

    /// Insert or overwrite.
    ///
    /// On overwrite the stored key and value are swapped for the new ones and
    /// the old ones go to the release hooks; the chain layout is unchanged.
    /// An incoming key or value the identity check reports as the stored
    /// object itself is dropped instead, and the stored one is neither
    /// replaced nor released.
    /// A fresh key is linked at the head of its chain, after which the table
    /// grows when `upper_rehash_threshold > ideal_ratio` and the load ratio
    /// exceeds `upper_rehash_threshold`.
    ///
    /// Node storage grows through the global allocator, so this
    /// implementation always returns `Ok`.
    pub fn put(&mut self, key: K, value: V) -> Result<(), TableError> {
        let bucket = self.bucket_of(&key);
        let strategies = &self.strategies;
        let found = self
            .buckets
            .find(bucket, |stored| strategies.keys_match(&key, stored));

        if let Some(node) = found.and_then(|id| self.buckets.node_mut(id)) {
            let old_key = if self.strategies.same_key(&node.key, &key) {
                None
            } else {
                Some(mem::replace(&mut node.key, key))
            };
            let old_value = if self.strategies.same_value(&node.value, &value) {
                None
            } else {
                Some(mem::replace(&mut node.value, value))
            };
            if let Some(k) = old_key {
                self.strategies.release_key(k);
            }
            if let Some(v) = old_value {
                self.strategies.release_value(v);
            }
            return Ok(());
        }

        self.buckets.push_front(bucket, key, value);
        self.bump_generation();

        if self.config.grows() && self.ratio() > self.config.upper_rehash_threshold {
            log::trace!(
                "load ratio {:.2} above {} with {} buckets, growing",
                self.ratio(),
                self.config.upper_rehash_threshold,
                self.bucket_count()
            );
            self.rehash(0);
        }
        Ok(())
    }

    /// Remove `key` if present, handing its key and value to the release
    /// hooks. Returns whether an entry was removed.
    pub fn remove(&mut self, key: &K) -> bool {
        let bucket = self.bucket_of(key);
        let strategies = &self.strategies;
        let Some((old_key, old_value)) = self
            .buckets
            .unlink(bucket, |stored| strategies.keys_match(key, stored))
        else {
            return false;
        };
        self.bump_generation();
        self.strategies.release_key(old_key);
        self.strategies.release_value(old_value);

        if self.config.shrinks() && self.ratio() < self.config.lower_rehash_threshold {
            log::trace!(
                "load ratio {:.2} below {} with {} buckets, shrinking",
                self.ratio(),
                self.config.lower_rehash_threshold,
                self.bucket_count()
            );
            self.rehash(0);
        }
        true
    }

    /// Release every entry, then shrink to `MIN_BUCKET_COUNT` buckets.
    pub fn remove_all(&mut self) {
        let strategies = &mut self.strategies;
        self.buckets.clear_with(|k, v| {
            strategies.release_key(k);
            strategies.release_value(v);
        });
        self.bump_generation();
        self.rehash(MIN_BUCKET_COUNT);
    }

    /// Redistribute all entries over `bucket_count` buckets, or over the
    /// count picked by `ideal_bucket_count` when `bucket_count` is 0.
    ///
    /// Nothing happens when the target equals the current count. If the new
    /// bucket array cannot be allocated the table keeps its current layout.
    pub fn rehash(&mut self, bucket_count: usize) {
        let target = if bucket_count == 0 {
            ideal_bucket_count(self.len(), self.config.ideal_ratio)
        } else {
            bucket_count
        };
        let current = self.bucket_count();
        if target == current {
            return;
        }

        let strategies = &self.strategies;
        match self.buckets.relink(target, |k| strategies.hash(k)) {
            Ok(()) => {
                self.bump_generation();
                log::debug!(
                    "rehashed {} entries from {} to {} buckets",
                    self.len(),
                    current,
                    target
                );
            }
            Err(e) => log::warn!("rehash skipped, keeping {current} buckets: {e}"),
        }
    }

    /// Start a cursor traversal. `None` when the table is empty.
    pub fn first(&self) -> Option<(Cursor, &K, &V)> {
        let (bucket, id) = self.buckets.first_from(0)?;
        self.at(bucket, id)
    }

    /// Advance a cursor. `Ok(None)` once the traversal is exhausted; the
    /// cursor is consumed either way.
    pub fn next(&self, cursor: Cursor) -> Result<Option<(Cursor, &K, &V)>, TableError> {
        if cursor.table != self.id
            || cursor.generation != self.generation
            || self.buckets.node(cursor.node).is_none()
        {
            return Err(TableError::StaleCursor);
        }
        Ok(self
            .buckets
            .successor(cursor.bucket, cursor.node)
            .and_then(|(bucket, id)| self.at(bucket, id)))
    }

    fn at(&self, bucket: usize, id: crate::buckets::NodeId) -> Option<(Cursor, &K, &V)> {
        let node = self.buckets.node(id)?;
        let cursor = Cursor {
            bucket,
            node: id,
            table: self.id,
            generation: self.generation,
        };
        Some((cursor, &node.key, &node.value))
    }

    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(&self.buckets)
    }

    pub fn set_key_equivalence<E>(&mut self, key_eq: E)
    where
        E: Equivalence<K> + 'static,
    {
        self.strategies.key_eq = Box::new(key_eq);
    }

    pub fn set_value_equivalence<E>(&mut self, value_eq: E)
    where
        E: Equivalence<V> + 'static,
    {
        self.strategies.value_eq = Box::new(value_eq);
    }

    pub fn set_hasher<H>(&mut self, hasher: H)
    where
        H: KeyHasher<K> + 'static,
    {
        self.strategies.hasher = Box::new(hasher);
    }

    /// Install both release hooks. Entries already in the table are released
    /// through the new hooks from now on.
    pub fn set_release_hooks<KR, VR>(&mut self, key_release: KR, value_release: VR)
    where
        KR: Release<K> + 'static,
        VR: Release<V> + 'static,
    {
        self.set_key_release(key_release);
        self.set_value_release(value_release);
    }

    pub fn set_key_release<R: Release<K> + 'static>(&mut self, key_release: R) {
        self.strategies.key_release = Some(Box::new(key_release));
    }

    pub fn set_value_release<R: Release<V> + 'static>(&mut self, value_release: R) {
        self.strategies.value_release = Some(Box::new(value_release));
    }

    /// Replace both hooks at once; `None` means released items are dropped.
    pub(crate) fn replace_release_hooks(
        &mut self,
        key_release: Option<Box<dyn Release<K>>>,
        value_release: Option<Box<dyn Release<V>>>,
    ) {
        self.strategies.key_release = key_release;
        self.strategies.value_release = value_release;
    }

    pub fn set_key_identity<E: Equivalence<K> + 'static>(&mut self, key_identity: E) {
        self.strategies.key_identity = Some(Box::new(key_identity));
    }

    pub fn set_value_identity<E: Equivalence<V> + 'static>(&mut self, value_identity: E) {
        self.strategies.value_identity = Some(Box::new(value_identity));
    }

    #[cfg(test)]
    pub(crate) fn chain_lengths(&self) -> Vec<usize> {
        self.buckets.chain_lengths().collect()
    }
}

impl<K, V> Drop for ChainedHashTable<K, V> {
    fn drop(&mut self) {
        let strategies = &mut self.strategies;
        self.buckets.clear_with(|k, v| {
            strategies.release_key(k);
            strategies.release_value(v);
        });
    }
}

impl<'a, K, V> IntoIterator for &'a ChainedHashTable<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K: core::fmt::Debug, V: core::fmt::Debug> core::fmt::Debug for ChainedHashTable<K, V> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}
