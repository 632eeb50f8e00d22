//! Construction table handing out containers behind their capability
//! surfaces.

use crate::capability::HashTableOps;
use crate::config::DEFAULT_BUCKET_COUNT;
use crate::error::TableError;
use crate::strategy::{EqEquivalence, StrEquivalence, StrHash, Strategies};
use crate::table::ChainedHashTable;
use core::hash::Hash;

/// Revision of the `ContainerFactory` entry points.
pub const FACTORY_VERSION: u32 = 1;

/// How a string-keyed table compares its keys.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyOptions {
    /// Treat keys differing only in ASCII case as the same key.
    pub ignore_case: bool,
}

/// Entry points for every container kind.
///
/// Lists and string buffers are plain `Vec` and `String`; the hash table is
/// returned as `Box<dyn HashTableOps<K, V>>`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContainerFactory;

impl ContainerFactory {
    pub fn version(&self) -> u32 {
        FACTORY_VERSION
    }

    /// Table with `DEFAULT_BUCKET_COUNT` buckets and `Hash`/`Eq` keys.
    pub fn hash_table_default<K, V>(&self) -> Result<Box<dyn HashTableOps<K, V>>, TableError>
    where
        K: Eq + Hash + 'static,
        V: PartialEq + 'static,
    {
        self.hash_table(DEFAULT_BUCKET_COUNT)
    }

    pub fn hash_table<K, V>(
        &self,
        bucket_count: usize,
    ) -> Result<Box<dyn HashTableOps<K, V>>, TableError>
    where
        K: Eq + Hash + 'static,
        V: PartialEq + 'static,
    {
        Ok(Box::new(ChainedHashTable::new(bucket_count)?))
    }

    /// Table keyed by strings, compared per `options`.
    pub fn string_keyed_hash_table<K, V>(
        &self,
        bucket_count: usize,
        options: KeyOptions,
    ) -> Result<Box<dyn HashTableOps<K, V>>, TableError>
    where
        K: AsRef<str> + 'static,
        V: PartialEq + 'static,
    {
        let strategies = Strategies::new(
            StrHash {
                ignore_case: options.ignore_case,
            },
            StrEquivalence {
                ignore_case: options.ignore_case,
            },
            EqEquivalence,
        );
        Ok(Box::new(ChainedHashTable::with_strategies(
            bucket_count,
            strategies,
        )?))
    }

    pub fn list<T>(&self) -> Vec<T> {
        Vec::new()
    }

    pub fn string_buffer(&self, capacity: usize) -> String {
        String::with_capacity(capacity)
    }
}
