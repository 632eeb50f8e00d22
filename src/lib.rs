//! chained-hashtable: a single-threaded separate-chaining hash table with
//! prime-sized bucket arrays, load-factor driven rehashing and pluggable
//! key/value semantics.
//!
//! Internal Design:
//!
//! Summary
//! - Layers:
//!   - BucketArray<K, V>: structural layer. Chain heads in a `Vec`, nodes in
//!     a `SlotMap` arena linked by generational key. Never calls user code;
//!     takes bucket indices and matcher closures.
//!   - ChainedHashTable<K, V>: strategies (hash, key/value equivalence,
//!     release hooks), the load-factor policy from `TableConfig`, and the
//!     keyed operations `put`/`get`/`remove`/`remove_all`/`rehash`.
//!   - HashTableOps<K, V>: object-safe capability trait forwarding one-to-one
//!     to the table, plus `ContainerFactory` to construct tables behind it.
//!
//! Ownership
//! - Keys and values are moved into the table. Everything the table lets go
//!   of (overwritten pairs, removed pairs, `remove_all`, drop) is handed to
//!   the release hooks exactly once, after it has been unlinked. Without
//!   hooks it is dropped.
//! - Null keys, values or strategies cannot be expressed, so the only
//!   reportable failures are a zero bucket count, an invalid configuration,
//!   bucket-array allocation failure at construction, and stale cursors.
//!
//! Rehashing
//! - `put` grows when `upper_rehash_threshold > ideal_ratio` and the load
//!   ratio exceeds the upper threshold. Note the gate: a threshold of `0.0`
//!   does not mean "always"; it disables growth, as does any value at or
//!   below `ideal_ratio`.
//! - `remove` shrinks when `lower_rehash_threshold > 0` and the ratio falls
//!   below it. `remove_all` always shrinks to `MIN_BUCKET_COUNT`.
//! - Automatic targets come from `rehash::ideal_bucket_count`, whose prime
//!   test trial-divides only up to 49 (see that module).
//! - A rehash relinks nodes into a new head array; keys and values stay put.
//!   If the head array cannot be allocated the rehash is skipped and logged.
//!
//! Iteration
//! - `iter()` borrows the table. `first`/`next` hand out `Cursor` tokens
//!   stamped with the table's id and structural generation; a cursor used
//!   on another table, or after an insert, removal or rehash, fails with
//!   `TableError::StaleCursor`.
//!
//! Notes and non-goals
//! - Single-threaded: the boxed strategies make the table `!Send`/`!Sync`.
//! - No ordered iteration, no serialization, no other resize policies.
//! - Changing the hasher or key equivalence of a populated table requires a
//!   `rehash` to a different bucket count before lookups are reliable again.

mod buckets;
pub mod capability;
mod chained_table_proptest;
pub mod config;
pub mod error;
pub mod factory;
pub mod iter;
pub mod rehash;
pub mod strategy;
mod table;

// Public surface
pub use capability::{HashTableOps, CAPABILITY_VERSION};
pub use config::{TableConfig, DEFAULT_BUCKET_COUNT, MIN_BUCKET_COUNT};
pub use error::TableError;
pub use factory::{ContainerFactory, KeyOptions};
pub use iter::{Cursor, Iter};
pub use strategy::{
    EqEquivalence, Equivalence, KeyHasher, PointerIdentity, Release, StdHash, StrEquivalence,
    StrHash, Strategies,
};
pub use table::ChainedHashTable;
