//! Traversal in bucket order: a borrowing `Iter` and a detached `Cursor`.
//!
//! Both visit buckets from index 0 upward and each chain head first, so the
//! order depends on the bucket layout and changes across a rehash.
//!
//! `Iter` borrows the table, which rules out mutation while it is alive.
//! `Cursor` is a plain position token: it carries the id of the table that
//! handed it out and that table's structural generation at the time.
//! `ChainedHashTable::next` rejects it with `TableError::StaleCursor` when
//! it comes from another table, or once any insert, removal or rehash has
//! happened since.

use crate::buckets::{BucketArray, NodeId};

/// Position of the entry last returned by `first`/`next`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Cursor {
    pub(crate) bucket: usize,
    pub(crate) node: NodeId,
    pub(crate) table: u64,
    pub(crate) generation: u64,
}

impl Cursor {
    /// Bucket index of the current entry.
    pub fn bucket(&self) -> usize {
        self.bucket
    }
}

/// Iterator over `(&K, &V)` in bucket order.
pub struct Iter<'a, K, V> {
    buckets: &'a BucketArray<K, V>,
    pos: Option<(usize, NodeId)>,
    remaining: usize,
}

impl<'a, K, V> Iter<'a, K, V> {
    pub(crate) fn new(buckets: &'a BucketArray<K, V>) -> Self {
        Self {
            pos: buckets.first_from(0),
            remaining: buckets.len(),
            buckets,
        }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let (bucket, id) = self.pos?;
        let node = self.buckets.node(id)?;
        self.pos = self.buckets.successor(bucket, id);
        self.remaining -= 1;
        Some((&node.key, &node.value))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, K, V> ExactSizeIterator for Iter<'a, K, V> {}

impl<'a, K, V> core::iter::FusedIterator for Iter<'a, K, V> {}

impl<'a, K, V> Clone for Iter<'a, K, V> {
    fn clone(&self) -> Self {
        Self {
            buckets: self.buckets,
            pos: self.pos,
            remaining: self.remaining,
        }
    }
}

impl<'a, K: core::fmt::Debug, V: core::fmt::Debug> core::fmt::Debug for Iter<'a, K, V> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}
