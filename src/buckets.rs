//! BucketArray: structural layer holding chain heads and the node arena.
//!
//! Nodes live in a `SlotMap` and link to each other by generational key, so
//! a chain is a singly linked list threaded through the arena. This layer
//! never calls user strategies itself; callers pass precomputed bucket
//! indices and matcher closures.

use crate::error::TableError;
use slotmap::{DefaultKey, SlotMap};

pub(crate) type NodeId = DefaultKey;

#[derive(Debug)]
pub(crate) struct Node<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
    next: Option<NodeId>,
}

#[derive(Debug)]
pub(crate) struct BucketArray<K, V> {
    heads: Vec<Option<NodeId>>,
    nodes: SlotMap<NodeId, Node<K, V>>,
}

/// Nodes of one chain, head first.
pub(crate) struct Chain<'a, K, V> {
    nodes: &'a SlotMap<NodeId, Node<K, V>>,
    cur: Option<NodeId>,
}

impl<'a, K, V> Iterator for Chain<'a, K, V> {
    type Item = (NodeId, &'a Node<K, V>);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let id = self.cur?;
        let node = self.nodes.get(id)?;
        self.cur = node.next;
        Some((id, node))
    }
}

fn allocate_heads(count: usize) -> Result<Vec<Option<NodeId>>, TableError> {
    if count == 0 {
        return Err(TableError::ZeroBuckets);
    }
    let mut heads = Vec::new();
    heads
        .try_reserve_exact(count)
        .map_err(|_| TableError::AllocationFailed { buckets: count })?;
    heads.resize(count, None);
    Ok(heads)
}

impl<K, V> BucketArray<K, V> {
    pub(crate) fn with_buckets(count: usize) -> Result<Self, TableError> {
        Ok(Self {
            heads: allocate_heads(count)?,
            nodes: SlotMap::with_key(),
        })
    }

    #[inline]
    pub(crate) fn bucket_count(&self) -> usize {
        self.heads.len()
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub(crate) fn slot_of(&self, hash: u64) -> usize {
        (hash % self.heads.len() as u64) as usize
    }

    pub(crate) fn chain(&self, bucket: usize) -> Chain<'_, K, V> {
        Chain {
            nodes: &self.nodes,
            cur: self.heads[bucket],
        }
    }

    pub(crate) fn find<F>(&self, bucket: usize, mut is_match: F) -> Option<NodeId>
    where
        F: FnMut(&K) -> bool,
    {
        self.chain(bucket)
            .find(|(_, n)| is_match(&n.key))
            .map(|(id, _)| id)
    }

    pub(crate) fn node(&self, id: NodeId) -> Option<&Node<K, V>> {
        self.nodes.get(id)
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> Option<&mut Node<K, V>> {
        self.nodes.get_mut(id)
    }

    /// Link a new node at the head of `bucket`'s chain.
    pub(crate) fn push_front(&mut self, bucket: usize, key: K, value: V) -> NodeId {
        let next = self.heads[bucket];
        let id = self.nodes.insert(Node { key, value, next });
        self.heads[bucket] = Some(id);
        id
    }

    /// Unlink and return the first node in `bucket` whose key matches.
    pub(crate) fn unlink<F>(&mut self, bucket: usize, mut is_match: F) -> Option<(K, V)>
    where
        F: FnMut(&K) -> bool,
    {
        let mut prev: Option<NodeId> = None;
        let mut cur = self.heads[bucket];
        while let Some(id) = cur {
            let node = self.nodes.get(id)?;
            if is_match(&node.key) {
                let next = node.next;
                match prev {
                    Some(p) => self.nodes.get_mut(p)?.next = next,
                    None => self.heads[bucket] = next,
                }
                let node = self.nodes.remove(id)?;
                return Some((node.key, node.value));
            }
            prev = Some(id);
            cur = node.next;
        }
        None
    }

    /// First node at or after `bucket`, scanning buckets in index order.
    pub(crate) fn first_from(&self, bucket: usize) -> Option<(usize, NodeId)> {
        self.heads
            .get(bucket..)?
            .iter()
            .enumerate()
            .find_map(|(i, head)| head.map(|id| (bucket + i, id)))
    }

    /// Position after the node `id` sitting in `bucket`, or `None` at the end.
    pub(crate) fn successor(&self, bucket: usize, id: NodeId) -> Option<(usize, NodeId)> {
        match self.nodes.get(id)?.next {
            Some(next) => Some((bucket, next)),
            None => self.first_from(bucket + 1),
        }
    }

    /// Unlink every node, bucket by bucket in chain order, handing each
    /// key/value pair to `sink` after it has left the arena.
    pub(crate) fn clear_with<F>(&mut self, mut sink: F)
    where
        F: FnMut(K, V),
    {
        for bucket in 0..self.heads.len() {
            let mut cur = self.heads[bucket].take();
            while let Some(id) = cur {
                let Some(node) = self.nodes.remove(id) else {
                    break;
                };
                cur = node.next;
                sink(node.key, node.value);
            }
        }
        debug_assert!(self.nodes.is_empty());
    }

    /// Move every node into a fresh array of `count` buckets.
    ///
    /// Nodes are relinked, never copied. On allocation failure the array is
    /// left untouched.
    pub(crate) fn relink<H>(&mut self, count: usize, hash: H) -> Result<(), TableError>
    where
        H: Fn(&K) -> u64,
    {
        let mut heads = allocate_heads(count)?;
        for bucket in 0..self.heads.len() {
            let mut cur = self.heads[bucket].take();
            while let Some(id) = cur {
                let Some(node) = self.nodes.get_mut(id) else {
                    break;
                };
                cur = node.next;
                let slot = (hash(&node.key) % count as u64) as usize;
                node.next = heads[slot];
                heads[slot] = Some(id);
            }
        }
        self.heads = heads;
        Ok(())
    }

    /// Chain lengths, bucket by bucket.
    #[cfg(test)]
    pub(crate) fn chain_lengths(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.heads.len()).map(move |b| self.chain(b).count())
    }
}
