//! HashIndex: fixed array of buckets, each an independent [`AvlTree`].

use crate::avl_tree::AvlTree;
use crate::config::IndexConfig;
use crate::error::{IndexError, Result};
use crate::hash::{BucketHash, PolynomialHash};
use core::borrow::Borrow;
use tracing::{debug, trace};

#[derive(Debug, Clone)]
pub struct HashIndex<K, H = PolynomialHash> {
    hasher: H,
    // A slot's tree is created on first insert and kept even once emptied.
    buckets: Box<[Option<AvlTree<K>>]>,
    len: usize,
}

impl<K> HashIndex<K>
where
    K: Ord + AsRef<[u8]>,
{
    /// Index with [`IndexConfig::DEFAULT_CAPACITY`] buckets.
    pub fn new() -> Self {
        Self::from_parts(IndexConfig::DEFAULT_CAPACITY, PolynomialHash)
    }

    pub fn with_config(config: IndexConfig) -> Result<Self> {
        Self::with_hasher(config, PolynomialHash)
    }
}

impl<K> Default for HashIndex<K>
where
    K: Ord + AsRef<[u8]>,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, H> HashIndex<K, H>
where
    K: Ord + AsRef<[u8]>,
    H: BucketHash,
{
    pub fn with_hasher(config: IndexConfig, hasher: H) -> Result<Self> {
        config.validate()?;
        Ok(Self::from_parts(config.capacity, hasher))
    }

    fn from_parts(capacity: usize, hasher: H) -> Self {
        debug!(target: "avl_hashindex::index", capacity, "created hash index");
        Self {
            hasher,
            buckets: (0..capacity).map(|_| None).collect(),
            len: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    /// Total number of keys across all buckets.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn bucket_of<Q>(&self, key: &Q) -> usize
    where
        Q: ?Sized + AsRef<[u8]>,
    {
        let index = self.hasher.bucket(key.as_ref(), self.buckets.len());
        debug_assert!(index < self.buckets.len(), "hasher returned out-of-range bucket");
        index
    }

    /// The tree stored in slot `index`, if that slot was ever populated.
    pub fn bucket(&self, index: usize) -> Option<&AvlTree<K>> {
        self.buckets.get(index)?.as_ref()
    }

    /// Indices of slots holding a tree, including trees emptied by removals.
    pub fn occupied_buckets(&self) -> impl Iterator<Item = usize> + '_ {
        self.buckets
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|_| i))
    }

    /// Insert `key`; returns `false` if it was already present.
    pub fn insert(&mut self, key: K) -> bool {
        let index = self.bucket_of(&key);
        let tree = self.buckets[index].get_or_insert_with(|| {
            trace!(target: "avl_hashindex::index", bucket = index, "created bucket tree");
            AvlTree::new()
        });
        let inserted = tree.insert(key);
        if inserted {
            self.len += 1;
        }
        inserted
    }

    pub fn search<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord + AsRef<[u8]>,
    {
        self.get(key)
            .is_some_and(|found| <K as Borrow<Q>>::borrow(found) == key)
    }

    pub fn get<Q>(&self, key: &Q) -> Option<&K>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord + AsRef<[u8]>,
    {
        self.buckets[self.bucket_of(key)].as_ref()?.get(key)
    }

    /// Remove `key`, returning the stored key if it was present. The bucket's
    /// tree stays allocated even when this empties it.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<K>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord + AsRef<[u8]>,
    {
        let index = self.bucket_of(key);
        let removed = self.buckets[index].as_mut()?.remove(key);
        if removed.is_some() {
            self.len -= 1;
        }
        removed
    }

    /// Height of the whole bucket tree holding `key`, or `None` if the key is
    /// absent. Every key that shares a bucket reports the same height.
    pub fn height_of<Q>(&self, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord + AsRef<[u8]>,
    {
        let tree = self.buckets[self.bucket_of(key)].as_ref()?;
        tree.contains(key).then(|| tree.height())
    }

    /// Every key, grouped by bucket index and ascending within a bucket.
    pub fn iter(&self) -> impl Iterator<Item = &K> + '_ {
        self.buckets.iter().flatten().flat_map(AvlTree::iter)
    }

    /// Check every bucket tree; the first corrupted bucket is reported.
    pub fn validate(&self) -> Result<()> {
        for (bucket, slot) in self.buckets.iter().enumerate() {
            if let Some(tree) = slot {
                tree.validate()
                    .map_err(|violation| IndexError::Corrupted { bucket, violation })?;
            }
        }
        Ok(())
    }
}

impl<K> FromIterator<K> for HashIndex<K>
where
    K: Ord + AsRef<[u8]>,
{
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut index = HashIndex::new();
        index.extend(iter);
        index
    }
}

impl<K, H> Extend<K> for HashIndex<K, H>
where
    K: Ord + AsRef<[u8]>,
    H: BucketHash,
{
    fn extend<I: IntoIterator<Item = K>>(&mut self, iter: I) {
        for key in iter {
            self.insert(key);
        }
    }
}
