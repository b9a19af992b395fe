//! Identifier-keyed sets and maps.
//!
//! Containers keyed by [`ProvId`] or [`Snapshot`] use [`IdBuildHasher`], an
//! FxHash over the identifier words, together with the key's own `Eq`. Any
//! hash consistent with equality is correct; the [`IndexHints`] only size the
//! initial allocation so that lookups stay cheap on large traversals.

use std::collections::{HashMap, HashSet};
use std::hash::BuildHasherDefault;

use rustc_hash::FxHasher;
use serde::{Deserialize, Serialize};

use crate::error::TypeError;
use crate::id::ProvId;
use crate::version::Snapshot;

/// Hasher builder shared by all identifier-keyed containers.
pub type IdBuildHasher = BuildHasherDefault<FxHasher>;

pub type IdHashSet = HashSet<ProvId, IdBuildHasher>;
pub type IdHashMap<V> = HashMap<ProvId, V, IdBuildHasher>;
pub type SnapshotSet = HashSet<Snapshot, IdBuildHasher>;
pub type SnapshotMap<V> = HashMap<Snapshot, V, IdBuildHasher>;

/// Sizing hints for identifier-keyed containers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexHints {
    /// Mean bucket occupancy the container should try not to exceed.
    pub bucket_size: usize,
    /// Minimum number of buckets. Power of two, greater than zero.
    pub min_buckets: usize,
}

impl IndexHints {
    pub const DEFAULT_BUCKET_SIZE: usize = 10;
    pub const DEFAULT_MIN_BUCKETS: usize = 1 << 10;

    pub fn new(bucket_size: usize, min_buckets: usize) -> Result<Self, TypeError> {
        let hints = Self {
            bucket_size,
            min_buckets,
        };
        hints.validate()?;
        Ok(hints)
    }

    pub fn validate(&self) -> Result<(), TypeError> {
        if self.bucket_size == 0 {
            return Err(TypeError::InvalidIndexHints(
                "bucket_size must be greater than zero".into(),
            ));
        }
        if !self.min_buckets.is_power_of_two() {
            return Err(TypeError::InvalidIndexHints(format!(
                "min_buckets must be a non-zero power of two, got {}",
                self.min_buckets
            )));
        }
        Ok(())
    }

    /// Bucket count for `expected` keys: the smallest power of two keeping
    /// mean occupancy at or under `bucket_size`, never below `min_buckets`.
    pub fn bucket_count(&self, expected: usize) -> usize {
        let size = self.bucket_size.max(1);
        let needed = expected.div_ceil(size).max(1);
        needed
            .checked_next_power_of_two()
            .unwrap_or(usize::MAX)
            .max(self.min_buckets.max(1))
    }

    /// Initial capacity for a container expected to hold `expected` keys:
    /// [`bucket_count`](Self::bucket_count) buckets of `bucket_size` keys
    /// each, never less than `expected`.
    pub fn capacity_for(&self, expected: usize) -> usize {
        self.bucket_count(expected)
            .saturating_mul(self.bucket_size.max(1))
            .max(expected)
    }

    pub fn new_id_set(&self, expected: usize) -> IdHashSet {
        IdHashSet::with_capacity_and_hasher(self.capacity_for(expected), IdBuildHasher::default())
    }

    pub fn new_id_map<V>(&self, expected: usize) -> IdHashMap<V> {
        IdHashMap::with_capacity_and_hasher(self.capacity_for(expected), IdBuildHasher::default())
    }

    pub fn new_snapshot_set(&self, expected: usize) -> SnapshotSet {
        SnapshotSet::with_capacity_and_hasher(
            self.capacity_for(expected),
            IdBuildHasher::default(),
        )
    }
}

impl Default for IndexHints {
    fn default() -> Self {
        Self {
            bucket_size: Self::DEFAULT_BUCKET_SIZE,
            min_buckets: Self::DEFAULT_MIN_BUCKETS,
        }
    }
}
