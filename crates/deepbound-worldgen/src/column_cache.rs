//! Sharded, lock-protected memo of built columns.
//!
//! Shards are picked by `x mod N`. Locks are held only for single map
//! operations; columns are built outside any lock. Two threads racing on the
//! same column both build it and the later insert wins, which is harmless
//! because building is pure. Entries are never evicted.

use std::sync::{Arc, PoisonError, RwLock};

use rustc_hash::FxHashMap;

use crate::column::ColumnInfo;

type Shard = RwLock<FxHashMap<i32, Arc<ColumnInfo>>>;

pub struct ColumnCache {
    shards: Vec<Shard>,
}

impl ColumnCache {
    /// Create a cache with `shards` partitions (at least one).
    pub fn new(shards: usize) -> Self {
        let shards = (0..shards.max(1))
            .map(|_| RwLock::new(FxHashMap::default()))
            .collect();
        Self { shards }
    }

    pub fn shard_count(&self) -> usize {
        self.shards.len()
    }

    fn shard(&self, x: i32) -> &Shard {
        let index = i64::from(x).rem_euclid(self.shards.len() as i64) as usize;
        &self.shards[index]
    }

    pub fn get(&self, x: i32) -> Option<Arc<ColumnInfo>> {
        self.shard(x)
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&x)
            .cloned()
    }

    /// Publish `column`, replacing any earlier entry for the same x.
    pub fn insert(&self, column: ColumnInfo) -> Arc<ColumnInfo> {
        let column = Arc::new(column);
        self.shard(column.x)
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(column.x, Arc::clone(&column));
        column
    }

    /// Cached column `x`, building it with `build` on a miss.
    pub fn get_or_build(&self, x: i32, build: impl FnOnce() -> ColumnInfo) -> Arc<ColumnInfo> {
        if let Some(column) = self.get(x) {
            return column;
        }
        self.insert(build())
    }

    pub fn len(&self) -> usize {
        self.shards
            .iter()
            .map(|shard| shard.read().unwrap_or_else(PoisonError::into_inner).len())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
