//! Sharded concurrent map for run descriptors.
//!
//! Construction has many disjoint writers (one per slice) followed by a
//! read-only phase after the fork-join barrier, so a handful of mutex
//! shards is all the coordination needed. Neighboring keys hash to
//! different shards, which keeps writers from adjacent runs apart.

use std::collections::HashMap;
use std::sync::Mutex;

use ahash::RandomState;

const NUM_SHARDS: usize = 16;

#[derive(Debug, Default)]
pub struct RunInfoMap {
    shards: [Mutex<HashMap<usize, i64, RandomState>>; NUM_SHARDS],
}

impl RunInfoMap {
    #[inline]
    fn shard(&self, key: usize) -> &Mutex<HashMap<usize, i64, RandomState>> {
        &self.shards[key % NUM_SHARDS]
    }

    pub fn insert(&self, key: usize, value: i64) {
        self.shard(key)
            .lock()
            .expect("run-info shard poisoned")
            .insert(key, value);
    }

    /// Stored descriptor, or 0 when the position precedes no run.
    pub fn get(&self, key: usize) -> i64 {
        self.shard(key)
            .lock()
            .expect("run-info shard poisoned")
            .get(&key)
            .copied()
            .unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.shards
            .iter()
            .map(|s| s.lock().expect("run-info shard poisoned").len())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
