//! Memo cache for tile resolution.
//!
//! Tile assignment is pure, so caching is only a speed-up: a miss recomputes the
//! same answer. The key is the full input tuple, including the photo-list
//! generation, so a stale entry can never be served after a list swap even if
//! the owner forgets to clear.

use std::collections::{HashMap, VecDeque};

use crate::tiling::tile_index;
use crate::types::CellCoordinate;

/// Default number of cached tile assignments.
pub const DEFAULT_TILE_CACHE_CAPACITY: usize = 1024;

/// Exact inputs of one tile resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileKey {
    pub cell: CellCoordinate,
    pub seed: u32,
    /// Generation of the photo list the index refers to.
    pub generation: u64,
}

/// Bounded cache of `TileKey -> photo index`.
///
/// Eviction is by insertion order; lookups do not promote entries.
#[derive(Debug)]
pub struct TileCache {
    entries: HashMap<TileKey, Option<usize>>,
    order: VecDeque<TileKey>,
    capacity: usize,
    hits: u64,
    misses: u64,
}

impl TileCache {
    /// Create a new cache with the given capacity.
    ///
    /// A capacity of 0 disables caching entirely.
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: HashMap::with_capacity(capacity.min(DEFAULT_TILE_CACHE_CAPACITY)),
            order: VecDeque::new(),
            capacity,
            hits: 0,
            misses: 0,
        }
    }

    /// Photo index for `key` in a list of `len` photos, computing it on a miss.
    pub fn index_for(&mut self, key: TileKey, len: usize) -> Option<usize> {
        if let Some(index) = self.entries.get(&key) {
            self.hits += 1;
            return *index;
        }
        self.misses += 1;
        let index = tile_index(key.cell, key.seed, len);
        if self.capacity > 0 {
            self.entries.insert(key, index);
            self.order.push_back(key);
            self.enforce_cap();
        }
        index
    }

    /// Number of cached entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `(hits, misses)` since creation.
    pub fn stats(&self) -> (u64, u64) {
        (self.hits, self.misses)
    }

    /// Remove all entries.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }

    /// Evict oldest entries until we're at or below capacity.
    fn enforce_cap(&mut self) {
        while self.entries.len() > self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.entries.remove(&oldest);
            } else {
                break;
            }
        }
    }
}

impl Default for TileCache {
    fn default() -> Self {
        Self::new(DEFAULT_TILE_CACHE_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(row: i64, col: i64) -> TileKey {
        TileKey {
            cell: CellCoordinate::new(row, col),
            seed: 7,
            generation: 1,
        }
    }

    #[test]
    fn test_hit_matches_direct_resolution() {
        let mut cache = TileCache::new(8);
        let first = cache.index_for(key(2, 3), 10);
        let second = cache.index_for(key(2, 3), 10);
        assert_eq!(first, second);
        assert_eq!(first, tile_index(CellCoordinate::new(2, 3), 7, 10));
        assert_eq!(cache.stats(), (1, 1));
    }

    #[test]
    fn test_eviction() {
        let mut cache = TileCache::new(2);
        cache.index_for(key(0, 0), 10);
        cache.index_for(key(0, 1), 10);
        cache.index_for(key(0, 2), 10);
        assert_eq!(cache.len(), 2);
        // (0, 0) was evicted, so this is a miss again
        cache.index_for(key(0, 0), 10);
        assert_eq!(cache.stats(), (0, 4));
    }

    #[test]
    fn test_zero_capacity() {
        let mut cache = TileCache::new(0);
        assert_eq!(cache.index_for(key(0, 0), 0), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_generation_is_part_of_key() {
        let mut cache = TileCache::new(8);
        cache.index_for(key(1, 1), 10);
        let swapped = TileKey {
            generation: 2,
            ..key(1, 1)
        };
        cache.index_for(swapped, 3);
        assert_eq!(cache.stats(), (0, 2));
    }

    #[test]
    fn test_clear() {
        let mut cache = TileCache::new(3);
        cache.index_for(key(0, 0), 5);
        cache.clear();
        assert!(cache.is_empty());
    }
}
