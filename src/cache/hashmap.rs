//! HashMap-backed memo table.
//!
//! Every entry is kept until [`HashMapCache::clear`], so a lookup never
//! misses because of a collision. Hit and miss counters are exposed for
//! the inclusion statistics.

use std::collections::HashMap;
use std::hash::Hash;

/// A cache backed by [HashMap].
pub struct HashMapCache<K, V> {
    map: HashMap<K, V>,
    hits: usize,
    misses: usize,
}

impl<K, V> Default for HashMapCache<K, V> {
    fn default() -> Self {
        Self::new(10)
    }
}

impl<K, V> HashMapCache<K, V> {
    /// Creates a cache with room for `2^bits` entries before the first resize.
    pub fn new(bits: usize) -> Self {
        Self::with_capacity(1 << bits)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            map: HashMap::with_capacity(capacity),
            hits: 0,
            misses: 0,
        }
    }

    /// Returns the number of entries in the cache.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Returns the number of cache hits.
    pub fn hits(&self) -> usize {
        self.hits
    }

    /// Returns the number of cache misses.
    pub fn misses(&self) -> usize {
        self.misses
    }

    /// Drops all entries. Counters are kept.
    pub fn clear(&mut self) {
        self.map.clear();
    }
}

impl<K, V> HashMapCache<K, V>
where
    K: Hash + Eq,
{
    /// Looks up a key, counting the hit or miss.
    #[inline]
    pub fn get(&mut self, key: &K) -> Option<&V> {
        match self.map.get(key) {
            Some(v) => {
                self.hits += 1;
                Some(v)
            }
            None => {
                self.misses += 1;
                None
            }
        }
    }

    #[inline]
    pub fn insert(&mut self, key: K, value: V) {
        self.map.insert(key, value);
    }

    /// Returns the cached value for `key`, computing and storing it on a miss.
    pub fn get_or_insert_with(&mut self, key: K, compute: impl FnOnce(&K) -> V) -> &V {
        if self.map.contains_key(&key) {
            self.hits += 1;
        } else {
            self.misses += 1;
        }
        self.map.entry(key).or_insert_with_key(compute)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitset::BitSet;
    use crate::types::Symbol;

    #[test]
    fn test_hashmap_cache_basic() {
        let mut cache = HashMapCache::<(Symbol, BitSet), Vec<u32>>::new(4);
        let key = (Symbol::new(1), [0, 2].into_iter().collect::<BitSet>());

        cache.insert(key.clone(), vec![7]);
        assert_eq!(cache.get(&key), Some(&vec![7]));
        assert_eq!(cache.get(&(Symbol::new(2), BitSet::default())), None);

        assert_eq!(cache.hits(), 1);
        assert_eq!(cache.misses(), 1);
    }

    #[test]
    fn test_get_or_insert_with() {
        let mut cache = HashMapCache::<u32, u32>::new(2);
        let mut calls = 0;
        for _ in 0..3 {
            let v = *cache.get_or_insert_with(5, |k| {
                calls += 1;
                k * 2
            });
            assert_eq!(v, 10);
        }
        assert_eq!(calls, 1);
        assert_eq!(cache.hits(), 2);
        assert_eq!(cache.misses(), 1);
    }

    #[test]
    fn test_hashmap_cache_clear() {
        let mut cache = HashMapCache::<(u64, u64), i32>::new(4);
        cache.insert((1, 2), 42);
        cache.clear();
        assert_eq!(cache.get(&(1, 2)), None);
        assert!(cache.is_empty());
    }
}
