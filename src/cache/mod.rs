//! Memo tables for the inclusion search.
//!
//! The downward strategy repeatedly asks for the rule tuples of the bigger
//! automaton over one symbol whose parent lies in a given state set. With
//! `use_downward_cache` enabled these answers are kept in a [`Cache`] keyed
//! by `(symbol, state set)`.
//!
//! # Example
//!
//! ```
//! use ta_rs::cache::Cache;
//!
//! let mut cache = Cache::<(u32, u32), i32>::new(4);
//! cache.insert((1, 2), 42);
//! assert_eq!(cache.get(&(1, 2)), Some(&42));
//! assert_eq!(cache.hits(), 1);
//! ```

mod hashmap;

pub use hashmap::HashMapCache;

/// Default cache implementation.
pub type Cache<K, V> = HashMapCache<K, V>;
