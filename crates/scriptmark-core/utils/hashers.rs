//! Hash map helpers backed by ahash
//!
//! The store and the span color lookup key everything by opaque string ids;
//! ahash keeps those lookups cheap without giving up `DoS` resistance.

use ahash::RandomState;
use std::collections::{HashMap, HashSet};

/// `HashMap` using the crate-wide hasher
pub type FastMap<K, V> = HashMap<K, V, RandomState>;

/// `HashSet` using the crate-wide hasher
pub type FastSet<T> = HashSet<T, RandomState>;

/// Create a new `HashMap` with the crate-wide hasher
///
/// # Example
///
/// ```rust
/// use scriptmark_core::utils::hashers::create_hash_map;
///
/// let mut map = create_hash_map::<String, usize>();
/// map.insert("h1".to_string(), 0);
/// assert_eq!(map.get("h1"), Some(&0));
/// ```
#[must_use]
pub fn create_hash_map<K, V>() -> FastMap<K, V> {
    HashMap::with_hasher(RandomState::new())
}

/// Create a new `HashMap` with specific capacity and the crate-wide hasher
#[must_use]
pub fn create_hash_map_with_capacity<K, V>(capacity: usize) -> FastMap<K, V> {
    HashMap::with_capacity_and_hasher(capacity, RandomState::new())
}

/// Create a new `HashSet` with the crate-wide hasher
#[must_use]
pub fn create_hash_set<T>() -> FastSet<T> {
    HashSet::with_hasher(RandomState::new())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_map_creation() {
        let mut map = create_hash_map::<&str, i32>();
        map.insert("a", 1);
        assert_eq!(map.len(), 1);

        let map = create_hash_map_with_capacity::<&str, i32>(32);
        assert!(map.capacity() >= 32);
    }

    #[test]
    fn hash_set_deduplicates() {
        let mut set = create_hash_set();
        set.insert("g1");
        set.insert("g1");
        assert_eq!(set.len(), 1);
    }
}
