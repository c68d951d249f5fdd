//! Bounded in-memory cache with time-based expiry
//!
//! Provides a `Cache` that holds at most `capacity` values, drops entries
//! once they are older than the TTL, and evicts the oldest entry when a new
//! key arrives at capacity.

use std::collections::HashMap;
use std::time::{Duration, Instant};

/// A cached value with its insertion metadata
#[derive(Debug, Clone)]
struct CacheEntry<V> {
    /// The cached value
    value: V,
    /// When the value was inserted
    inserted_at: Instant,
    /// Insertion order, breaks ties between entries sharing an instant
    seq: u64,
}

impl<V> CacheEntry<V> {
    fn is_expired(&self, ttl: Duration) -> bool {
        self.inserted_at.elapsed() >= ttl
    }
}

/// Key/value cache bounded by size and age
///
/// Construct one explicitly and pass it to whoever needs it; there is no
/// global instance.
#[derive(Debug, Clone)]
pub struct Cache<V> {
    entries: HashMap<String, CacheEntry<V>>,
    capacity: usize,
    ttl: Duration,
    next_seq: u64,
}

impl<V: Clone> Cache<V> {
    /// Creates an empty cache
    ///
    /// # Arguments
    /// * `capacity` - Maximum number of entries (values below 1 are treated as 1)
    /// * `ttl` - Age at which an entry stops being returned
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            capacity: capacity.max(1),
            ttl,
            next_seq: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the value for `key` if present and younger than the TTL
    ///
    /// An expired entry is removed as a side effect.
    pub fn get(&mut self, key: &str) -> Option<V> {
        let expired = self.entries.get(key)?.is_expired(self.ttl);
        if expired {
            self.entries.remove(key);
            return None;
        }
        self.entries.get(key).map(|entry| entry.value.clone())
    }

    /// Inserts or overwrites `key` with a fresh timestamp
    ///
    /// When the cache is full and `key` is new, the entry with the oldest
    /// insertion time is evicted first.
    pub fn set(&mut self, key: impl Into<String>, value: V) {
        let key = key.into();

        if !self.entries.contains_key(&key) && self.entries.len() >= self.capacity {
            self.evict_oldest();
        }

        let entry = CacheEntry {
            value,
            inserted_at: Instant::now(),
            seq: self.next_seq,
        };
        self.next_seq += 1;
        self.entries.insert(key, entry);
    }

    /// Removes `key`; no-op when absent
    pub fn delete(&mut self, key: &str) {
        self.entries.remove(key);
    }

    /// Removes every entry
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of stored entries, including expired ones not yet evicted
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn evict_oldest(&mut self) {
        let oldest = self
            .entries
            .iter()
            .min_by_key(|(_, entry)| (entry.inserted_at, entry.seq))
            .map(|(key, _)| key.clone());

        if let Some(key) = oldest {
            self.entries.remove(&key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_get_returns_fresh_value() {
        let mut cache = Cache::new(10, Duration::from_secs(60));
        cache.set("key", 42);

        assert_eq!(cache.get("key"), Some(42));
    }

    #[test]
    fn test_get_missing_key_returns_none() {
        let mut cache: Cache<i32> = Cache::new(10, Duration::from_secs(60));
        assert_eq!(cache.get("nonexistent"), None);
    }

    #[test]
    fn test_expired_entry_is_not_returned_and_evicted() {
        let mut cache = Cache::new(10, Duration::from_millis(5));
        cache.set("key", "value".to_string());

        thread::sleep(Duration::from_millis(20));

        assert_eq!(cache.get("key"), None);
        assert!(cache.is_empty(), "Expired entry should be removed on get");
    }

    #[test]
    fn test_zero_ttl_expires_immediately() {
        let mut cache = Cache::new(10, Duration::ZERO);
        cache.set("key", 1);
        assert_eq!(cache.get("key"), None);
    }

    #[test]
    fn test_set_beyond_capacity_evicts_oldest() {
        let mut cache = Cache::new(3, Duration::from_secs(60));
        cache.set("a", 1);
        cache.set("b", 2);
        cache.set("c", 3);

        cache.set("d", 4);

        assert_eq!(cache.len(), 3);
        assert_eq!(cache.get("a"), None, "Oldest entry should be evicted");
        assert_eq!(cache.get("b"), Some(2));
        assert_eq!(cache.get("c"), Some(3));
        assert_eq!(cache.get("d"), Some(4));
    }

    #[test]
    fn test_overwrite_refreshes_timestamp() {
        let mut cache = Cache::new(2, Duration::from_secs(60));
        cache.set("a", 1);
        cache.set("b", 2);
        cache.set("a", 10);

        cache.set("c", 3);

        assert_eq!(cache.get("a"), Some(10));
        assert_eq!(cache.get("b"), None, "b is now the oldest");
        assert_eq!(cache.get("c"), Some(3));
    }

    #[test]
    fn test_overwrite_at_capacity_does_not_evict() {
        let mut cache = Cache::new(2, Duration::from_secs(60));
        cache.set("a", 1);
        cache.set("b", 2);

        cache.set("b", 20);

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get("a"), Some(1));
        assert_eq!(cache.get("b"), Some(20));
    }

    #[test]
    fn test_delete_and_clear() {
        let mut cache = Cache::new(10, Duration::from_secs(60));
        cache.set("a", 1);
        cache.set("b", 2);

        cache.delete("a");
        cache.delete("missing");
        assert_eq!(cache.get("a"), None);
        assert_eq!(cache.len(), 1);

        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_zero_capacity_holds_one_entry() {
        let mut cache = Cache::new(0, Duration::from_secs(60));
        assert_eq!(cache.capacity(), 1);

        cache.set("a", 1);
        cache.set("b", 2);

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("b"), Some(2));
    }
}
