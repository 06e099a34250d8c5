//! Cache Store Module
//!
//! Main cache engine combining a key map with the arena LRU list, the tag
//! index and TTL expiration.

use std::collections::HashMap;

use chrono::Utc;
use tracing::debug;

use crate::cache::{CacheEntry, CacheStats, LruList, NodeId, TagIndex, DEFAULT_MAX_SIZE};

/// Payload of a list node: the key is kept alongside the entry so the tail
/// can be evicted without a reverse lookup.
#[derive(Debug)]
struct Item<T> {
    key: String,
    entry: CacheEntry<T>,
}

// == Cache Store ==
/// Bounded cache with LRU eviction, per-entry TTL and tag invalidation.
///
/// Every key in `index` maps to exactly one live node in `lru`, and `lru`
/// holds no other node.
#[derive(Debug)]
pub struct CacheStore<T> {
    /// Key -> node handle
    index: HashMap<String, NodeId>,
    /// Recency order, owns the entries
    lru: LruList<Item<T>>,
    /// Tag -> keys
    tags: TagIndex,
    /// Performance counters
    stats: CacheStats,
    /// Maximum number of entries allowed
    max_size: usize,
}

impl<T> Default for CacheStore<T> {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_SIZE)
    }
}

impl<T> CacheStore<T> {
    // == Constructor ==
    /// Creates a new CacheStore holding at most `max_size` entries.
    ///
    /// A capacity of zero is clamped to one.
    pub fn new(max_size: usize) -> Self {
        Self {
            index: HashMap::new(),
            lru: LruList::new(),
            tags: TagIndex::new(),
            stats: CacheStats::new(),
            max_size: max_size.max(1),
        }
    }

    // == Set ==
    /// Stores a value under `key` for `ttl_seconds` with the given tags.
    ///
    /// Overwriting an existing key replaces its value, expiry and tags in
    /// place and marks it most recently used. Inserting a new key beyond
    /// capacity evicts the least recently used entry.
    pub fn set(&mut self, key: impl Into<String>, value: T, ttl_seconds: i64, tags: &[&str]) {
        let key = key.into();
        let entry = CacheEntry::new(value, ttl_seconds, tags);

        if let Some(&id) = self.index.get(&key) {
            if let Some(item) = self.lru.get_mut(id) {
                self.tags.unregister(&key, &item.entry.tags);
                self.tags.register(&key, &entry.tags);
                item.entry = entry;
            }
            self.lru.move_to_front(id);
            return;
        }

        self.tags.register(&key, &entry.tags);
        let id = self.lru.push_front(Item {
            key: key.clone(),
            entry,
        });
        self.index.insert(key, id);

        if self.index.len() > self.max_size {
            self.evict_oldest();
        }
    }

    // == Get ==
    /// Retrieves a value by key.
    ///
    /// Expired entries are removed and counted as misses. A hit marks the
    /// entry most recently used.
    pub fn get(&mut self, key: &str) -> Option<T>
    where
        T: Clone,
    {
        let Some(&id) = self.index.get(key) else {
            self.stats.record_miss();
            return None;
        };

        let expired = self
            .lru
            .get(id)
            .map_or(true, |item| item.entry.is_expired());

        if expired {
            self.remove_entry(key);
            self.stats.record_expirations(1);
            self.stats.record_miss();
            debug!(key, "cache entry expired on read");
            return None;
        }

        self.lru.move_to_front(id);
        self.stats.record_hit();
        self.lru.get(id).map(|item| item.entry.value.clone())
    }

    // == Delete ==
    /// Removes an entry by key. Returns whether anything was removed.
    pub fn delete(&mut self, key: &str) -> bool {
        self.remove_entry(key).is_some()
    }

    // == Clear ==
    /// Drops every entry and resets all counters.
    pub fn clear(&mut self) {
        self.index.clear();
        self.lru.clear();
        self.tags.clear();
        self.stats = CacheStats::new();
    }

    // == Invalidate By Tag ==
    /// Removes every entry carrying `tag`. Returns the number removed.
    pub fn invalidate_by_tag(&mut self, tag: &str) -> usize {
        let keys = self.tags.keys_for(tag);
        let removed = keys
            .iter()
            .filter(|key| self.remove_entry(key).is_some())
            .count();

        if removed > 0 {
            debug!(tag, removed, "invalidated cache entries by tag");
        }
        removed
    }

    // == Cleanup Expired ==
    /// Removes all expired entries from the cache.
    ///
    /// Returns the number of entries removed.
    pub fn cleanup(&mut self) -> usize {
        let now = Utc::now();
        let expired_keys: Vec<String> = self
            .lru
            .iter()
            .filter(|item| item.entry.is_expired_at(now))
            .map(|item| item.key.clone())
            .collect();

        for key in &expired_keys {
            self.remove_entry(key);
        }

        self.stats.record_expirations(expired_keys.len());
        expired_keys.len()
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        self.stats.snapshot(self.index.len())
    }

    // == Keys ==
    /// Returns live keys from most to least recently used.
    ///
    /// Expired entries not yet swept are included.
    pub fn keys(&self) -> Vec<String> {
        self.lru.iter().map(|item| item.key.clone()).collect()
    }

    // == Contains Key ==
    /// Checks presence without touching recency or counters.
    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    // == Length ==
    /// Returns the current number of entries in the cache.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    // == Is Empty ==
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    // == Internal Removal ==
    /// Removes a key from the map, the list and the tag index.
    fn remove_entry(&mut self, key: &str) -> Option<CacheEntry<T>> {
        let id = self.index.remove(key)?;
        let item = self.lru.remove(id)?;
        self.tags.unregister(&item.key, &item.entry.tags);
        Some(item.entry)
    }

    fn evict_oldest(&mut self) {
        if let Some(item) = self.lru.pop_back() {
            self.index.remove(&item.key);
            self.tags.unregister(&item.key, &item.entry.tags);
            self.stats.record_eviction();
            debug!(key = %item.key, "evicted least recently used entry");
        }
    }

    /// Checks that map, list and tag index agree.
    #[cfg(test)]
    pub(crate) fn assert_consistent(&self) {
        self.lru.assert_consistent();
        assert_eq!(self.index.len(), self.lru.len(), "map and list sizes differ");
        assert!(self.index.len() <= self.max_size, "capacity exceeded");

        for (key, &id) in &self.index {
            let item = self.lru.get(id).expect("mapped id must be live");
            assert_eq!(&item.key, key, "map points at wrong node");
            for tag in &item.entry.tags {
                assert!(
                    self.tags.keys_for(tag).contains(key),
                    "tag index missing {key} under {tag}"
                );
            }
        }
    }
}
