//! Property-Based Tests for Cache Module
//!
//! Uses proptest to check the store's capacity, ordering, accounting and
//! structural invariants over random operation sequences.

use proptest::prelude::*;
use std::collections::HashSet;

use crate::cache::CacheStore;

// == Test Configuration ==
const TEST_MAX_SIZE: usize = 100;
const TEST_TTL: i64 = 300;
const TAGS: [&str; 3] = ["events", "stats", "workshops"];

// == Strategies ==
/// Generates cache keys from a small alphabet so operations collide
fn key_strategy() -> impl Strategy<Value = String> {
    "[a-f]{1,2}".prop_map(|s| s)
}

fn value_strategy() -> impl Strategy<Value = u32> {
    any::<u32>()
}

fn tags_strategy() -> impl Strategy<Value = Vec<&'static str>> {
    prop::sample::subsequence(TAGS.to_vec(), 0..=TAGS.len())
}

#[derive(Debug, Clone)]
enum CacheOp {
    Set {
        key: String,
        value: u32,
        ttl: i64,
        tags: Vec<&'static str>,
    },
    Get {
        key: String,
    },
    Delete {
        key: String,
    },
    InvalidateTag {
        tag: &'static str,
    },
    Cleanup,
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    prop_oneof![
        4 => (key_strategy(), value_strategy(), prop_oneof![Just(0i64), Just(TEST_TTL)], tags_strategy())
            .prop_map(|(key, value, ttl, tags)| CacheOp::Set { key, value, ttl, tags }),
        3 => key_strategy().prop_map(|key| CacheOp::Get { key }),
        1 => key_strategy().prop_map(|key| CacheOp::Delete { key }),
        1 => prop::sample::select(TAGS.to_vec()).prop_map(|tag| CacheOp::InvalidateTag { tag }),
        1 => Just(CacheOp::Cleanup),
    ]
}

fn apply(store: &mut CacheStore<u32>, op: CacheOp) -> Option<bool> {
    match op {
        CacheOp::Set {
            key,
            value,
            ttl,
            tags,
        } => {
            store.set(key, value, ttl, &tags);
            None
        }
        CacheOp::Get { key } => Some(store.get(&key).is_some()),
        CacheOp::Delete { key } => {
            store.delete(&key);
            None
        }
        CacheOp::InvalidateTag { tag } => {
            store.invalidate_by_tag(tag);
            None
        }
        CacheOp::Cleanup => {
            store.cleanup();
            None
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // Map, list and tag index stay in 1:1 correspondence after every operation.
    #[test]
    fn prop_structure_consistent(
        capacity in 1usize..8,
        ops in prop::collection::vec(cache_op_strategy(), 1..100)
    ) {
        let mut store = CacheStore::new(capacity);

        for op in ops {
            apply(&mut store, op);
            store.assert_consistent();
        }
    }

    // Hit and miss counters reflect exactly the reads performed.
    #[test]
    fn prop_statistics_accuracy(ops in prop::collection::vec(cache_op_strategy(), 1..50)) {
        let mut store = CacheStore::new(TEST_MAX_SIZE);
        let mut expected_hits: u64 = 0;
        let mut expected_misses: u64 = 0;

        for op in ops {
            match apply(&mut store, op) {
                Some(true) => expected_hits += 1,
                Some(false) => expected_misses += 1,
                None => {}
            }
        }

        let stats = store.stats();
        prop_assert_eq!(stats.hits, expected_hits, "Hits mismatch");
        prop_assert_eq!(stats.misses, expected_misses, "Misses mismatch");
        prop_assert_eq!(stats.size, store.len(), "Size mismatch");

        let total = expected_hits + expected_misses;
        if total == 0 {
            prop_assert_eq!(stats.hit_rate, 0.0);
        } else {
            prop_assert_eq!(stats.hit_rate, expected_hits as f64 / total as f64);
        }
    }

    // A value read back before its TTL elapses is the value stored, and the
    // read counts as exactly one hit.
    #[test]
    fn prop_roundtrip_storage(key in key_strategy(), value in value_strategy()) {
        let mut store = CacheStore::new(TEST_MAX_SIZE);

        store.set(key.clone(), value, TEST_TTL, &[]);

        prop_assert_eq!(store.get(&key), Some(value));
        prop_assert_eq!(store.stats().hits, 1);
    }

    // Size never exceeds capacity after any set.
    #[test]
    fn prop_capacity_enforcement(
        capacity in 1usize..20,
        entries in prop::collection::vec((key_strategy(), value_strategy()), 1..200)
    ) {
        let mut store = CacheStore::new(capacity);

        for (key, value) in entries {
            store.set(key, value, TEST_TTL, &[]);
            prop_assert!(
                store.len() <= capacity,
                "Cache size {} exceeds max {}",
                store.len(),
                capacity
            );
        }
    }

    // Inserting a new key at capacity evicts exactly the least recently
    // touched key, where a touch is any get or set.
    #[test]
    fn prop_lru_eviction_order(
        initial_keys in prop::collection::hash_set("[a-z]{3}", 2..10),
        touches in prop::collection::vec(any::<prop::sample::Index>(), 0..10),
        new_value in value_strategy()
    ) {
        let keys: Vec<String> = initial_keys.into_iter().collect();
        let capacity = keys.len();
        let mut store = CacheStore::new(capacity);

        // Model: front = most recent
        let mut order: Vec<String> = Vec::new();
        for key in &keys {
            store.set(key.clone(), 0, TEST_TTL, &[]);
            order.insert(0, key.clone());
        }

        for touch in touches {
            let key = keys[touch.index(keys.len())].clone();
            prop_assert!(store.get(&key).is_some());
            order.retain(|k| k != &key);
            order.insert(0, key);
        }

        let expected_evicted = order.last().cloned().unwrap();
        store.set("new-key", new_value, TEST_TTL, &[]);

        prop_assert_eq!(store.len(), capacity);
        prop_assert!(!store.contains_key(&expected_evicted));
        for key in keys.iter().filter(|k| **k != expected_evicted) {
            prop_assert!(store.contains_key(key), "Key '{}' should still exist", key);
        }
        prop_assert_eq!(store.stats().evictions, 1);
    }

    // Tag invalidation removes exactly the live entries carrying the tag.
    #[test]
    fn prop_tag_invalidation(
        entries in prop::collection::vec((key_strategy(), tags_strategy()), 1..30),
        tag in prop::sample::select(TAGS.to_vec())
    ) {
        let mut store = CacheStore::new(TEST_MAX_SIZE);
        let mut tagged: HashSet<String> = HashSet::new();
        let mut untagged: HashSet<String> = HashSet::new();

        for (key, tags) in entries {
            store.set(key.clone(), 0, TEST_TTL, &tags);
            tagged.remove(&key);
            untagged.remove(&key);
            if tags.contains(&tag) {
                tagged.insert(key);
            } else {
                untagged.insert(key);
            }
        }

        let removed = store.invalidate_by_tag(tag);

        prop_assert_eq!(removed, tagged.len());
        for key in &tagged {
            prop_assert!(!store.contains_key(key));
        }
        for key in &untagged {
            prop_assert!(store.contains_key(key));
        }
        store.assert_consistent();
    }

    // Zero-TTL entries always read as misses.
    #[test]
    fn prop_zero_ttl_always_misses(key in key_strategy(), value in value_strategy()) {
        let mut store = CacheStore::new(TEST_MAX_SIZE);

        store.set(key.clone(), value, 0, &[]);

        prop_assert_eq!(store.get(&key), None);
        prop_assert_eq!(store.stats().misses, 1);
    }
}
