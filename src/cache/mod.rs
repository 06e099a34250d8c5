//! Cache Module
//!
//! Provides in-memory caching with TTL expiration, LRU eviction and tag
//! invalidation.

mod entry;
mod lru;
mod stats;
mod store;
mod tags;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use entry::CacheEntry;
pub use lru::{LruList, NodeId};
pub use stats::CacheStats;
pub use store::CacheStore;
pub use tags::TagIndex;

// == Public Constants ==
/// Default maximum number of entries
pub const DEFAULT_MAX_SIZE: usize = 1000;
