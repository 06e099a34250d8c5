//! Tagged Cache - A process-local cache for slow data sources
//!
//! Bounded LRU store with per-entry TTL and tag invalidation, wrapped by a
//! cache-aside manager with named per-domain strategies.

pub mod cache;
pub mod config;
pub mod context;
pub mod error;
pub mod keys;
pub mod manager;
pub mod strategy;
pub mod tasks;

pub use cache::{CacheStats, CacheStore};
pub use config::CacheConfig;
pub use context::CacheContext;
pub use error::{CacheError, FetchError};
pub use manager::{CacheManager, GetOptions};
pub use strategy::{CacheStrategy, StrategyName};
pub use tasks::spawn_cleanup_task;
