//! Cache Manager
//!
//! Cache-aside orchestration over a shared [`CacheStore`]: callers hand in
//! a key, a fetcher and a strategy, and get back either the cached value or
//! the fetcher's result, which is then written back.
//!
//! Concurrent misses for one key share a single fetch. A fetch still in
//! flight when its key is invalidated writes its result afterwards, so an
//! invalidation can be followed by one stale repopulation lasting at most
//! the strategy's TTL.

mod inflight;
mod invalidation;

use std::future::Future;
use std::sync::Arc;

use futures::future::FutureExt;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::cache::{CacheStats, CacheStore};
use crate::error::FetchError;
use crate::strategy::CacheStrategy;

pub use inflight::{InflightFetches, SharedFetch};

/// Cache store shared between the manager and the cleanup task.
pub type SharedStore<T> = Arc<RwLock<CacheStore<T>>>;

// == Get Options ==
/// Per-call overrides for [`CacheManager::get`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GetOptions {
    /// Skip the cache read and always call the fetcher
    pub force_refresh: bool,
    /// Do not write the fetched value back
    pub skip_write: bool,
}

impl GetOptions {
    /// Re-fetch and overwrite the cached value.
    pub fn force_refresh() -> Self {
        Self {
            force_refresh: true,
            ..Self::default()
        }
    }

    /// Read through the cache but never populate it.
    pub fn skip_write() -> Self {
        Self {
            skip_write: true,
            ..Self::default()
        }
    }
}

// == Cache Manager ==
/// Cheap-to-clone handle implementing cache-aside reads.
#[derive(Debug)]
pub struct CacheManager<T> {
    store: SharedStore<T>,
    inflight: InflightFetches<T>,
}

impl<T> Clone for CacheManager<T> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            inflight: self.inflight.clone(),
        }
    }
}

impl<T> CacheManager<T> {
    // == Constructor ==
    /// Creates a manager owning `store`.
    pub fn new(store: CacheStore<T>) -> Self {
        Self::from_shared(Arc::new(RwLock::new(store)))
    }

    /// Creates a manager over an already shared store.
    pub fn from_shared(store: SharedStore<T>) -> Self {
        Self {
            store,
            inflight: InflightFetches::default(),
        }
    }

    /// The underlying shared store.
    pub fn store(&self) -> SharedStore<T> {
        Arc::clone(&self.store)
    }

    /// Number of keys with a fetch in flight.
    pub fn pending_fetches(&self) -> usize {
        self.inflight.len()
    }
}

impl<T> CacheManager<T>
where
    T: Clone + Send + Sync + 'static,
{
    // == Get ==
    /// Returns the cached value for `key`, or runs `fetcher` and caches its
    /// result under the strategy's L1 TTL and tags.
    ///
    /// - `skip_cache` strategies and `force_refresh` always call the fetcher;
    ///   `force_refresh` still writes the result unless `skip_write` is set.
    /// - On a hit the fetcher is never called.
    /// - On a miss the fetcher runs once even when several callers miss the
    ///   same key concurrently; all of them receive its result.
    ///
    /// A fetcher failure is returned unchanged (wrapped for sharing) and
    /// nothing is written.
    pub async fn get<F, Fut>(
        &self,
        key: &str,
        fetcher: F,
        strategy: &CacheStrategy,
        options: GetOptions,
    ) -> Result<T, FetchError>
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = anyhow::Result<T>> + Send + 'static,
    {
        if strategy.skip_cache || options.force_refresh {
            let value = run_fetcher(key, fetcher).await?;
            if !(options.skip_write || strategy.skip_cache) {
                self.set(key, value.clone(), strategy).await;
            }
            return Ok(value);
        }

        let cached = self.store.write().await.get(key);
        if let Some(value) = cached {
            debug!(key, "cache hit");
            return Ok(value);
        }
        debug!(key, "cache miss");

        if options.skip_write {
            return run_fetcher(key, fetcher).await;
        }

        let (fetch, started) = self.inflight.join_or_start(key, || {
            let store = Arc::clone(&self.store);
            let inflight = self.inflight.clone();
            let key = key.to_string();
            let ttl = strategy.ttl.l1;
            let tags = strategy.tags;

            async move {
                let result = run_fetcher(&key, fetcher).await;
                if let Ok(value) = &result {
                    store.write().await.set(key.clone(), value.clone(), ttl, tags);
                }
                inflight.finish(&key);
                result
            }
            .boxed()
        });

        if !started {
            debug!(key, "joined in-flight fetch");
        }
        fetch.await
    }

    // == Pass-throughs ==
    /// Writes `value` under the strategy's L1 TTL and tags.
    ///
    /// Does nothing for `skip_cache` strategies.
    pub async fn set(&self, key: &str, value: T, strategy: &CacheStrategy) {
        if strategy.skip_cache {
            return;
        }
        self.set_with_ttl(key, value, strategy.ttl.l1, strategy.tags)
            .await;
    }

    /// Writes `value` with an explicit TTL and tags.
    pub async fn set_with_ttl(&self, key: &str, value: T, ttl_seconds: i64, tags: &[&str]) {
        self.store.write().await.set(key, value, ttl_seconds, tags);
    }

    /// Reads `key` from the cache without fetching. Counts as a hit or miss.
    pub async fn peek(&self, key: &str) -> Option<T> {
        self.store.write().await.get(key)
    }
}

impl<T> CacheManager<T> {
    pub async fn delete(&self, key: &str) -> bool {
        self.store.write().await.delete(key)
    }

    /// Drops every entry and resets the counters.
    pub async fn clear(&self) {
        self.store.write().await.clear();
    }

    pub async fn invalidate_by_tag(&self, tag: &str) -> usize {
        self.store.write().await.invalidate_by_tag(tag)
    }

    /// Invalidates each tag in turn and returns the total removed.
    pub async fn invalidate_by_tags(&self, tags: &[&str]) -> usize {
        let mut store = self.store.write().await;
        tags.iter().map(|tag| store.invalidate_by_tag(tag)).sum()
    }

    /// Removes expired entries now, ahead of the periodic sweep.
    pub async fn cleanup(&self) -> usize {
        self.store.write().await.cleanup()
    }

    pub async fn stats(&self) -> CacheStats {
        self.store.read().await.stats()
    }

    pub async fn keys(&self) -> Vec<String> {
        self.store.read().await.keys()
    }
}

/// Runs a fetcher, logging failures.
async fn run_fetcher<T, F, Fut>(key: &str, fetcher: F) -> Result<T, FetchError>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = anyhow::Result<T>>,
{
    fetcher().await.map_err(|err| {
        warn!(key, error = %err, "fetch failed, nothing cached");
        FetchError::new(err)
    })
}
