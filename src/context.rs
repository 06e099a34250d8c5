//! Cache Context
//!
//! The one cache per process: built once at startup and handed to call
//! sites instead of living in a global. Owns the cleanup task so its
//! lifetime is explicit.

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::info;

use crate::cache::CacheStore;
use crate::config::CacheConfig;
use crate::error::Result;
use crate::manager::CacheManager;
use crate::tasks::{spawn_cleanup_task, CleanupTask};

// == Cache Context ==
/// Shared store, its manager and the periodic cleanup task.
#[derive(Debug)]
pub struct CacheContext<T> {
    manager: CacheManager<T>,
    cleanup: CleanupTask,
    config: CacheConfig,
}

impl<T> CacheContext<T>
where
    T: Send + Sync + 'static,
{
    /// Builds the cache and arms the cleanup task.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(config: CacheConfig) -> Result<Self> {
        config.validate()?;

        let store = Arc::new(RwLock::new(CacheStore::new(config.max_size)));
        let cleanup = spawn_cleanup_task(Arc::clone(&store), config.cleanup_interval());
        let manager = CacheManager::from_shared(store);

        info!(
            max_size = config.max_size,
            cleanup_interval = config.cleanup_interval,
            "cache context started"
        );

        Ok(Self {
            manager,
            cleanup,
            config,
        })
    }
}

impl<T> CacheContext<T> {
    /// Handle for call sites; clones share the same cache.
    pub fn manager(&self) -> &CacheManager<T> {
        &self.manager
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Stops the cleanup task. The cache stays usable; expired entries are
    /// then only dropped on read.
    pub fn stop(&self) {
        self.cleanup.stop();
    }

    pub fn is_running(&self) -> bool {
        self.cleanup.is_running()
    }
}

impl<T> Drop for CacheContext<T> {
    fn drop(&mut self) {
        self.cleanup.stop();
    }
}
