//! TTL Cleanup Task
//!
//! Background task that periodically removes expired cache entries, so
//! memory is reclaimed even for keys nobody reads again.

use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::manager::SharedStore;

// == Cleanup Task ==
/// Handle to the running sweep. Stopping is explicit and idempotent.
#[derive(Debug)]
pub struct CleanupTask {
    handle: JoinHandle<()>,
    interval: Duration,
}

impl CleanupTask {
    /// Aborts the sweep loop.
    pub fn stop(&self) {
        if !self.handle.is_finished() {
            self.handle.abort();
            info!("TTL cleanup task stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        !self.handle.is_finished()
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }
}

/// Spawns a background task that calls `cleanup` on the store every
/// `interval`.
///
/// The first sweep happens one full interval after spawning. Must be called
/// from within a tokio runtime.
///
/// # Example
/// ```ignore
/// let store = Arc::new(RwLock::new(CacheStore::<String>::new(1000)));
/// let cleanup = spawn_cleanup_task(store.clone(), Duration::from_secs(300));
/// // Later, during shutdown:
/// cleanup.stop();
/// ```
pub fn spawn_cleanup_task<T>(store: SharedStore<T>, interval: Duration) -> CleanupTask
where
    T: Send + Sync + 'static,
{
    let handle = tokio::spawn(async move {
        info!(
            "Starting TTL cleanup task with interval of {} seconds",
            interval.as_secs()
        );

        loop {
            tokio::time::sleep(interval).await;

            let (removed, remaining) = {
                let mut store = store.write().await;
                (store.cleanup(), store.len())
            };

            if removed > 0 {
                info!(removed, remaining, "TTL cleanup: removed expired entries");
            } else {
                debug!(remaining, "TTL cleanup: no expired entries found");
            }
        }
    });

    CleanupTask { handle, interval }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CacheStore;
    use std::sync::Arc;
    use tokio::sync::RwLock;

    fn shared(max_size: usize) -> SharedStore<String> {
        Arc::new(RwLock::new(CacheStore::new(max_size)))
    }

    #[tokio::test(start_paused = true)]
    async fn test_cleanup_task_removes_expired_entries() {
        let store = shared(100);
        store.write().await.set("expire_soon", "value".to_string(), 1, &[]);

        let task = spawn_cleanup_task(store.clone(), Duration::from_secs(300));

        // Entry expires in wall-clock time; the sweep fires on the paused clock
        std::thread::sleep(Duration::from_millis(1100));
        tokio::time::sleep(Duration::from_secs(301)).await;

        {
            let store = store.read().await;
            assert!(!store.contains_key("expire_soon"), "Expired entry should have been cleaned up");
            assert_eq!(store.stats().expirations, 1);
        }

        task.stop();
    }

    #[tokio::test(start_paused = true)]
    async fn test_cleanup_task_preserves_valid_entries() {
        let store = shared(100);
        store.write().await.set("long_lived", "value".to_string(), 3600, &[]);

        let task = spawn_cleanup_task(store.clone(), Duration::from_secs(1));

        tokio::time::sleep(Duration::from_millis(1500)).await;

        {
            let mut store = store.write().await;
            assert_eq!(store.get("long_lived").as_deref(), Some("value"));
        }

        task.stop();
    }

    #[tokio::test]
    async fn test_cleanup_task_can_be_stopped() {
        let task = spawn_cleanup_task(shared(10), Duration::from_secs(1));
        assert!(task.is_running());
        assert_eq!(task.interval(), Duration::from_secs(1));

        task.stop();
        task.stop();

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(!task.is_running(), "Task should be finished after stop");
    }
}
