//! In-flight Fetch Registry
//!
//! Coalesces concurrent misses for the same key onto one shared future so
//! the fetcher runs once per key at a time.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

use futures::future::{BoxFuture, FutureExt, Shared};

use crate::error::FetchError;

/// A fetch that any number of callers can await.
pub type SharedFetch<T> = Shared<BoxFuture<'static, Result<T, FetchError>>>;

// == Inflight Fetches ==
/// Key -> pending fetch. Clones share the same registry.
pub struct InflightFetches<T> {
    pending: Arc<Mutex<HashMap<String, SharedFetch<T>>>>,
}

impl<T> Clone for InflightFetches<T> {
    fn clone(&self) -> Self {
        Self {
            pending: Arc::clone(&self.pending),
        }
    }
}

impl<T> Default for InflightFetches<T> {
    fn default() -> Self {
        Self {
            pending: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

impl<T> fmt::Debug for InflightFetches<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InflightFetches")
            .field("pending", &self.len())
            .finish()
    }
}

impl<T> InflightFetches<T>
where
    T: Clone + Send + Sync + 'static,
{
    // == Join Or Start ==
    /// Returns the pending fetch for `key`, or registers the one built by
    /// `start`. The flag is true when this call registered it.
    ///
    /// `start` runs under the registry lock and must not block.
    pub fn join_or_start<F>(&self, key: &str, start: F) -> (SharedFetch<T>, bool)
    where
        F: FnOnce() -> BoxFuture<'static, Result<T, FetchError>>,
    {
        let mut pending = self.lock();
        if let Some(fetch) = pending.get(key) {
            return (fetch.clone(), false);
        }

        let fetch = start().shared();
        pending.insert(key.to_string(), fetch.clone());
        (fetch, true)
    }
}

impl<T> InflightFetches<T> {
    // == Finish ==
    /// Releases the slot for `key` once its fetch has settled.
    pub fn finish(&self, key: &str) {
        self.lock().remove(key);
    }

    /// Number of keys with a fetch in flight.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, key: &str) -> bool {
        self.lock().contains_key(key)
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, SharedFetch<T>>> {
        // The map is left consistent by every critical section, so a
        // poisoned lock is still usable.
        self.pending
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
