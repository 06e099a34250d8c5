//! Domain Invalidation Helpers
//!
//! Translate "record X changed" into the key deletions and tag sweeps that
//! make later reads see fresh data. Single-record values are found by key,
//! list and query results only by tag, so each helper does both.

use tracing::debug;

use super::CacheManager;
use crate::keys::{self, tags};

impl<T> CacheManager<T> {
    /// An event was created, updated or deleted.
    pub async fn invalidate_event_cache(&self, event_id: Option<&str>) -> usize {
        let keys = event_id
            .map(|id| vec![keys::event(id), keys::event_stats(id)])
            .unwrap_or_default();
        self.invalidate_domain("event", &keys, &[tags::EVENTS, tags::STATS])
            .await
    }

    pub async fn invalidate_workshop_cache(&self, workshop_id: Option<&str>) -> usize {
        let keys: Vec<String> = workshop_id.map(keys::workshop).into_iter().collect();
        self.invalidate_domain("workshop", &keys, &[tags::WORKSHOPS])
            .await
    }

    /// A registration for `event_id` changed; its counters are stale too.
    pub async fn invalidate_registration_cache(&self, event_id: &str) -> usize {
        let keys = [
            keys::event_registrations(event_id),
            keys::event_stats(event_id),
        ];
        self.invalidate_domain("registration", &keys, &[tags::REGISTRATIONS, tags::STATS])
            .await
    }

    pub async fn invalidate_mission_cache(&self, mission_id: Option<&str>) -> usize {
        let keys: Vec<String> = mission_id.map(keys::mission).into_iter().collect();
        self.invalidate_domain("mission", &keys, &[tags::MISSIONS])
            .await
    }

    pub async fn invalidate_dashboard_cache(&self) -> usize {
        self.invalidate_domain("dashboard", &[], &[tags::DASHBOARD])
            .await
    }

    /// Deletes `keys` then sweeps `tags` under one lock. Returns the total
    /// number of entries removed.
    async fn invalidate_domain(&self, domain: &str, keys: &[String], tags: &[&str]) -> usize {
        let mut store = self.store.write().await;

        let deleted = keys.iter().filter(|key| store.delete(key)).count();
        let swept: usize = tags.iter().map(|tag| store.invalidate_by_tag(tag)).sum();

        debug!(domain, deleted, swept, "invalidated domain cache");
        deleted + swept
    }
}
