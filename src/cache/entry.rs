//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL and tags.

use chrono::{DateTime, Duration, Utc};

// == Cache Entry ==
/// Represents a single cache entry with value and metadata.
#[derive(Debug, Clone)]
pub struct CacheEntry<T> {
    /// The stored value
    pub value: T,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Expiration timestamp
    pub expires_at: DateTime<Utc>,
    /// Tags used for bulk invalidation
    pub tags: Vec<String>,
}

impl<T> CacheEntry<T> {
    // == Constructor ==
    /// Creates a new cache entry expiring `ttl_seconds` from now.
    ///
    /// A zero or negative TTL produces an entry that is already expired.
    pub fn new(value: T, ttl_seconds: i64, tags: &[&str]) -> Self {
        let now = Utc::now();

        Self {
            value,
            created_at: now,
            expires_at: expiry_from(now, ttl_seconds),
            tags: tags.iter().map(|t| t.to_string()).collect(),
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired.
    ///
    /// An entry is expired once the current time reaches `expires_at`.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// Checks expiry against a given instant.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    // == Has Tag ==
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    // == Time To Live ==
    /// Returns remaining TTL in milliseconds, 0 once expired.
    pub fn ttl_remaining_ms(&self) -> i64 {
        (self.expires_at - Utc::now()).num_milliseconds().max(0)
    }
}

/// Computes `now + ttl_seconds`, saturating at the representable bounds.
fn expiry_from(now: DateTime<Utc>, ttl_seconds: i64) -> DateTime<Utc> {
    Duration::try_seconds(ttl_seconds)
        .and_then(|ttl| now.checked_add_signed(ttl))
        .unwrap_or(if ttl_seconds >= 0 {
            DateTime::<Utc>::MAX_UTC
        } else {
            DateTime::<Utc>::MIN_UTC
        })
}
