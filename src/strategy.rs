//! Strategy Catalog
//!
//! Named TTL and tag configurations, one per data domain. The catalog is
//! plain data: the manager reads it, nothing here has behaviour.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::CacheError;
use crate::keys::tags;

// == TTL Config ==
/// Time-to-live per cache tier, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TtlConfig {
    /// In-process tier
    pub l1: i64,
    /// Shared tier; reserved, no L2 tier exists
    pub l2: Option<i64>,
}

// == Cache Strategy ==
/// How a domain's values are cached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CacheStrategy {
    pub ttl: TtlConfig,
    /// Declared per domain but never consulted by the manager
    pub stale_while_revalidate: bool,
    /// Tags attached to every entry written under this strategy
    pub tags: &'static [&'static str],
    /// Always read through to the source and never write
    pub skip_cache: bool,
}

impl CacheStrategy {
    /// L1 TTL in seconds.
    pub const fn l1_ttl_seconds(&self) -> i64 {
        self.ttl.l1
    }
}

// == Catalog ==
/// Single event records and event lists.
pub const EVENTS: CacheStrategy = CacheStrategy {
    ttl: TtlConfig {
        l1: 300,
        l2: Some(900),
    },
    stale_while_revalidate: true,
    tags: &[tags::EVENTS],
    skip_cache: false,
};

/// Live event counters (check-ins, lunch collection).
pub const EVENT_STATS: CacheStrategy = CacheStrategy {
    ttl: TtlConfig {
        l1: 30,
        l2: Some(60),
    },
    stale_while_revalidate: true,
    tags: &[tags::EVENTS, tags::STATS],
    skip_cache: false,
};

pub const REGISTRATIONS: CacheStrategy = CacheStrategy {
    ttl: TtlConfig {
        l1: 60,
        l2: Some(180),
    },
    stale_while_revalidate: false,
    tags: &[tags::REGISTRATIONS],
    skip_cache: false,
};

/// Workshop metadata rarely changes.
pub const WORKSHOPS: CacheStrategy = CacheStrategy {
    ttl: TtlConfig {
        l1: 600,
        l2: Some(1800),
    },
    stale_while_revalidate: true,
    tags: &[tags::WORKSHOPS],
    skip_cache: false,
};

pub const DASHBOARD_STATS: CacheStrategy = CacheStrategy {
    ttl: TtlConfig {
        l1: 30,
        l2: Some(60),
    },
    stale_while_revalidate: true,
    tags: &[tags::STATS, tags::DASHBOARD],
    skip_cache: false,
};

pub const MISSIONS: CacheStrategy = CacheStrategy {
    ttl: TtlConfig {
        l1: 300,
        l2: Some(900),
    },
    stale_while_revalidate: false,
    tags: &[tags::MISSIONS],
    skip_cache: false,
};

/// Reads that must always hit the source, e.g. one-time check-in codes.
pub const NO_CACHE: CacheStrategy = CacheStrategy {
    ttl: TtlConfig { l1: 0, l2: None },
    stale_while_revalidate: false,
    tags: &[],
    skip_cache: true,
};

// == Strategy Name ==
/// Names of the catalog entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyName {
    Events,
    EventStats,
    Registrations,
    Workshops,
    DashboardStats,
    Missions,
    NoCache,
}

impl StrategyName {
    /// Every catalog entry, in declaration order.
    pub const ALL: [StrategyName; 7] = [
        StrategyName::Events,
        StrategyName::EventStats,
        StrategyName::Registrations,
        StrategyName::Workshops,
        StrategyName::DashboardStats,
        StrategyName::Missions,
        StrategyName::NoCache,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            StrategyName::Events => "events",
            StrategyName::EventStats => "event_stats",
            StrategyName::Registrations => "registrations",
            StrategyName::Workshops => "workshops",
            StrategyName::DashboardStats => "dashboard_stats",
            StrategyName::Missions => "missions",
            StrategyName::NoCache => "no_cache",
        }
    }

    /// The strategy this name refers to.
    pub const fn strategy(&self) -> &'static CacheStrategy {
        match self {
            StrategyName::Events => &EVENTS,
            StrategyName::EventStats => &EVENT_STATS,
            StrategyName::Registrations => &REGISTRATIONS,
            StrategyName::Workshops => &WORKSHOPS,
            StrategyName::DashboardStats => &DASHBOARD_STATS,
            StrategyName::Missions => &MISSIONS,
            StrategyName::NoCache => &NO_CACHE,
        }
    }
}

impl fmt::Display for StrategyName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StrategyName {
    type Err = CacheError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StrategyName::ALL
            .into_iter()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| CacheError::UnknownStrategy(s.to_string()))
    }
}
