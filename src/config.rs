//! Configuration Module
//!
//! Handles loading cache configuration from environment variables.

use std::env;
use std::time::Duration;

use tracing::warn;

use crate::cache::DEFAULT_MAX_SIZE;
use crate::error::{CacheError, Result};

/// Default interval between expired-entry sweeps (5 minutes)
pub const DEFAULT_CLEANUP_INTERVAL_SECS: u64 = 300;

/// Cache configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// Maximum number of entries the cache can hold
    pub max_size: usize,
    /// Background cleanup task interval in seconds
    pub cleanup_interval: u64,
    /// Requests the shared L2 tier, which does not exist; only logged
    pub l2_enabled: bool,
}

impl CacheConfig {
    /// Creates a new CacheConfig by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_MAX_SIZE` - Maximum cache entries (default: 1000)
    /// - `CACHE_CLEANUP_INTERVAL` - Cleanup frequency in seconds (default: 300)
    /// - `CACHE_L2_ENABLED` - `true`/`1` to request the L2 tier (default: false)
    ///
    /// Unparsable values fall back to their defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let config = Self {
            max_size: env::var("CACHE_MAX_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_size),
            cleanup_interval: env::var("CACHE_CLEANUP_INTERVAL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.cleanup_interval),
            l2_enabled: env::var("CACHE_L2_ENABLED")
                .ok()
                .and_then(|v| parse_flag(&v))
                .unwrap_or(defaults.l2_enabled),
        };

        if config.l2_enabled {
            warn!("CACHE_L2_ENABLED is set but no L2 tier is available; using L1 only");
        }
        config
    }

    /// Rejects values the cache cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.max_size == 0 {
            return Err(CacheError::InvalidConfig(
                "max_size must be greater than 0".to_string(),
            ));
        }
        if self.cleanup_interval == 0 {
            return Err(CacheError::InvalidConfig(
                "cleanup_interval must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    pub fn cleanup_interval(&self) -> Duration {
        Duration::from_secs(self.cleanup_interval)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_size: DEFAULT_MAX_SIZE,
            cleanup_interval: DEFAULT_CLEANUP_INTERVAL_SECS,
            l2_enabled: false,
        }
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = CacheConfig::default();
        assert_eq!(config.max_size, 1000);
        assert_eq!(config.cleanup_interval, 300);
        assert!(!config.l2_enabled);
        assert_eq!(config.cleanup_interval(), Duration::from_secs(300));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_from_env() {
        // Single test touches the environment to avoid races between tests
        env::remove_var("CACHE_MAX_SIZE");
        env::remove_var("CACHE_CLEANUP_INTERVAL");
        env::remove_var("CACHE_L2_ENABLED");
        assert_eq!(CacheConfig::from_env(), CacheConfig::default());

        env::set_var("CACHE_MAX_SIZE", "50");
        env::set_var("CACHE_CLEANUP_INTERVAL", "not-a-number");
        env::set_var("CACHE_L2_ENABLED", "TRUE");
        let config = CacheConfig::from_env();
        assert_eq!(config.max_size, 50);
        assert_eq!(config.cleanup_interval, 300);
        assert!(config.l2_enabled);

        env::remove_var("CACHE_MAX_SIZE");
        env::remove_var("CACHE_CLEANUP_INTERVAL");
        env::remove_var("CACHE_L2_ENABLED");
    }

    #[test]
    fn test_validate_rejects_zero() {
        let config = CacheConfig {
            max_size: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(CacheError::InvalidConfig(_))));

        let config = CacheConfig {
            cleanup_interval: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(CacheError::InvalidConfig(_))));
    }

    #[test]
    fn test_parse_flag() {
        assert_eq!(parse_flag(" on "), Some(true));
        assert_eq!(parse_flag("0"), Some(false));
        assert_eq!(parse_flag("maybe"), None);
    }
}
