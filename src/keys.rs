//! Cache key definitions.
//!
//! Deterministic key construction plus the well-known keys and tags used by
//! the domain invalidation helpers.

use std::fmt::Display;

use serde::Serialize;

/// Separator between key segments.
pub const KEY_SEPARATOR: char = ':';

/// Tag names shared by the strategy catalog and the invalidation helpers.
pub mod tags {
    pub const EVENTS: &str = "events";
    pub const STATS: &str = "stats";
    pub const REGISTRATIONS: &str = "registrations";
    pub const WORKSHOPS: &str = "workshops";
    pub const DASHBOARD: &str = "dashboard";
    pub const MISSIONS: &str = "missions";
}

// ============================================================================
// Key Builders
// ============================================================================

/// Joins a prefix and ordered parts with `:`.
///
/// The same prefix and parts always yield the same key.
pub fn build_key<I>(prefix: &str, parts: I) -> String
where
    I: IntoIterator,
    I::Item: Display,
{
    let mut key = prefix.to_string();
    for part in parts {
        key.push(KEY_SEPARATOR);
        key.push_str(&part.to_string());
    }
    key
}

/// Builds a key for a query-shaped value (filters, pagination).
///
/// The query is rendered as compact JSON, so struct fields keep their
/// declaration order and map keys must come from an ordered map to stay
/// deterministic.
pub fn query_key<Q: Serialize>(prefix: &str, query: &Q) -> serde_json::Result<String> {
    let rendered = serde_json::to_string(query)?;
    Ok(build_key(prefix, [rendered]))
}

// ============================================================================
// Well-known Keys
// ============================================================================

pub fn event(id: impl Display) -> String {
    build_key("event", [id])
}

/// Live counters for one event.
pub fn event_stats(id: impl Display) -> String {
    build_key("event", ["stats".to_string(), id.to_string()])
}

pub fn event_registrations(event_id: impl Display) -> String {
    build_key("event", ["registrations".to_string(), event_id.to_string()])
}

pub fn workshop(id: impl Display) -> String {
    build_key("workshop", [id])
}

pub fn mission(id: impl Display) -> String {
    build_key("mission", [id])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct EventFilter<'a> {
        status: &'a str,
        page: u32,
    }

    #[test]
    fn test_build_key_joins_parts() {
        assert_eq!(build_key("events", ["list", "upcoming"]), "events:list:upcoming");
        assert_eq!(build_key("event", [42]), "event:42");
        assert_eq!(build_key::<[&str; 0]>("all", []), "all");
    }

    #[test]
    fn test_build_key_is_deterministic() {
        let first = build_key("event", ["a", "b"]);
        let second = build_key("event", vec!["a".to_string(), "b".to_string()]);
        assert_eq!(first, second);
        assert_ne!(first, build_key("event", ["b", "a"]));
    }

    #[test]
    fn test_query_key() {
        let filter = EventFilter {
            status: "open",
            page: 2,
        };
        assert_eq!(
            query_key("events:list", &filter).unwrap(),
            r#"events:list:{"status":"open","page":2}"#
        );
    }

    #[test]
    fn test_well_known_keys() {
        assert_eq!(event("e1"), "event:e1");
        assert_eq!(event_stats("e1"), "event:stats:e1");
        assert_eq!(event_registrations("e1"), "event:registrations:e1");
        assert_eq!(workshop(7), "workshop:7");
        assert_eq!(mission("m"), "mission:m");
    }
}
