//! Tag Index Module
//!
//! Reverse index from tag to the keys currently carrying it, so tag
//! invalidation touches only matching entries instead of scanning the cache.

use std::collections::{HashMap, HashSet};

// == Tag Index ==
/// Tracks tag -> keys for live cache entries.
#[derive(Debug, Default)]
pub struct TagIndex {
    keys_by_tag: HashMap<String, HashSet<String>>,
}

impl TagIndex {
    pub fn new() -> Self {
        Self::default()
    }

    // == Register ==
    /// Records that `key` carries each of `tags`.
    pub fn register<'a, I>(&mut self, key: &str, tags: I)
    where
        I: IntoIterator<Item = &'a String>,
    {
        for tag in tags {
            self.keys_by_tag
                .entry(tag.clone())
                .or_default()
                .insert(key.to_string());
        }
    }

    // == Unregister ==
    /// Removes `key` from each of `tags`, dropping tags left empty.
    pub fn unregister<'a, I>(&mut self, key: &str, tags: I)
    where
        I: IntoIterator<Item = &'a String>,
    {
        for tag in tags {
            if let Some(keys) = self.keys_by_tag.get_mut(tag.as_str()) {
                keys.remove(key);
                if keys.is_empty() {
                    self.keys_by_tag.remove(tag.as_str());
                }
            }
        }
    }

    // == Keys For Tag ==
    /// Returns a snapshot of the keys carrying `tag`.
    pub fn keys_for(&self, tag: &str) -> Vec<String> {
        self.keys_by_tag
            .get(tag)
            .map(|keys| keys.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Number of distinct tags with at least one key.
    pub fn tag_count(&self) -> usize {
        self.keys_by_tag.len()
    }

    pub fn clear(&mut self) {
        self.keys_by_tag.clear();
    }
}
