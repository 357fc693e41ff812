use std::time::{Duration, Instant};

use dashmap::DashMap;
use serde_json::Value;

/// Short-TTL cache for aggregation endpoints the web dashboard polls.
pub struct ResponseCache {
    ttl: Duration,
    entries: DashMap<String, CachedEntry>,
}

struct CachedEntry {
    expires_at: Instant,
    value: Value,
}

impl ResponseCache {
    pub fn new(ttl: Duration) -> Self {
        Self { ttl, entries: DashMap::new() }
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        let entry = self.entries.get(key)?;
        if entry.expires_at <= Instant::now() {
            drop(entry);
            self.entries.remove(key);
            return None;
        }
        Some(entry.value.clone())
    }

    pub fn put(&self, key: &str, value: Value) {
        self.entries.insert(
            key.to_string(),
            CachedEntry { expires_at: Instant::now() + self.ttl, value },
        );
    }

    /// Drop every cached entry, used after writes that invalidate the view.
    pub fn clear(&self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn expired_entries_are_not_served() {
        let cache = ResponseCache::new(Duration::from_millis(0));
        cache.put("k", json!({"a": 1}));
        assert!(cache.get("k").is_none());
    }

    #[test]
    fn fresh_entries_round_trip_and_clear() {
        let cache = ResponseCache::new(Duration::from_secs(60));
        cache.put("k", json!({"a": 1}));
        assert_eq!(cache.get("k").unwrap()["a"], 1);
        cache.clear();
        assert!(cache.get("k").is_none());
    }
}
