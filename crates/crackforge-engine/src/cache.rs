use std::collections::HashMap;
use std::sync::RwLock;

/// Process-local `hash -> plaintext` cache shared by every job's scheduler.
/// Keys are case-folded; populated only on FOUND, never on NOT_FOUND;
/// cleared once at driver start.
#[derive(Debug, Default)]
pub struct CrackedCache {
    entries: RwLock<HashMap<String, String>>,
}

impl CrackedCache {
    /// An empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a previously-cracked plaintext by its (already case-folded) hash.
    pub fn get(&self, hash: &str) -> Option<String> {
        let key = hash.to_ascii_lowercase();
        self.entries.read().expect("cache lock poisoned").get(&key).cloned()
    }

    /// Record a cracked plaintext for `hash`.
    pub fn put(&self, hash: &str, plaintext: String) {
        let key = hash.to_ascii_lowercase();
        self.entries
            .write()
            .expect("cache lock poisoned")
            .insert(key, plaintext);
    }

    /// Drop every entry.
    pub fn clear(&self) {
        self.entries.write().expect("cache lock poisoned").clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn put_then_get_round_trips_case_folded() {
        let cache = CrackedCache::new();
        cache.put("AABB", "password".to_string());
        assert_eq!(cache.get("aabb").as_deref(), Some("password"));
    }

    #[test]
    fn miss_returns_none() {
        let cache = CrackedCache::new();
        assert_eq!(cache.get("deadbeef"), None);
    }

    #[test]
    fn clear_drops_entries() {
        let cache = CrackedCache::new();
        cache.put("aabb", "p".to_string());
        cache.clear();
        assert_eq!(cache.get("aabb"), None);
    }
}
