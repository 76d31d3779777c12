use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crate::breaker::CircuitBreaker;

struct Entry {
    url: String,
    breaker: CircuitBreaker,
}

/// Ordered worker fleet with one [`CircuitBreaker`] per URL and an
/// atomically-advancing round-robin cursor, shared across every job's
/// scheduler.
pub struct WorkerRegistry {
    entries: Vec<Entry>,
    cursor: AtomicUsize,
}

impl WorkerRegistry {
    /// Build a registry over `urls`, each starting with a fresh breaker.
    pub fn new(urls: Vec<String>, failure_threshold: u32, open_duration: Duration) -> Self {
        let entries = urls
            .into_iter()
            .map(|url| Entry {
                url,
                breaker: CircuitBreaker::new(failure_threshold, open_duration),
            })
            .collect();
        Self {
            entries,
            cursor: AtomicUsize::new(0),
        }
    }

    /// Advance the round-robin cursor and return the next URL whose breaker
    /// is available, scanning at most one full lap. The cursor advances even
    /// past a skipped (unavailable) URL, to spread future load. Returns
    /// `None` if no URL is currently available (or the registry is empty).
    pub fn pick_next(&self) -> Option<&str> {
        let len = self.entries.len();
        if len == 0 {
            return None;
        }
        for _ in 0..len {
            let idx = self.cursor.fetch_add(1, Ordering::SeqCst) % len;
            let entry = &self.entries[idx];
            if !entry.breaker.is_unavailable() {
                return Some(entry.url.as_str());
            }
        }
        None
    }

    /// Snapshot of every URL whose breaker currently reports available.
    pub fn available(&self) -> Vec<String> {
        self.entries
            .iter()
            .filter(|e| !e.breaker.is_unavailable())
            .map(|e| e.url.clone())
            .collect()
    }

    /// Snapshot of every registered URL regardless of breaker state.
    pub fn all(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.url.clone()).collect()
    }

    /// The breaker owned by `url`, if registered.
    pub fn breaker(&self, url: &str) -> Option<&CircuitBreaker> {
        self.entries.iter().find(|e| e.url == url).map(|e| &e.breaker)
    }

    /// Number of registered workers.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry holds no workers.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry(n: usize) -> WorkerRegistry {
        let urls = (0..n).map(|i| format!("http://worker-{i}")).collect();
        WorkerRegistry::new(urls, 3, Duration::from_secs(10))
    }

    #[test]
    fn round_robin_is_fair_over_k_laps() {
        let registry = registry(3);
        let mut counts = std::collections::HashMap::new();
        for _ in 0..12 {
            let url = registry.pick_next().unwrap().to_string();
            *counts.entry(url).or_insert(0) += 1;
        }
        assert_eq!(counts.len(), 3);
        for count in counts.values() {
            assert_eq!(*count, 4);
        }
    }

    #[test]
    fn unavailable_worker_is_skipped_but_cursor_still_advances() {
        let registry = registry(2);
        registry.breaker("http://worker-0").unwrap().record_failure();
        registry.breaker("http://worker-0").unwrap().record_failure();
        registry.breaker("http://worker-0").unwrap().record_failure();
        for _ in 0..5 {
            assert_eq!(registry.pick_next(), Some("http://worker-1"));
        }
    }

    #[test]
    fn empty_registry_returns_none() {
        let registry = WorkerRegistry::new(vec![], 3, Duration::from_secs(10));
        assert_eq!(registry.pick_next(), None);
        assert!(registry.available().is_empty());
    }

    #[test]
    fn all_returns_every_worker_even_when_unavailable() {
        let registry = registry(2);
        registry.breaker("http://worker-0").unwrap().record_failure();
        registry.breaker("http://worker-0").unwrap().record_failure();
        registry.breaker("http://worker-0").unwrap().record_failure();
        assert_eq!(registry.all().len(), 2);
        assert_eq!(registry.available().len(), 1);
    }
}
