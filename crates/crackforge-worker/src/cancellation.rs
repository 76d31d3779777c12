use std::collections::HashSet;
use std::sync::Mutex;

/// Process-wide set of cancelled job IDs, shared across every concurrently
/// in-flight `/crack-range` handler. Insertion is idempotent; membership is
/// checked every `CANCELLATION_CHECK_EVERY` indices by the executor. Not
/// persisted; a worker restart forgets every cancellation.
#[derive(Default)]
pub struct CancellationRegistry {
    cancelled: Mutex<HashSet<String>>,
}

impl CancellationRegistry {
    /// A registry with no cancellations recorded.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `job_id` as cancelled. Idempotent.
    pub fn cancel(&self, job_id: &str) {
        self.cancelled
            .lock()
            .expect("cancellation registry lock poisoned")
            .insert(job_id.to_string());
    }

    /// Whether `job_id` has been cancelled.
    pub fn is_cancelled(&self, job_id: &str) -> bool {
        self.cancelled
            .lock()
            .expect("cancellation registry lock poisoned")
            .contains(job_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cancel_is_idempotent_and_observable() {
        let registry = CancellationRegistry::new();
        assert!(!registry.is_cancelled("job-1"));
        registry.cancel("job-1");
        registry.cancel("job-1");
        assert!(registry.is_cancelled("job-1"));
        assert!(!registry.is_cancelled("job-2"));
    }
}
