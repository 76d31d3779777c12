use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::RwLock;
use std::time::{Duration, Instant};

/// Per-worker health gate. Counts consecutive transport/protocol failures
/// and, once `failure_threshold` is reached, reports unavailable until
/// `open_duration` has elapsed since the failure that tripped it.
///
/// Reset is lazy: nothing resets the breaker on a timer. The first query
/// strictly after the open-until deadline clears both fields and reports
/// available again, matching the "no timer needed, no rollback on races"
/// design note.
#[derive(Debug)]
pub struct CircuitBreaker {
    consecutive_failures: AtomicU32,
    open_until: RwLock<Option<Instant>>,
    failure_threshold: u32,
    open_duration: Duration,
}

impl CircuitBreaker {
    /// A breaker that opens after `failure_threshold` consecutive failures
    /// and stays open for `open_duration`.
    pub fn new(failure_threshold: u32, open_duration: Duration) -> Self {
        Self {
            consecutive_failures: AtomicU32::new(0),
            open_until: RwLock::new(None),
            failure_threshold,
            open_duration,
        }
    }

    /// Zero the failure counter and clear any open-until deadline.
    pub fn record_success(&self) {
        self.consecutive_failures.store(0, Ordering::SeqCst);
        *self.open_until.write().expect("breaker lock poisoned") = None;
    }

    /// Increment the failure counter; once it reaches the threshold, open
    /// the breaker for `open_duration` from now.
    pub fn record_failure(&self) {
        let failures = self.consecutive_failures.fetch_add(1, Ordering::SeqCst) + 1;
        if failures >= self.failure_threshold {
            *self.open_until.write().expect("breaker lock poisoned") =
                Some(Instant::now() + self.open_duration);
        }
    }

    /// Whether the breaker currently suppresses dispatch. Alias: `is_open`.
    pub fn is_unavailable(&self) -> bool {
        let deadline = *self.open_until.read().expect("breaker lock poisoned");
        match deadline {
            None => false,
            Some(until) if Instant::now() >= until => {
                *self.open_until.write().expect("breaker lock poisoned") = None;
                self.consecutive_failures.store(0, Ordering::SeqCst);
                false
            }
            Some(_) => true,
        }
    }

    /// Alias for [`CircuitBreaker::is_unavailable`].
    pub fn is_open(&self) -> bool {
        self.is_unavailable()
    }
}
