use std::time::Duration;

/// Default chunk size a job's keyspace is partitioned into.
pub const DEFAULT_CHUNK_SIZE: u64 = 100_000;
/// Default retry budget before a chunk (and its job) is marked FAILED.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
/// Default per-call HTTP timeout for `/crack-range`.
pub const DEFAULT_MINION_REQUEST_TIMEOUT: Duration = Duration::from_secs(5);
/// Default per-call HTTP timeout for `/cancel-job`.
pub const DEFAULT_MINION_CANCEL_TIMEOUT: Duration = Duration::from_secs(2);
/// Default sleep when no worker is available.
pub const DEFAULT_NO_MINION_WAIT_TIME: Duration = Duration::from_millis(500);
/// Default yield when chunks are in flight but none has completed.
pub const DEFAULT_DRAIN_YIELD: Duration = Duration::from_millis(100);
/// Default consecutive-failure threshold before a worker's breaker opens.
pub const DEFAULT_MINION_FAILURE_THRESHOLD: u32 = 3;
/// Default breaker open duration once tripped.
pub const DEFAULT_MINION_BREAKER_OPEN: Duration = Duration::from_secs(10);

/// Tunables for a [`crate::Scheduler`] and the [`crate::JobManager`] it
/// shares, mirroring the driver binary's environment variables.
/// Constructed once by the driver binary from parsed CLI/env input and
/// shared (by reference) across every concurrently-processed job.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Size of every non-final chunk a job's keyspace is split into.
    pub chunk_size: u64,
    /// Retries allowed per chunk before it is marked FAILED.
    pub max_attempts: u32,
    /// Per-call timeout for `/crack-range`.
    pub minion_request_timeout: Duration,
    /// Per-call timeout for `/cancel-job`.
    pub minion_cancel_timeout: Duration,
    /// Sleep interval when no worker is currently available.
    pub no_minion_wait_time: Duration,
    /// Consecutive transport/protocol failures before a breaker opens.
    pub minion_failure_threshold: u32,
    /// How long an opened breaker stays open before the next lazy reset.
    pub minion_breaker_open: Duration,
    /// Upper bound on concurrently-processed jobs (driver-level semaphore).
    pub max_concurrent_jobs: usize,
}

impl EngineConfig {
    /// Default tunables, parameterized only by worker fleet size
    /// (`MAX_CONCURRENT_JOBS` defaults to `min(3, workers)`).
    pub fn with_defaults(worker_count: usize) -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            minion_request_timeout: DEFAULT_MINION_REQUEST_TIMEOUT,
            minion_cancel_timeout: DEFAULT_MINION_CANCEL_TIMEOUT,
            no_minion_wait_time: DEFAULT_NO_MINION_WAIT_TIME,
            minion_failure_threshold: DEFAULT_MINION_FAILURE_THRESHOLD,
            minion_breaker_open: DEFAULT_MINION_BREAKER_OPEN,
            max_concurrent_jobs: worker_count.max(1).min(3),
        }
    }
}
