/// Default stride (in indices) between cancellation polls during sequential
/// search.
pub const DEFAULT_CANCELLATION_CHECK_EVERY: u64 = 5_000;
/// Default worker thread count for intra-request parallel search.
pub const DEFAULT_WORKER_THREADS: usize = 2;
/// Default floor on a parallel sub-range's size.
pub const DEFAULT_MINION_SUBRANGE_MIN_SIZE: u64 = 1_000;
/// Default minimum range size that triggers parallel mode.
pub const DEFAULT_PARALLEL_THRESHOLD: u64 = 10_000;

/// Tunables read once at worker startup (the clap/env pattern shared with
/// the driver binary), never re-read per request.
#[derive(Debug, Clone, Copy)]
pub struct WorkerConfig {
    /// Indices between cancellation-set polls in sequential mode.
    pub cancellation_check_every: u64,
    /// Thread count used for intra-request parallel search.
    pub worker_threads: usize,
    /// Floor on a parallel sub-range's size.
    pub subrange_min_size: u64,
    /// Minimum range size that triggers parallel mode.
    pub parallel_threshold: u64,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            cancellation_check_every: DEFAULT_CANCELLATION_CHECK_EVERY,
            worker_threads: DEFAULT_WORKER_THREADS,
            subrange_min_size: DEFAULT_MINION_SUBRANGE_MIN_SIZE,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        }
    }
}
