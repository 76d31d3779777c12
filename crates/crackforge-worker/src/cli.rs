use std::net::SocketAddr;

use clap::Parser;

use crate::config::{
    DEFAULT_CANCELLATION_CHECK_EVERY, DEFAULT_MINION_SUBRANGE_MIN_SIZE, DEFAULT_PARALLEL_THRESHOLD,
    DEFAULT_WORKER_THREADS, WorkerConfig,
};

fn default_listen() -> SocketAddr {
    "127.0.0.1:8080".parse().expect("default listen address must parse")
}

/// `crackforge-worker`: the stateless HTTP endpoint behind one entry of
/// `MINION_URLS`. Exposes `/crack-range`, `/cancel-job`, `/health`.
#[derive(Debug, Clone, Parser)]
#[command(name = "crackforge-worker", version, about = "crackforge distributed MD5 cracker worker")]
pub struct Cli {
    /// Address to bind the HTTP server to.
    #[arg(long, env = "CRACKFORGE_LISTEN", default_value_t = default_listen())]
    pub listen: SocketAddr,

    /// Thread count used for intra-request parallel search.
    #[arg(long, env = "WORKER_THREADS", default_value_t = DEFAULT_WORKER_THREADS)]
    pub worker_threads: usize,

    /// Indices between cancellation-set polls in sequential search.
    #[arg(long, env = "CANCELLATION_CHECK_EVERY", default_value_t = DEFAULT_CANCELLATION_CHECK_EVERY)]
    pub cancellation_check_every: u64,

    /// Floor on a parallel sub-range's size.
    #[arg(long, env = "MINION_SUBRANGE_MIN_SIZE", default_value_t = DEFAULT_MINION_SUBRANGE_MIN_SIZE)]
    pub subrange_min_size: u64,

    /// Minimum range size (in indices) that triggers parallel search mode.
    #[arg(long, env = "PARALLEL_THRESHOLD", default_value_t = DEFAULT_PARALLEL_THRESHOLD)]
    pub parallel_threshold: u64,
}

impl Cli {
    /// Project the CLI args onto the executor's [`WorkerConfig`].
    pub fn executor_config(&self) -> WorkerConfig {
        WorkerConfig {
            cancellation_check_every: self.cancellation_check_every,
            worker_threads: self.worker_threads,
            subrange_min_size: self.subrange_min_size,
            parallel_threshold: self.parallel_threshold,
        }
    }
}
