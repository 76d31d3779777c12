use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crackforge_engine::EngineConfig;

fn parse_seconds(raw: &str) -> Result<Duration, String> {
    let secs: f64 = raw
        .parse()
        .map_err(|_| format!("invalid duration in seconds: {raw:?}"))?;
    if secs < 0.0 {
        return Err(format!("duration must be non-negative: {raw:?}"));
    }
    Ok(Duration::from_secs_f64(secs))
}

fn parse_worker_url(raw: &str) -> Result<String, String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err("worker URL must not be empty".to_string());
    }
    Ok(trimmed.to_string())
}

/// The `<program> <input_file>` driver. Every tunable is read once through
/// `clap`'s `env` fallback rather than scattering `std::env::var` calls
/// through the engine.
#[derive(Debug, Clone, Parser)]
#[command(name = "crackforge", version, about = "Distributed MD5 keyspace cracker driver")]
pub struct Cli {
    /// Path to the input file: one 32-hex MD5 digest per line.
    pub input_file: PathBuf,

    /// Comma-separated worker base URLs (e.g. "http://10.0.0.1:8080,http://10.0.0.2:8080").
    #[arg(long, env = "MINION_URLS", value_parser = parse_worker_url, value_delimiter = ',')]
    pub minion_urls: Vec<String>,

    /// Password scheme every job is enumerated under.
    #[arg(long, env = "PASSWORD_SCHEME", default_value = "israeli-mobile")]
    pub password_scheme: String,

    /// Size of every non-final chunk a job's keyspace is split into.
    #[arg(long, env = "CHUNK_SIZE", default_value_t = crackforge_engine::DEFAULT_CHUNK_SIZE)]
    pub chunk_size: u64,

    /// Retries allowed per chunk before it is marked FAILED.
    #[arg(long, env = "MAX_ATTEMPTS", default_value_t = crackforge_engine::DEFAULT_MAX_ATTEMPTS)]
    pub max_attempts: u32,

    /// Per-call HTTP timeout (seconds) for `/crack-range`.
    #[arg(long, env = "MINION_REQUEST_TIMEOUT", value_parser = parse_seconds, default_value = "5.0")]
    pub minion_request_timeout: Duration,

    /// Sleep (seconds) when no worker is currently available.
    #[arg(long, env = "NO_MINION_WAIT_TIME", value_parser = parse_seconds, default_value = "0.5")]
    pub no_minion_wait_time: Duration,

    /// Output JSON file path.
    #[arg(long, env = "OUTPUT_FILE", default_value = "data/output.txt")]
    pub output_file: PathBuf,

    /// Consecutive transport/protocol failures before a worker's breaker opens.
    #[arg(long, env = "MINION_FAILURE_THRESHOLD", default_value_t = crackforge_engine::DEFAULT_MINION_FAILURE_THRESHOLD)]
    pub minion_failure_threshold: u32,

    /// How long (seconds) an opened breaker stays open.
    #[arg(long, env = "MINION_BREAKER_OPEN_SECONDS", value_parser = parse_seconds, default_value = "10.0")]
    pub minion_breaker_open_seconds: Duration,

    /// Upper bound on concurrently-processed jobs. Defaults to
    /// `min(3, #workers)` when unset.
    #[arg(long, env = "MAX_CONCURRENT_JOBS")]
    pub max_concurrent_jobs: Option<usize>,
}

impl Cli {
    /// Project the CLI args onto the engine's [`EngineConfig`], filling in
    /// the `min(3, #workers)` default for `max_concurrent_jobs` when unset.
    pub fn engine_config(&self) -> EngineConfig {
        let mut config = EngineConfig::with_defaults(self.minion_urls.len());
        config.chunk_size = self.chunk_size;
        config.max_attempts = self.max_attempts;
        config.minion_request_timeout = self.minion_request_timeout;
        config.no_minion_wait_time = self.no_minion_wait_time;
        config.minion_failure_threshold = self.minion_failure_threshold;
        config.minion_breaker_open = self.minion_breaker_open_seconds;
        if let Some(n) = self.max_concurrent_jobs {
            config.max_concurrent_jobs = n.max(1);
        }
        config
    }
}
