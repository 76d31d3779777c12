use std::time::Duration;

use crackforge_core::protocol::{CancelRequest, CrackRequest, CrackResponse, Range, Verdict};
use uuid::Uuid;

use crate::registry::WorkerRegistry;

/// Outcome of a single `crack()` call, folded from the wire-level
/// [`CrackResponse`] (or a transport failure) into the shape the scheduler
/// matches on.
#[derive(Debug, Clone)]
pub enum CrackOutcome {
    /// The plaintext was recovered.
    Found {
        /// Recovered plaintext.
        plaintext: String,
        /// Matching index.
        last_index_processed: u64,
    },
    /// The dispatched range was exhausted without a match.
    NotFound {
        /// Final scanned index (the chunk's `hi`).
        last_index_processed: u64,
    },
    /// The request was abandoned because the job was already cancelled.
    Cancelled {
        /// Last observed index before the worker noticed cancellation.
        last_index_processed: u64,
    },
    /// A transport failure, non-2xx, malformed body, or worker-side runtime
    /// error occurred.
    Error {
        /// Human-readable detail.
        message: String,
        /// Resumption hint (the chunk's `lo` on transport failure, or the
        /// worker's own hint on a worker-side error).
        last_index_processed: u64,
    },
    /// The request itself was malformed and the job should terminate.
    InvalidInput {
        /// Human-readable detail.
        message: String,
    },
}

impl From<CrackResponse> for CrackOutcome {
    fn from(resp: CrackResponse) -> Self {
        match resp.status {
            Verdict::Found => CrackOutcome::Found {
                plaintext: resp.found_password.unwrap_or_default(),
                last_index_processed: resp.last_index_processed,
            },
            Verdict::NotFound => CrackOutcome::NotFound {
                last_index_processed: resp.last_index_processed,
            },
            Verdict::Cancelled => CrackOutcome::Cancelled {
                last_index_processed: resp.last_index_processed,
            },
            Verdict::Error => CrackOutcome::Error {
                message: resp.error_message.unwrap_or_default(),
                last_index_processed: resp.last_index_processed,
            },
            Verdict::InvalidInput => CrackOutcome::InvalidInput {
                message: resp.error_message.unwrap_or_default(),
            },
        }
    }
}

/// HTTP transport to the worker fleet. One instance is shared by every
/// scheduler; holds the connection pool and the configured timeouts.
pub struct WorkerClient {
    http: reqwest::Client,
    crack_timeout: Duration,
    cancel_timeout: Duration,
}

impl WorkerClient {
    /// Build a client with the given per-call timeouts. The timeouts are
    /// applied per-request (not on the underlying `reqwest::Client`) so
    /// `crack` and `cancel` can use different budgets over one pool.
    pub fn new(crack_timeout: Duration, cancel_timeout: Duration) -> Self {
        Self {
            http: reqwest::Client::new(),
            crack_timeout,
            cancel_timeout,
        }
    }

    /// Dispatch one `/crack-range` call. Always returns a value: transport
    /// and protocol failures are folded into [`CrackOutcome::Error`], never
    /// propagated as a `Result` error, so the scheduler never has to
    /// special-case a failed dispatch versus a worker-reported error.
    #[allow(clippy::too_many_arguments)]
    pub async fn crack(
        &self,
        registry: &WorkerRegistry,
        url: &str,
        job_id: Uuid,
        hash: &str,
        hash_type: &str,
        scheme_name: &str,
        chunk_lo: u64,
        chunk_hi: u64,
    ) -> CrackOutcome {
        let request = CrackRequest {
            hash: hash.to_string(),
            hash_type: hash_type.to_string(),
            password_scheme: scheme_name.to_string(),
            range: Range {
                start_index: chunk_lo,
                end_index: chunk_hi,
            },
            job_id: job_id.to_string(),
            request_id: Uuid::new_v4().to_string(),
        };

        let endpoint = format!("{}/crack-range", url.trim_end_matches('/'));
        let outcome = self
            .http
            .post(&endpoint)
            .json(&request)
            .timeout(self.crack_timeout)
            .send()
            .await;

        let result = match outcome {
            Ok(resp) if resp.status().is_success() => match resp.json::<CrackResponse>().await {
                Ok(body) => Ok(body),
                Err(err) => Err(format!("malformed response body: {err}")),
            },
            Ok(resp) => Err(format!("non-2xx status: {}", resp.status())),
            Err(err) => Err(format!("transport error: {err}")),
        };

        if let Some(breaker) = registry.breaker(url) {
            match &result {
                Ok(_) => breaker.record_success(),
                Err(_) => breaker.record_failure(),
            }
        }

        match result {
            Ok(body) => body.into(),
            Err(message) => CrackOutcome::Error {
                message,
                last_index_processed: chunk_lo,
            },
        }
    }

    /// Best-effort `/cancel-job` broadcast to one worker. All failures are
    /// swallowed and logged at debug; never updates a breaker.
    pub async fn cancel(&self, url: &str, job_id: Uuid) {
        let endpoint = format!("{}/cancel-job", url.trim_end_matches('/'));
        let request = CancelRequest {
            job_id: job_id.to_string(),
        };
        let result = self
            .http
            .post(&endpoint)
            .json(&request)
            .timeout(self.cancel_timeout)
            .send()
            .await;
        if let Err(err) = result {
            tracing::debug!(worker = %url, %job_id, error = %err, "cancel-job call failed");
        }
    }

    /// Release pooled connections. `reqwest::Client`'s pool is reclaimed on
    /// drop; this exists so callers have an explicit point to retire the
    /// client at shutdown, matching the transport's documented lifecycle.
    pub fn close(self) {
        drop(self);
    }
}
