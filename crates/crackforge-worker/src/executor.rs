use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use crackforge_scheme::PasswordScheme;

use crate::cancellation::CancellationRegistry;
use crate::config::WorkerConfig;

/// Outcome of one `/crack-range` search, independent of the HTTP layer.
#[derive(Debug)]
pub enum ExecutorOutcome {
    /// The plaintext was found within the dispatched range.
    Found {
        /// Recovered plaintext.
        plaintext: String,
        /// Matching index.
        last_index_processed: u64,
    },
    /// The range was exhausted without a match.
    NotFound {
        /// Final scanned index (the range's `hi`).
        last_index_processed: u64,
    },
    /// The search was abandoned because its job was cancelled mid-flight.
    Cancelled {
        /// Last observed index before cancellation was noticed.
        last_index_processed: u64,
    },
    /// A runtime error occurred while searching.
    Error {
        /// Human-readable detail.
        message: String,
        /// Resumption hint (the global range's `lo`).
        last_index_processed: u64,
    },
    /// The request itself was malformed.
    InvalidInput {
        /// Human-readable detail.
        message: String,
    },
}

/// Search `[lo, hi]` for a plaintext whose MD5 digest equals `target_hash`
/// under `scheme_name`, polling `cancellation` for `job_id` cooperatively.
/// Re-validates the hash and range (the master is expected to have already
/// validated both, but the worker is the last line of defense; an unknown
/// scheme or an out-of-bounds range yields INVALID_INPUT, never a panic).
///
/// Dispatches to parallel sub-range search when `config.worker_threads > 1`
/// and the range is at least `config.parallel_threshold` wide; sequential
/// otherwise. This function is synchronous and CPU-bound; callers on an
/// async runtime must run it via `spawn_blocking`.
pub fn crack(
    target_hash: &str,
    scheme_name: &str,
    lo: u64,
    hi: u64,
    job_id: &str,
    cancellation: &CancellationRegistry,
    config: &WorkerConfig,
) -> ExecutorOutcome {
    let target_hash = match crackforge_core::normalize_hash(target_hash) {
        Ok(h) => h,
        Err(_) => {
            return ExecutorOutcome::InvalidInput {
                message: "hash must be 32 lowercase hex characters".to_string(),
            }
        }
    };

    let scheme = match crackforge_scheme::scheme_by_name(scheme_name) {
        Ok(s) => s,
        Err(err) => {
            return ExecutorOutcome::InvalidInput {
                message: err.to_string(),
            }
        }
    };

    let (scheme_lo, scheme_hi) = scheme.bounds();
    if lo > hi || lo < scheme_lo || hi > scheme_hi {
        return ExecutorOutcome::InvalidInput {
            message: format!(
                "range [{lo}, {hi}] outside scheme bounds [{scheme_lo}, {scheme_hi}]"
            ),
        };
    }

    let len = hi - lo + 1;
    if config.worker_threads > 1 && len >= config.parallel_threshold {
        search_parallel(scheme.as_ref(), &target_hash, lo, hi, job_id, cancellation, config)
    } else {
        let stop = AtomicBool::new(false);
        search_range(
            scheme.as_ref(),
            &target_hash,
            lo,
            hi,
            job_id,
            cancellation,
            config.cancellation_check_every,
            &stop,
        )
    }
}

/// Sequential scan of `[lo, hi]`, polling `cancellation` (and `stop`, for
/// the parallel case) every `check_every` indices.
fn search_range(
    scheme: &dyn PasswordScheme,
    target_hash: &str,
    lo: u64,
    hi: u64,
    job_id: &str,
    cancellation: &CancellationRegistry,
    check_every: u64,
    stop: &AtomicBool,
) -> ExecutorOutcome {
    let check_every = check_every.max(1);
    let mut i = lo;
    loop {
        if (i - lo) % check_every == 0
            && (stop.load(Ordering::SeqCst) || cancellation.is_cancelled(job_id))
        {
            return ExecutorOutcome::Cancelled {
                last_index_processed: i,
            };
        }

        let password = scheme
            .index_to_password(i)
            .expect("index within bounds validated by caller");
        if crackforge_core::md5_hex(&password) == target_hash {
            return ExecutorOutcome::Found {
                plaintext: password,
                last_index_processed: i,
            };
        }

        if i == hi {
            break;
        }
        i += 1;
    }
    ExecutorOutcome::NotFound {
        last_index_processed: hi,
    }
}

/// Partition `[lo, hi]` into sub-ranges of `max(subrange_min_size,
/// len/worker_threads)` and search them concurrently, returning as soon as
/// any sub-range matches, errors, or observes cancellation.
fn search_parallel(
    scheme: &dyn PasswordScheme,
    target_hash: &str,
    lo: u64,
    hi: u64,
    job_id: &str,
    cancellation: &CancellationRegistry,
    config: &WorkerConfig,
) -> ExecutorOutcome {
    let threads = config.worker_threads.max(1) as u64;
    let total = hi - lo + 1;
    let sub_size = config.subrange_min_size.max(total / threads).max(1);

    let mut ranges = Vec::new();
    let mut start = lo;
    loop {
        let end = (start + sub_size - 1).min(hi);
        ranges.push((start, end));
        if end == hi {
            break;
        }
        start = end + 1;
    }

    let stop = AtomicBool::new(false);
    let (tx, rx) = mpsc::channel::<ExecutorOutcome>();

    thread::scope(|scope| {
        for (sub_lo, sub_hi) in ranges.iter().copied() {
            let tx = tx.clone();
            let stop = &stop;
            scope.spawn(move || {
                let outcome = search_range(
                    scheme,
                    target_hash,
                    sub_lo,
                    sub_hi,
                    job_id,
                    cancellation,
                    config.cancellation_check_every,
                    stop,
                );
                let _ = tx.send(outcome);
            });
        }
        drop(tx);

        let mut remaining = ranges.len();
        loop {
            if remaining == 0 {
                return ExecutorOutcome::NotFound {
                    last_index_processed: hi,
                };
            }
            if cancellation.is_cancelled(job_id) {
                stop.store(true, Ordering::SeqCst);
                return ExecutorOutcome::Cancelled {
                    last_index_processed: hi,
                };
            }
            match rx.recv_timeout(Duration::from_millis(20)) {
                Ok(ExecutorOutcome::Found {
                    plaintext,
                    last_index_processed,
                }) => {
                    stop.store(true, Ordering::SeqCst);
                    return ExecutorOutcome::Found {
                        plaintext,
                        last_index_processed,
                    };
                }
                Ok(ExecutorOutcome::Error { message, .. }) => {
                    stop.store(true, Ordering::SeqCst);
                    return ExecutorOutcome::Error {
                        message,
                        last_index_processed: lo,
                    };
                }
                Ok(ExecutorOutcome::Cancelled { .. }) => {
                    stop.store(true, Ordering::SeqCst);
                    return ExecutorOutcome::Cancelled {
                        last_index_processed: hi,
                    };
                }
                Ok(ExecutorOutcome::NotFound { .. }) => {
                    remaining -= 1;
                }
                Ok(ExecutorOutcome::InvalidInput { .. }) => {
                    remaining -= 1;
                }
                Err(mpsc::RecvTimeoutError::Timeout) => continue,
                Err(mpsc::RecvTimeoutError::Disconnected) => {
                    return ExecutorOutcome::NotFound {
                        last_index_processed: hi,
                    }
                }
            }
        }
    })
}
