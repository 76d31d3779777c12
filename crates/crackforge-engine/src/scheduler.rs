use std::sync::Arc;

use crackforge_core::{ChunkId, Job, JobStatus};
use tokio::sync::broadcast;
use tokio::task::JoinSet;
use uuid::Uuid;

use crate::cache::CrackedCache;
use crate::chunk_manager;
use crate::client::{CrackOutcome, WorkerClient};
use crate::config::EngineConfig;
use crate::events::SchedulerEvent;
use crate::job_manager::JobManager;
use crate::output::{OutputEntry, OutputWriter};
use crate::registry::WorkerRegistry;

/// The engine. One `Scheduler` is constructed once and shared (by `Arc`)
/// across every concurrently-processed job; `process` drives a single job
/// to a terminal state and may be invoked concurrently for distinct jobs,
/// contending only for the `Registry`, `Client`, `Cache`, and output mutex
/// each owns internally.
pub struct Scheduler {
    registry: Arc<WorkerRegistry>,
    client: Arc<WorkerClient>,
    cache: Arc<CrackedCache>,
    output: Arc<OutputWriter>,
    config: EngineConfig,
    events: broadcast::Sender<SchedulerEvent>,
}

/// Result of one task spawned to dispatch a single chunk.
struct TaskResult {
    chunk_id: ChunkId,
    outcome: CrackOutcome,
}

impl Scheduler {
    /// Build a scheduler over the given shared fleet state.
    pub fn new(
        registry: Arc<WorkerRegistry>,
        client: Arc<WorkerClient>,
        cache: Arc<CrackedCache>,
        output: Arc<OutputWriter>,
        config: EngineConfig,
    ) -> Self {
        let (events, _rx) = broadcast::channel(1024);
        Self {
            registry,
            client,
            cache,
            output,
            config,
            events,
        }
    }

    /// Subscribe to this scheduler's progress events.
    pub fn subscribe(&self) -> broadcast::Receiver<SchedulerEvent> {
        self.events.subscribe()
    }

    fn emit_event(&self, event: SchedulerEvent) {
        let _ = self.events.send(event);
    }

    /// Drive `job` to a terminal state: dispatch chunks, collect results,
    /// retry errors, and on the first FOUND mark the job done, emit output,
    /// and broadcast cancellation to the worker fleet. Returns once the job
    /// has reached a terminal status.
    pub async fn process(&self, mut job: Job) {
        self.emit_event(SchedulerEvent::JobStarted {
            job_id: job.id,
            hash: job.hash.clone(),
        });

        // Step 1: cache-hit short-circuit.
        if job.status == JobStatus::Done {
            let token = if job.plaintext.is_some() {
                "FOUND"
            } else {
                "NOT_FOUND"
            };
            self.finish(&job, token).await;
            return;
        }

        let job_manager = JobManager::new(self.cache.clone(), self.config.chunk_size);
        let mut in_flight: JoinSet<TaskResult> = JoinSet::new();
        let mut job_failed = false;
        let mut found_plaintext: Option<String> = None;

        loop {
            // Step 2: first-found guard.
            if let Some(plaintext) = found_plaintext.take() {
                job_manager.mark_done(&mut job, Some(plaintext));
                self.finish(&job, "FOUND").await;
                self.broadcast_cancel(job.id, &mut in_flight).await;
                return;
            }

            // Step 3: failure exit.
            if job_failed {
                job_manager.mark_failed(&mut job);
                self.finish(&job, "FAILED").await;
                return;
            }

            // Step 4: no workers available.
            let available = self.registry.available();
            if available.is_empty() {
                tokio::time::sleep(self.config.no_minion_wait_time).await;
                continue;
            }

            // Step 5: fill the task pool.
            while in_flight.len() < available.len() {
                let Some(chunk_id) = chunk_manager::next_pending(&job) else {
                    break;
                };
                let Some(url) = self.registry.pick_next() else {
                    break;
                };
                let url = url.to_string();
                chunk_manager::mark_in_progress(&mut job, chunk_id, &url);
                let chunk = job.chunks.iter().find(|c| c.id == chunk_id).unwrap();
                self.emit_event(SchedulerEvent::ChunkDispatched {
                    job_id: job.id,
                    worker_url: url.clone(),
                    lo: chunk.lo,
                    hi: chunk.hi,
                });
                self.spawn_crack(&mut in_flight, job.id, &job.hash, &job.hash_type, &job.scheme_name, chunk_id, chunk.lo, chunk.hi, url);
            }

            // Step 6: completion check.
            if in_flight.is_empty() {
                if chunk_manager::all_terminal(&job) {
                    let token = if chunk_manager::any_failed(&job) {
                        "FAILED"
                    } else {
                        "NOT_FOUND"
                    };
                    if token == "FAILED" {
                        job_manager.mark_failed(&mut job);
                    } else {
                        job_manager.mark_done(&mut job, None);
                    }
                    self.finish(&job, token).await;
                    return;
                }
                tokio::time::sleep(crate::config::DEFAULT_DRAIN_YIELD).await;
                continue;
            }

            // Step 7: drain one completed task.
            let Some(joined) = in_flight.join_next().await else {
                continue;
            };
            let task_result = match joined {
                Ok(result) => result,
                Err(_join_err) => continue,
            };
            match task_result.outcome {
                CrackOutcome::Found { plaintext, last_index_processed } => {
                    let first_found = chunk_manager::on_found(&mut job, task_result.chunk_id, last_index_processed);
                    self.emit_event(SchedulerEvent::ChunkResult {
                        job_id: job.id,
                        outcome: "FOUND".to_string(),
                    });
                    if first_found {
                        found_plaintext = Some(plaintext);
                    }
                }
                CrackOutcome::NotFound { last_index_processed } => {
                    chunk_manager::on_not_found(&mut job, task_result.chunk_id, last_index_processed);
                    self.emit_event(SchedulerEvent::ChunkResult {
                        job_id: job.id,
                        outcome: "NOT_FOUND".to_string(),
                    });
                }
                CrackOutcome::Cancelled { .. } => {
                    chunk_manager::on_cancelled(&mut job, task_result.chunk_id);
                    self.emit_event(SchedulerEvent::ChunkResult {
                        job_id: job.id,
                        outcome: "CANCELLED".to_string(),
                    });
                }
                CrackOutcome::InvalidInput { message } => {
                    self.emit_event(SchedulerEvent::Error {
                        job_id: job.id,
                        message,
                    });
                    job_manager.mark_done(&mut job, None);
                    self.finish(&job, "INVALID_INPUT").await;
                    self.broadcast_cancel(job.id, &mut in_flight).await;
                    return;
                }
                CrackOutcome::Error { message, last_index_processed } => {
                    let retry = chunk_manager::on_error(
                        &mut job,
                        task_result.chunk_id,
                        last_index_processed,
                        self.config.max_attempts,
                    );
                    self.emit_event(SchedulerEvent::Warning {
                        job_id: Some(job.id),
                        message,
                    });
                    if !retry && chunk_manager::any_failed(&job) {
                        job_failed = true;
                    }
                }
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn spawn_crack(
        &self,
        in_flight: &mut JoinSet<TaskResult>,
        job_id: Uuid,
        hash: &str,
        hash_type: &str,
        scheme_name: &str,
        chunk_id: ChunkId,
        lo: u64,
        hi: u64,
        url: String,
    ) {
        let registry = self.registry.clone();
        let client = self.client.clone();
        let hash = hash.to_string();
        let hash_type = hash_type.to_string();
        let scheme_name = scheme_name.to_string();
        in_flight.spawn(async move {
            let outcome = client
                .crack(&registry, &url, job_id, &hash, &hash_type, &scheme_name, lo, hi)
                .await;
            TaskResult { chunk_id, outcome }
        });
    }

    /// Fire-and-forget cancel to every registered worker, and cancel every
    /// still in-flight task for this job. The cancel broadcast runs as a
    /// detached task so `process` does not wait on it; cancel traffic may
    /// complete after `process` has already returned.
    async fn broadcast_cancel(&self, job_id: Uuid, in_flight: &mut JoinSet<TaskResult>) {
        in_flight.abort_all();
        while in_flight.join_next().await.is_some() {}

        let client = self.client.clone();
        let workers = self.registry.all();
        tokio::spawn(async move {
            for url in workers {
                client.cancel(&url, job_id).await;
            }
        });
    }

    async fn finish(&self, job: &Job, token: &str) {
        let entry = OutputEntry {
            cracked_password: job.plaintext.clone(),
            status: token.to_string(),
            job_id: job.id.to_string(),
        };
        self.output.emit(&job.hash, token, &job.id.to_string(), entry).await;
        self.emit_event(SchedulerEvent::JobFinished {
            job_id: job.id,
            status: token.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use axum::extract::Json as ExtractJson;
    use axum::routing::{get, post};
    use axum::Router;
    use crackforge_core::protocol::{CrackRequest, CrackResponse, HealthResponse};

    use super::*;
    use crate::config::EngineConfig;

    #[derive(Clone, Copy)]
    enum FakeWorkerMode {
        AlwaysFound,
        AlwaysNotFound,
        AlwaysError,
    }

    async fn spawn_fake_worker(mode: FakeWorkerMode) -> String {
        async fn health() -> axum::Json<HealthResponse> {
            axum::Json(HealthResponse::default())
        }

        let app = match mode {
            FakeWorkerMode::AlwaysFound => Router::new()
                .route("/health", get(health))
                .route(
                    "/crack-range",
                    post(|ExtractJson(_req): ExtractJson<CrackRequest>| async move {
                        axum::Json(CrackResponse::found("050-0000000".to_string(), 0))
                    }),
                )
                .route("/cancel-job", post(cancel_ok)),
            FakeWorkerMode::AlwaysNotFound => Router::new()
                .route("/health", get(health))
                .route(
                    "/crack-range",
                    post(|ExtractJson(req): ExtractJson<CrackRequest>| async move {
                        axum::Json(CrackResponse::not_found(req.range.end_index))
                    }),
                )
                .route("/cancel-job", post(cancel_ok)),
            FakeWorkerMode::AlwaysError => Router::new()
                .route("/health", get(health))
                .route(
                    "/crack-range",
                    post(|ExtractJson(_req): ExtractJson<CrackRequest>| async move {
                        axum::http::StatusCode::INTERNAL_SERVER_ERROR
                    }),
                )
                .route("/cancel-job", post(cancel_ok)),
        };

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    async fn cancel_ok(
        ExtractJson(_req): ExtractJson<crackforge_core::protocol::CancelRequest>,
    ) -> axum::Json<crackforge_core::protocol::CancelResponse> {
        axum::Json(crackforge_core::protocol::CancelResponse::ok())
    }

    fn whole_keyspace_config() -> EngineConfig {
        let mut cfg = EngineConfig::with_defaults(1);
        cfg.chunk_size = 100_000_000;
        cfg
    }

    async fn build_scheduler(
        worker_urls: Vec<String>,
        cfg: EngineConfig,
    ) -> (Arc<Scheduler>, std::path::PathBuf) {
        let dir = std::env::temp_dir().join(format!("crackforge-sched-test-{}", Uuid::new_v4()));
        let path = dir.join("output.json");
        let output = Arc::new(OutputWriter::new(&path).await.unwrap());
        let registry = Arc::new(WorkerRegistry::new(
            worker_urls,
            cfg.minion_failure_threshold,
            cfg.minion_breaker_open,
        ));
        let client = Arc::new(WorkerClient::new(
            cfg.minion_request_timeout,
            cfg.minion_cancel_timeout,
        ));
        let cache = Arc::new(CrackedCache::new());
        let scheduler = Arc::new(Scheduler::new(registry, client, cache, output, cfg));
        (scheduler, path)
    }

    fn read_statuses(path: &std::path::Path) -> std::collections::BTreeMap<String, OutputEntry> {
        let body = std::fs::read_to_string(path).unwrap();
        serde_json::from_str(&body).unwrap()
    }

    #[tokio::test]
    async fn found_on_first_chunk_emits_found_and_caches() {
        let url = spawn_fake_worker(FakeWorkerMode::AlwaysFound).await;
        let (scheduler, path) = build_scheduler(vec![url], whole_keyspace_config()).await;
        let cache = Arc::new(CrackedCache::new());
        let job_manager = JobManager::new(cache, 100_000_000);
        let hash = crackforge_core::md5_hex("050-0000000");
        let job = job_manager.create(&hash, "israeli-mobile").unwrap();
        scheduler.process(job).await;

        let rows = read_statuses(&path);
        let row = rows.get(&hash).expect("row for hash");
        assert_eq!(row.status, "FOUND");
        assert_eq!(row.cracked_password.as_deref(), Some("050-0000000"));
    }

    #[tokio::test]
    async fn exhausted_keyspace_emits_not_found() {
        let url = spawn_fake_worker(FakeWorkerMode::AlwaysNotFound).await;
        let (scheduler, path) = build_scheduler(vec![url], whole_keyspace_config()).await;
        let cache = Arc::new(CrackedCache::new());
        let job_manager = JobManager::new(cache, 100_000_000);
        let hash = "a".repeat(32);
        let job = job_manager.create(&hash, "israeli-mobile").unwrap();
        scheduler.process(job).await;

        let rows = read_statuses(&path);
        assert_eq!(rows.get(&hash).unwrap().status, "NOT_FOUND");
    }

    #[tokio::test]
    async fn persistent_errors_exhaust_retries_and_fail_job() {
        let url = spawn_fake_worker(FakeWorkerMode::AlwaysError).await;
        let mut cfg = whole_keyspace_config();
        cfg.max_attempts = 3;
        let (scheduler, path) = build_scheduler(vec![url], cfg).await;
        let cache = Arc::new(CrackedCache::new());
        let job_manager = JobManager::new(cache, 100_000_000);
        let hash = "b".repeat(32);
        let job = job_manager.create(&hash, "israeli-mobile").unwrap();
        scheduler.process(job).await;

        let rows = read_statuses(&path);
        assert_eq!(rows.get(&hash).unwrap().status, "FAILED");
    }

    #[tokio::test]
    async fn concurrent_jobs_each_write_their_own_output_row() {
        let url = spawn_fake_worker(FakeWorkerMode::AlwaysNotFound).await;
        let (scheduler, path) =
            build_scheduler(vec![url.clone(), url.clone(), url], whole_keyspace_config()).await;
        let cache = Arc::new(CrackedCache::new());
        let job_manager = JobManager::new(cache, 100_000_000);

        let mut handles = Vec::new();
        let mut hashes = Vec::new();
        for i in 0..10u32 {
            let hash = format!("{i:032x}");
            hashes.push(hash.clone());
            let job = job_manager.create(&hash, "israeli-mobile").unwrap();
            let scheduler = scheduler.clone();
            handles.push(tokio::spawn(async move {
                scheduler.process(job).await;
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let rows = read_statuses(&path);
        assert_eq!(rows.len(), 10);
        for hash in hashes {
            assert_eq!(rows.get(&hash).unwrap().status, "NOT_FOUND");
        }
    }
}

