mod cli;
mod input;

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use uuid::Uuid;

use crackforge_engine::{CrackedCache, JobManager, OutputEntry, OutputWriter, Scheduler, WorkerClient, WorkerRegistry};

use crate::cli::Cli;
use crate::input::InputLine;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            use clap::error::ErrorKind;
            match err.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                    print!("{err}");
                    return ExitCode::SUCCESS;
                }
                // A usage error exits 1, not clap's default 2.
                _ => {
                    eprint!("{err}");
                    return ExitCode::FAILURE;
                }
            }
        }
    };

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("crackforge: {err:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let lines = input::read_lines(&cli.input_file)
        .map_err(|err| anyhow::anyhow!("failed to read {:?}: {err}", cli.input_file))?;

    tracing::info!(
        input_file = %cli.input_file.display(),
        lines = lines.len(),
        workers = cli.minion_urls.len(),
        "starting crackforge run"
    );

    let config = cli.engine_config();
    let output = Arc::new(OutputWriter::new(&cli.output_file).await?);

    let registry = Arc::new(WorkerRegistry::new(
        cli.minion_urls.clone(),
        config.minion_failure_threshold,
        config.minion_breaker_open,
    ));
    let client = Arc::new(WorkerClient::new(
        config.minion_request_timeout,
        config.minion_cancel_timeout,
    ));
    // A fresh `CrackedCache` per process run guarantees a clean slate on
    // every run without an explicit clear: nothing persists a cache across
    // process boundaries.
    let cache = Arc::new(CrackedCache::new());
    let job_manager = JobManager::new(cache.clone(), config.chunk_size);
    let scheduler = Arc::new(Scheduler::new(
        registry.clone(),
        client.clone(),
        cache.clone(),
        output.clone(),
        config.clone(),
    ));

    let events = scheduler.subscribe();
    tokio::spawn(log_scheduler_events(events));

    let semaphore = Arc::new(tokio::sync::Semaphore::new(config.max_concurrent_jobs));
    let mut handles = Vec::new();

    for line in lines {
        match line {
            InputLine::Invalid(token) => {
                let job_id = Uuid::new_v4();
                tracing::warn!(%token, %job_id, "rejecting malformed input line");
                let entry = OutputEntry {
                    cracked_password: None,
                    status: "INVALID_INPUT".to_string(),
                    job_id: job_id.to_string(),
                };
                output.emit(&token, "INVALID_INPUT", &job_id.to_string(), entry).await;
            }
            InputLine::Hash(hash) => {
                let job = match job_manager.create(&hash, &cli.password_scheme) {
                    Ok(job) => job,
                    Err(err) => {
                        anyhow::bail!("unknown password scheme {:?}: {err}", cli.password_scheme);
                    }
                };

                let scheduler = scheduler.clone();
                let semaphore = semaphore.clone();
                let permit = semaphore
                    .acquire_owned()
                    .await
                    .expect("semaphore is never closed");
                handles.push(tokio::spawn(async move {
                    let _permit = permit;
                    scheduler.process(job).await;
                }));
            }
        }
    }

    for handle in handles {
        handle.await?;
    }

    drop(scheduler);
    if let Ok(client) = Arc::try_unwrap(client) {
        client.close();
    }
    Ok(())
}

/// Render [`crackforge_engine::SchedulerEvent`]s as structured log lines.
/// The stdout job-result line is the fixed output contract; this is purely
/// observability and never competes with it for the same stream.
async fn log_scheduler_events(mut events: tokio::sync::broadcast::Receiver<crackforge_engine::SchedulerEvent>) {
    use crackforge_engine::SchedulerEvent;
    loop {
        match events.recv().await {
            Ok(SchedulerEvent::JobStarted { job_id, hash }) => {
                tracing::debug!(%job_id, %hash, "job started");
            }
            Ok(SchedulerEvent::ChunkDispatched { job_id, worker_url, lo, hi }) => {
                tracing::trace!(%job_id, %worker_url, lo, hi, "chunk dispatched");
            }
            Ok(SchedulerEvent::ChunkResult { job_id, outcome }) => {
                tracing::trace!(%job_id, %outcome, "chunk result");
            }
            Ok(SchedulerEvent::JobFinished { job_id, status }) => {
                tracing::info!(%job_id, %status, "job finished");
            }
            Ok(SchedulerEvent::Warning { job_id, message }) => {
                tracing::warn!(job_id = ?job_id, %message, "scheduler warning");
            }
            Ok(SchedulerEvent::Error { job_id, message }) => {
                tracing::error!(%job_id, %message, "scheduler error");
            }
            Err(tokio::sync::broadcast::error::RecvError::Lagged(_)) => continue,
            Err(tokio::sync::broadcast::error::RecvError::Closed) => return,
        }
    }
}
