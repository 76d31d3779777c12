//! Master-side distributed scheduling engine: per-hash job lifecycle,
//! chunked keyspace partitioning, a parallel scheduler over a shared
//! worker fleet with per-worker circuit breakers and round-robin picking,
//! and the HTTP transport to that fleet.

mod breaker;
mod cache;
pub mod chunk_manager;
mod client;
mod config;
mod error;
mod events;
mod job_manager;
mod output;
mod registry;
mod scheduler;

pub use breaker::CircuitBreaker;
pub use cache::CrackedCache;
pub use client::{CrackOutcome, WorkerClient};
pub use config::{
    DEFAULT_CHUNK_SIZE, DEFAULT_MAX_ATTEMPTS, DEFAULT_MINION_BREAKER_OPEN,
    DEFAULT_MINION_FAILURE_THRESHOLD, DEFAULT_MINION_REQUEST_TIMEOUT, DEFAULT_NO_MINION_WAIT_TIME,
    EngineConfig,
};
pub use error::EngineError;
pub use events::SchedulerEvent;
pub use job_manager::JobManager;
pub use output::{OutputEntry, OutputWriter};
pub use registry::WorkerRegistry;
pub use scheduler::Scheduler;
