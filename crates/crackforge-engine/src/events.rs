use uuid::Uuid;

/// Progress events broadcast by every [`crate::Scheduler::process`] call, so
/// a driver binary can render progress without the engine crate depending
/// on any particular UI. Lagging subscribers simply miss events; the
/// scheduler never blocks on a slow reader.
#[derive(Debug, Clone)]
pub enum SchedulerEvent {
    /// A job began processing.
    JobStarted {
        /// The job's id.
        job_id: Uuid,
        /// Normalized target hash.
        hash: String,
    },
    /// A chunk was dispatched to a worker.
    ChunkDispatched {
        /// Owning job id.
        job_id: Uuid,
        /// Worker URL the chunk was sent to.
        worker_url: String,
        /// Inclusive range start.
        lo: u64,
        /// Inclusive range end.
        hi: u64,
    },
    /// A chunk's dispatch completed with a verdict.
    ChunkResult {
        /// Owning job id.
        job_id: Uuid,
        /// Short description of the verdict (`"FOUND"`, `"NOT_FOUND"`, etc).
        outcome: String,
    },
    /// A job reached a terminal state.
    JobFinished {
        /// The job's id.
        job_id: Uuid,
        /// Terminal token: `FOUND`, `NOT_FOUND`, `FAILED`, or `INVALID_INPUT`.
        status: String,
    },
    /// A recoverable problem worth surfacing (e.g. an output write failure).
    Warning {
        /// Owning job id, if applicable.
        job_id: Option<Uuid>,
        /// Human-readable detail.
        message: String,
    },
    /// An unrecoverable problem for this job.
    Error {
        /// Owning job id.
        job_id: Uuid,
        /// Human-readable detail.
        message: String,
    },
}
