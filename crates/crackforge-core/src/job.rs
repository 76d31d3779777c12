use uuid::Uuid;

use crate::chunk::Chunk;

/// Identifies a [`Job`].
pub type JobId = Uuid;

/// Lifecycle state of a [`Job`]. Terminal states are [`JobStatus::Done`],
/// [`JobStatus::Cancelled`], [`JobStatus::Failed`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStatus {
    /// Still has chunks to dispatch or in flight.
    Pending,
    /// Reached a final verdict (plaintext found, or keyspace exhausted).
    Done,
    /// Superseded (currently unused by the single-master scheduler, reserved
    /// for cooperative cancellation of a job from outside its own scheduler).
    Cancelled,
    /// A chunk exhausted its retry budget.
    Failed,
}

impl JobStatus {
    /// Whether this status will never change again.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            JobStatus::Done | JobStatus::Cancelled | JobStatus::Failed
        )
    }
}

/// The unit of work attempting to crack one hash. Owns its chunks and its
/// terminal verdict. Created by `JobManager`; mutated only by the
/// `Scheduler` instance driving it.
#[derive(Debug, Clone)]
pub struct Job {
    /// Opaque job identifier.
    pub id: JobId,
    /// Normalized (lowercase hex) target hash.
    pub hash: String,
    /// Hash algorithm identifier; always `"md5"` in this implementation.
    pub hash_type: String,
    /// Name of the password scheme used to enumerate this job's keyspace.
    pub scheme_name: String,
    /// Inclusive lower bound of the job's keyspace.
    pub lo: u64,
    /// Inclusive upper bound of the job's keyspace.
    pub hi: u64,
    /// Current lifecycle state.
    pub status: JobStatus,
    /// Ordered, gap-free partition of `[lo, hi]`.
    pub chunks: Vec<Chunk>,
    /// Recovered plaintext, set only when `status == Done` via a FOUND result.
    pub plaintext: Option<String>,
}

impl Job {
    /// Whether every chunk has reached a terminal status.
    pub fn all_chunks_terminal(&self) -> bool {
        self.chunks.iter().all(|c| c.status.is_terminal())
    }

    /// Whether any chunk has reached `Failed`.
    pub fn any_chunk_failed(&self) -> bool {
        self.chunks
            .iter()
            .any(|c| c.status == crate::chunk::ChunkStatus::Failed)
    }
}
