use uuid::Uuid;

/// Identifies a [`Chunk`] within its owning job.
pub type ChunkId = Uuid;

/// Lifecycle state of a [`Chunk`]. Terminal states are
/// [`ChunkStatus::Done`], [`ChunkStatus::Cancelled`], [`ChunkStatus::Failed`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkStatus {
    /// Not yet dispatched to a worker.
    Pending,
    /// Dispatched; awaiting a result.
    InProgress,
    /// Worker returned a terminal (non-retryable) result.
    Done,
    /// Abandoned because the owning job finished first.
    Cancelled,
    /// Exhausted `MAX_ATTEMPTS` retries on transport/protocol errors.
    Failed,
}

impl ChunkStatus {
    /// Whether this status will never change again.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            ChunkStatus::Done | ChunkStatus::Cancelled | ChunkStatus::Failed
        )
    }
}

/// A contiguous, inclusive sub-range of a job's keyspace dispatched to a
/// single worker call.
#[derive(Debug, Clone)]
pub struct Chunk {
    /// Opaque chunk identifier.
    pub id: ChunkId,
    /// Owning job.
    pub job_id: uuid::Uuid,
    /// Inclusive lower bound of this chunk's index range.
    pub lo: u64,
    /// Inclusive upper bound of this chunk's index range.
    pub hi: u64,
    /// Current lifecycle state.
    pub status: ChunkStatus,
    /// Worker URL currently (or most recently) assigned to this chunk.
    pub assigned_worker: Option<String>,
    /// Progress marker reported by the last result for this chunk.
    pub last_index_processed: Option<u64>,
    /// Number of ERROR results observed for this chunk.
    pub attempts: u32,
}

impl Chunk {
    /// Construct a new chunk owned by `job_id`, covering `[lo, hi]`.
    pub fn new(job_id: uuid::Uuid, lo: u64, hi: u64) -> Self {
        Self {
            id: Uuid::new_v4(),
            job_id,
            lo,
            hi,
            status: ChunkStatus::Pending,
            assigned_worker: None,
            last_index_processed: None,
            attempts: 0,
        }
    }

    /// Number of indices covered by this chunk.
    pub fn len(&self) -> u64 {
        self.hi - self.lo + 1
    }

    /// Chunks never cover an empty range.
    pub fn is_empty(&self) -> bool {
        false
    }
}
