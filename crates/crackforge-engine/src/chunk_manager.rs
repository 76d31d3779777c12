use crackforge_core::{Chunk, ChunkId, ChunkStatus, Job, JobStatus};

fn chunk_mut(job: &mut Job, chunk_id: ChunkId) -> Option<&mut Chunk> {
    job.chunks.iter_mut().find(|c| c.id == chunk_id)
}

/// First chunk still `PENDING`, if any.
pub fn next_pending(job: &Job) -> Option<ChunkId> {
    job.chunks
        .iter()
        .find(|c| c.status == ChunkStatus::Pending)
        .map(|c| c.id)
}

/// Mark a chunk dispatched to `url`.
pub fn mark_in_progress(job: &mut Job, chunk_id: ChunkId, url: &str) {
    if job.status.is_terminal() {
        return;
    }
    if let Some(chunk) = chunk_mut(job, chunk_id) {
        chunk.status = ChunkStatus::InProgress;
        chunk.assigned_worker = Some(url.to_string());
    }
}

/// Record a FOUND result for `chunk_id` at `matched_index`. Returns whether
/// this is the first plaintext observed on this job (the terminal
/// transition the scheduler should act on, setting `job.status`/
/// `job.plaintext` is the scheduler's job, not this function's); a later
/// FOUND on an already-terminal job is a no-op.
pub fn on_found(job: &mut Job, chunk_id: ChunkId, matched_index: u64) -> bool {
    let first_found = !job.status.is_terminal();
    if let Some(chunk) = chunk_mut(job, chunk_id) {
        chunk.status = ChunkStatus::Done;
        chunk.last_index_processed = Some(matched_index);
    }
    first_found
}

/// Record a NOT_FOUND result: the chunk's keyspace was exhausted cleanly.
pub fn on_not_found(job: &mut Job, chunk_id: ChunkId, last_index: u64) {
    if job.status.is_terminal() {
        return;
    }
    if let Some(chunk) = chunk_mut(job, chunk_id) {
        chunk.status = ChunkStatus::Done;
        chunk.last_index_processed = Some(last_index);
    }
}

/// Record that a chunk's dispatch was abandoned due to job cancellation.
/// The attempt counter is NOT incremented; this counts as "completed" for
/// termination purposes.
pub fn on_cancelled(job: &mut Job, chunk_id: ChunkId) {
    if job.status.is_terminal() {
        return;
    }
    if let Some(chunk) = chunk_mut(job, chunk_id) {
        chunk.status = ChunkStatus::Cancelled;
    }
}

/// Record an ERROR result. Returns `true` if the chunk should be
/// redispatched (reset to PENDING), `false` if it exhausted its retry
/// budget and was marked FAILED. On retry the chunk's original `[lo, hi]`
/// is redispatched unchanged; `last_index_processed` is recorded for
/// observability only and is not consulted when rebuilding the request.
pub fn on_error(job: &mut Job, chunk_id: ChunkId, last_index: u64, max_attempts: u32) -> bool {
    if job.status.is_terminal() {
        return false;
    }
    let Some(chunk) = chunk_mut(job, chunk_id) else {
        return false;
    };
    chunk.attempts += 1;
    chunk.last_index_processed = Some(last_index);
    if chunk.attempts >= max_attempts {
        chunk.status = ChunkStatus::Failed;
        false
    } else {
        chunk.status = ChunkStatus::Pending;
        chunk.assigned_worker = None;
        true
    }
}

/// Whether every chunk has reached a terminal status.
pub fn all_terminal(job: &Job) -> bool {
    job.all_chunks_terminal()
}

/// Whether any chunk reached FAILED.
pub fn any_failed(job: &Job) -> bool {
    job.any_chunk_failed()
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn job_with_chunks(n: u64, chunk_size: u64) -> Job {
        let job_id = Uuid::new_v4();
        let mut chunks = Vec::new();
        let mut lo = 0;
        for _ in 0..n {
            chunks.push(Chunk::new(job_id, lo, lo + chunk_size - 1));
            lo += chunk_size;
        }
        Job {
            id: job_id,
            hash: "a".repeat(32),
            hash_type: "md5".to_string(),
            scheme_name: "israeli-mobile".to_string(),
            lo: 0,
            hi: n * chunk_size - 1,
            status: JobStatus::Pending,
            chunks,
            plaintext: None,
        }
    }

    #[test]
    fn next_pending_returns_first_pending_chunk() {
        let job = job_with_chunks(3, 10);
        assert_eq!(next_pending(&job), Some(job.chunks[0].id));
    }

    #[test]
    fn on_found_returns_first_found_only_once() {
        let mut job = job_with_chunks(2, 10);
        let first_id = job.chunks[0].id;
        assert!(on_found(&mut job, first_id, 5));
        job.status = JobStatus::Done;
        let second_id = job.chunks[1].id;
        assert!(!on_found(&mut job, second_id, 7));
    }

    #[test]
    fn on_error_retries_until_max_attempts_then_fails() {
        let mut job = job_with_chunks(1, 10);
        let chunk_id = job.chunks[0].id;
        assert!(on_error(&mut job, chunk_id, 0, 3));
        assert!(on_error(&mut job, chunk_id, 0, 3));
        assert!(!on_error(&mut job, chunk_id, 0, 3));
        assert_eq!(job.chunks[0].status, ChunkStatus::Failed);
        assert_eq!(job.chunks[0].attempts, 3);
    }

    #[test]
    fn idempotent_once_job_terminal() {
        let mut job = job_with_chunks(2, 10);
        job.status = JobStatus::Done;
        let chunk_id = job.chunks[0].id;
        on_not_found(&mut job, chunk_id, 9);
        assert_eq!(job.chunks[0].status, ChunkStatus::Pending);
    }

    #[test]
    fn all_terminal_and_any_failed_aggregate_correctly() {
        let mut job = job_with_chunks(2, 10);
        assert!(!all_terminal(&job));
        let first = job.chunks[0].id;
        let second = job.chunks[1].id;
        on_not_found(&mut job, first, 9);
        assert!(!all_terminal(&job));
        job.chunks[1].status = ChunkStatus::Failed;
        let _ = second;
        assert!(all_terminal(&job));
        assert!(any_failed(&job));
    }
}
