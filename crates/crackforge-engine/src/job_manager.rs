use std::sync::Arc;

use crackforge_core::{Chunk, Job, JobStatus};
use uuid::Uuid;

use crate::cache::CrackedCache;
use crate::error::EngineError;

/// Creates jobs, partitioning keyspace into gap-free chunks, and folds
/// terminal transitions back into the shared [`CrackedCache`].
pub struct JobManager {
    cache: Arc<CrackedCache>,
    chunk_size: u64,
}

impl JobManager {
    /// A manager over `cache`, partitioning new jobs' keyspace into chunks
    /// of at most `chunk_size`.
    pub fn new(cache: Arc<CrackedCache>, chunk_size: u64) -> Self {
        Self { cache, chunk_size }
    }

    /// Case-fold `hash`, consult the cache, and either return an
    /// already-DONE job (cache hit, no chunks, no worker call ever needed)
    /// or a PENDING job partitioned into chunks over the scheme's bounds.
    pub fn create(&self, hash: &str, scheme_name: &str) -> Result<Job, EngineError> {
        let hash = crackforge_core::normalize_hash(hash)?;
        let id = Uuid::new_v4();

        if let Some(plaintext) = self.cache.get(&hash) {
            return Ok(Job {
                id,
                hash,
                hash_type: "md5".to_string(),
                scheme_name: scheme_name.to_string(),
                lo: 0,
                hi: 0,
                status: JobStatus::Done,
                chunks: Vec::new(),
                plaintext: Some(plaintext),
            });
        }

        let scheme = crackforge_scheme::scheme_by_name(scheme_name)?;
        let (lo, hi) = scheme.bounds();
        let chunks = partition(id, lo, hi, self.chunk_size);

        Ok(Job {
            id,
            hash,
            hash_type: "md5".to_string(),
            scheme_name: scheme_name.to_string(),
            lo,
            hi,
            status: JobStatus::Pending,
            chunks,
            plaintext: None,
        })
    }

    /// Mark `job` DONE. If `plaintext` is set, cache it (NOT_FOUND is never
    /// cached by construction; callers pass `None` for that case).
    pub fn mark_done(&self, job: &mut Job, plaintext: Option<String>) {
        job.status = JobStatus::Done;
        if let Some(ref p) = plaintext {
            self.cache.put(&job.hash, p.clone());
        }
        job.plaintext = plaintext;
    }

    /// Mark `job` FAILED.
    pub fn mark_failed(&self, job: &mut Job) {
        job.status = JobStatus::Failed;
    }
}

fn partition(job_id: Uuid, lo: u64, hi: u64, chunk_size: u64) -> Vec<Chunk> {
    let chunk_size = chunk_size.max(1);
    let mut chunks = Vec::new();
    let mut start = lo;
    while start <= hi {
        let end = (start + chunk_size - 1).min(hi);
        chunks.push(Chunk::new(job_id, start, end));
        if end == hi {
            break;
        }
        start = end + 1;
    }
    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cache_hit_yields_chunkless_done_job() {
        let cache = Arc::new(CrackedCache::new());
        let hash = crackforge_core::md5_hex("050-0000000");
        cache.put(&hash, "050-0000000".to_string());
        let manager = JobManager::new(cache.clone(), 100_000);
        let job = manager.create(&hash, "israeli-mobile").unwrap();
        assert_eq!(job.status, JobStatus::Done);
        assert!(job.chunks.is_empty());
        assert_eq!(job.plaintext.as_deref(), Some("050-0000000"));
    }

    #[test]
    fn cache_miss_partitions_keyspace_exactly() {
        let cache = Arc::new(CrackedCache::new());
        let manager = JobManager::new(cache.clone(), 30);
        let job = manager.create(&"a".repeat(32), "israeli-mobile").unwrap();
        assert_eq!(job.chunks.first().unwrap().lo, 0);
        assert_eq!(job.chunks.last().unwrap().hi, 99_999_999);
        for w in job.chunks.windows(2) {
            assert_eq!(w[1].lo, w[0].hi + 1);
        }
        for chunk in &job.chunks[..job.chunks.len() - 1] {
            assert_eq!(chunk.hi - chunk.lo + 1, 30);
        }
        let last = job.chunks.last().unwrap();
        assert!(last.hi - last.lo + 1 <= 30);
    }

    #[test]
    fn zero_chunk_size_does_not_underflow_and_still_covers_range() {
        let job_id = Uuid::new_v4();
        let chunks = partition(job_id, 0, 9, 0);
        assert_eq!(chunks.first().unwrap().lo, 0);
        assert_eq!(chunks.last().unwrap().hi, 9);
        for w in chunks.windows(2) {
            assert_eq!(w[1].lo, w[0].hi + 1);
        }
        for chunk in &chunks {
            assert!(chunk.hi >= chunk.lo);
        }
    }

    #[test]
    fn unknown_scheme_is_rejected() {
        let cache = Arc::new(CrackedCache::new());
        let manager = JobManager::new(cache.clone(), 100);
        assert!(manager.create(&"a".repeat(32), "no-such-scheme").is_err());
    }

    #[test]
    fn mark_done_caches_plaintext_but_not_not_found() {
        let cache = Arc::new(CrackedCache::new());
        let manager = JobManager::new(cache.clone(), 100);
        let mut job = manager.create(&"b".repeat(32), "israeli-mobile").unwrap();
        manager.mark_done(&mut job, None);
        assert_eq!(cache.get(&"b".repeat(32)), None);

        let mut job2 = manager.create(&"c".repeat(32), "israeli-mobile").unwrap();
        manager.mark_done(&mut job2, Some("050-1111111".to_string()));
        assert_eq!(cache.get(&"c".repeat(32)).as_deref(), Some("050-1111111"));
    }
}
