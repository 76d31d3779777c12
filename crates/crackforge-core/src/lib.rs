//! Shared domain types and wire protocol for the crackforge distributed
//! MD5 cracker: the `Job`/`Chunk` data model, hash validation helpers,
//! and the HTTP request/response bodies exchanged with workers.

mod chunk;
mod error;
mod hash;
mod job;
pub mod protocol;

pub use chunk::{Chunk, ChunkId, ChunkStatus};
pub use error::CoreError;
pub use hash::{md5_hex, normalize_hash, HASH_LEN};
pub use job::{Job, JobId, JobStatus};
