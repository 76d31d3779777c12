use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

/// One row of the output JSON object, keyed by hash.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputEntry {
    /// Recovered plaintext, set iff `status == "FOUND"`.
    pub cracked_password: Option<String>,
    /// One of `FOUND`, `NOT_FOUND`, `FAILED`, `INVALID_INPUT`.
    pub status: String,
    /// The job that produced this row.
    pub job_id: String,
}

/// Serializes stdout lines and JSON-file read-modify-writes across every
/// concurrently-processed job behind a single shared mutex. The file write
/// itself always runs on the blocking pool so a slow disk never stalls a
/// scheduler's event loop.
pub struct OutputWriter {
    path: PathBuf,
    lock: Mutex<()>,
}

impl OutputWriter {
    /// Open (truncating) the output file at `path`, creating parent
    /// directories as needed. Called once at driver startup, before any
    /// input line is read; later `record` calls never truncate, so rows
    /// emitted for INVALID_INPUT lines during input validation survive
    /// every subsequent job's read-modify-write.
    pub async fn new(path: impl Into<PathBuf>) -> io::Result<Self> {
        let path = path.into();
        let write_path = path.clone();
        tokio::task::spawn_blocking(move || {
            if let Some(parent) = write_path.parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)?;
                }
            }
            atomic_write(&write_path, "{}")
        })
        .await
        .expect("output writer init task panicked")?;
        Ok(Self {
            path,
            lock: Mutex::new(()),
        })
    }

    /// Print the per-hash stdout line, then read-modify-write the JSON file
    /// under the shared mutex. The stdout line is always printed even if
    /// the file write subsequently fails: a failed write never crashes the
    /// scheduler and must not suppress the stdout line.
    pub async fn emit(&self, hash: &str, token: &str, job_id: &str, entry: OutputEntry) {
        println!("{hash} {token} {job_id}");
        if let Err(err) = self.record(hash, entry).await {
            tracing::warn!(%hash, %job_id, error = %err, "failed to persist output file entry");
        }
    }

    /// Read-modify-write the JSON object at `self.path`, setting `hash`'s
    /// entry to `entry`, under the shared mutex.
    async fn record(&self, hash: &str, entry: OutputEntry) -> io::Result<()> {
        let _guard = self.lock.lock().await;
        let path = self.path.clone();
        let hash = hash.to_string();
        tokio::task::spawn_blocking(move || {
            let mut rows = read_rows(&path)?;
            rows.insert(hash, entry);
            let body = serde_json::to_string_pretty(&rows)?;
            atomic_write(&path, &body)
        })
        .await
        .expect("output writer record task panicked")
    }
}

fn read_rows(path: &Path) -> io::Result<BTreeMap<String, OutputEntry>> {
    match std::fs::read_to_string(path) {
        Ok(body) if !body.trim().is_empty() => {
            Ok(serde_json::from_str(&body).unwrap_or_default())
        }
        _ => Ok(BTreeMap::new()),
    }
}

fn atomic_write(path: &Path, contents: &str) -> io::Result<()> {
    let tmp_path = path.with_extension("tmp");
    std::fs::write(&tmp_path, contents)?;
    std::fs::rename(&tmp_path, path)
}
