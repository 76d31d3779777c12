//! HTTP/JSON wire types shared by the master's `WorkerClient` and the
//! worker's `/crack-range`, `/cancel-job`, `/health` handlers.

use serde::{Deserialize, Serialize};

/// Inclusive index range carried in a [`CrackRequest`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Range {
    /// Inclusive start index.
    pub start_index: u64,
    /// Inclusive end index.
    pub end_index: u64,
}

/// `POST /crack-range` request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrackRequest {
    /// 32-character lowercase hex MD5 digest.
    pub hash: String,
    /// Hash algorithm identifier; always `"md5"`.
    pub hash_type: String,
    /// Name of the password scheme to enumerate.
    pub password_scheme: String,
    /// Sub-range of the scheme's keyspace to search.
    pub range: Range,
    /// Job identifier, so the worker can key cancellation.
    pub job_id: String,
    /// Fresh identifier for this specific request (set by the caller).
    pub request_id: String,
}

/// Verdict carried by a [`CrackResponse`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Verdict {
    /// The plaintext was found within the dispatched range.
    Found,
    /// The range was exhausted without a match.
    NotFound,
    /// The request was abandoned because its job was cancelled mid-flight.
    Cancelled,
    /// A worker-side runtime error occurred while searching.
    Error,
    /// The request itself was malformed (bad hash, unknown scheme, out-of-bounds range).
    InvalidInput,
}

/// `POST /crack-range` response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrackResponse {
    /// Outcome of the search.
    pub status: Verdict,
    /// Recovered plaintext; non-null iff `status == Found`.
    pub found_password: Option<String>,
    /// The matching index on FOUND, the final scanned index on NOT_FOUND,
    /// the last observed index on CANCELLED, or the resumption hint
    /// (the caller's `start_index`) on ERROR. Always set.
    pub last_index_processed: u64,
    /// Human-readable detail, set on ERROR/INVALID_INPUT.
    pub error_message: Option<String>,
}

impl CrackResponse {
    /// Build a FOUND response.
    pub fn found(password: String, at_index: u64) -> Self {
        Self {
            status: Verdict::Found,
            found_password: Some(password),
            last_index_processed: at_index,
            error_message: None,
        }
    }

    /// Build a NOT_FOUND response after scanning through `last_index`.
    pub fn not_found(last_index: u64) -> Self {
        Self {
            status: Verdict::NotFound,
            found_password: None,
            last_index_processed: last_index,
            error_message: None,
        }
    }

    /// Build a CANCELLED response, observed at `last_index`.
    pub fn cancelled(last_index: u64) -> Self {
        Self {
            status: Verdict::Cancelled,
            found_password: None,
            last_index_processed: last_index,
            error_message: None,
        }
    }

    /// Build an ERROR response with a resumption hint of `resume_from`.
    pub fn error(message: impl Into<String>, resume_from: u64) -> Self {
        Self {
            status: Verdict::Error,
            found_password: None,
            last_index_processed: resume_from,
            error_message: Some(message.into()),
        }
    }

    /// Build an INVALID_INPUT response.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self {
            status: Verdict::InvalidInput,
            found_password: None,
            last_index_processed: 0,
            error_message: Some(message.into()),
        }
    }
}

/// `POST /cancel-job` request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CancelRequest {
    /// Job identifier to cancel.
    pub job_id: String,
}

/// `POST /cancel-job` response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CancelResponse {
    /// `"OK"` or `"ERROR"`.
    pub status: String,
    /// Error detail, set iff `status == "ERROR"`.
    pub error: Option<String>,
}

impl CancelResponse {
    /// A successful cancel acknowledgement.
    pub fn ok() -> Self {
        Self {
            status: "OK".to_string(),
            error: None,
        }
    }
}

/// `GET /health` response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always `"ok"` when the process is reachable.
    pub status: String,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "ok".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verdict_serializes_screaming_snake_case() {
        let json = serde_json::to_string(&Verdict::NotFound).unwrap();
        assert_eq!(json, "\"NOT_FOUND\"");
    }

    #[test]
    fn found_response_round_trips() {
        let resp = CrackResponse::found("050-0000000".to_string(), 42);
        let json = serde_json::to_string(&resp).unwrap();
        let back: CrackResponse = serde_json::from_str(&json).unwrap();
        assert_eq!(back.status, Verdict::Found);
        assert_eq!(back.found_password.as_deref(), Some("050-0000000"));
        assert_eq!(back.last_index_processed, 42);
    }
}
