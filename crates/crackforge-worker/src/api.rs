//! HTTP surface for the worker process: `POST /crack-range`,
//! `POST /cancel-job`, `GET /health`. Handlers are thin: decode,
//! hand off to the executor on the blocking pool (the search is CPU-bound
//! and must not starve the async runtime), encode the response.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};

use crackforge_core::protocol::{CancelRequest, CancelResponse, CrackRequest, CrackResponse, HealthResponse};

use crate::cancellation::CancellationRegistry;
use crate::config::WorkerConfig;
use crate::executor::{self, ExecutorOutcome};

/// Shared state for every in-flight request handler in this process.
pub struct AppState {
    pub cancellation: CancellationRegistry,
    pub config: WorkerConfig,
}

/// Build the router exposing the three worker endpoints over `state`.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/crack-range", post(crack_range))
        .route("/cancel-job", post(cancel_job))
        .with_state(state)
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse::default())
}

async fn crack_range(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CrackRequest>,
) -> Response {
    let span = tracing::info_span!(
        "crack_range",
        job_id = %req.job_id,
        request_id = %req.request_id,
        lo = req.range.start_index,
        hi = req.range.end_index,
    );
    let _enter = span.enter();
    tracing::debug!("dispatch received");

    let outcome = tokio::task::spawn_blocking(move || {
        executor::crack(
            &req.hash,
            &req.password_scheme,
            req.range.start_index,
            req.range.end_index,
            &req.job_id,
            &state.cancellation,
            &state.config,
        )
    })
    .await;

    let outcome = match outcome {
        Ok(outcome) => outcome,
        Err(join_err) => {
            tracing::error!(error = %join_err, "executor task panicked");
            return (
                StatusCode::OK,
                Json(CrackResponse::error(format!("executor panicked: {join_err}"), 0)),
            )
                .into_response();
        }
    };

    let response = match outcome {
        ExecutorOutcome::Found {
            plaintext,
            last_index_processed,
        } => {
            tracing::info!(%plaintext, last_index_processed, "FOUND");
            CrackResponse::found(plaintext, last_index_processed)
        }
        ExecutorOutcome::NotFound { last_index_processed } => {
            CrackResponse::not_found(last_index_processed)
        }
        ExecutorOutcome::Cancelled { last_index_processed } => {
            tracing::debug!(last_index_processed, "CANCELLED");
            CrackResponse::cancelled(last_index_processed)
        }
        ExecutorOutcome::Error {
            message,
            last_index_processed,
        } => {
            tracing::warn!(%message, "ERROR");
            CrackResponse::error(message, last_index_processed)
        }
        ExecutorOutcome::InvalidInput { message } => {
            tracing::warn!(%message, "INVALID_INPUT");
            return (StatusCode::OK, Json(CrackResponse::invalid_input(message))).into_response();
        }
    };

    (StatusCode::OK, Json(response)).into_response()
}

async fn cancel_job(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CancelRequest>,
) -> Json<CancelResponse> {
    tracing::debug!(job_id = %req.job_id, "cancel-job received");
    state.cancellation.cancel(&req.job_id);
    Json(CancelResponse::ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    fn state() -> Arc<AppState> {
        Arc::new(AppState {
            cancellation: CancellationRegistry::new(),
            config: WorkerConfig::default(),
        })
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let app = router(state());
        let resp = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn crack_range_reports_not_found_for_unmatched_range() {
        let app = router(state());
        let req = CrackRequest {
            hash: "f".repeat(32),
            hash_type: "md5".to_string(),
            password_scheme: "israeli-mobile".to_string(),
            range: crackforge_core::protocol::Range {
                start_index: 0,
                end_index: 99,
            },
            job_id: "job-1".to_string(),
            request_id: "req-1".to_string(),
        };
        let body = serde_json::to_vec(&req).unwrap();
        let resp = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/crack-range")
                    .header("content-type", "application/json")
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let parsed: CrackResponse = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(parsed.status, crackforge_core::protocol::Verdict::NotFound);
    }

    #[tokio::test]
    async fn cancel_job_is_idempotent() {
        let state = state();
        let app = router(state.clone());
        let req = CancelRequest {
            job_id: "job-9".to_string(),
        };
        let body = serde_json::to_vec(&req).unwrap();
        for _ in 0..2 {
            let resp = app
                .clone()
                .oneshot(
                    Request::builder()
                        .method("POST")
                        .uri("/cancel-job")
                        .header("content-type", "application/json")
                        .body(Body::from(body.clone()))
                        .unwrap(),
                )
                .await
                .unwrap();
            assert_eq!(resp.status(), StatusCode::OK);
        }
        assert!(state.cancellation.is_cancelled("job-9"));
    }
}
