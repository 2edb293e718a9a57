//! Handlers that enqueue background collection runs.

use axum::{Json, extract::State};
use serde_json::json;
use tokio::sync::mpsc::error::TrySendError;
use validator::Validate;

use crate::api::dto::collect::{CollectAllRequest, CollectBatchRequest, EnqueuedResponse};
use crate::application::services::{DEFAULT_ALL_LIMIT, DEFAULT_BATCH_LIMIT};
use crate::domain::collect_job::CollectJob;
use crate::domain::entities::MerchantConfig;
use crate::error::AppError;
use crate::state::AppState;

/// Queues a run over every built-in merchant.
///
/// # Endpoint
///
/// `POST /collect_mirrors_all_async`
///
/// # Request Body
///
/// ```json
/// { "limit": 50 }
/// ```
///
/// Returns `{"ok": true}` as soon as the job is queued; the run summary is
/// only logged.
///
/// # Errors
///
/// - 400 Bad Request if `limit` is out of range
/// - 503 Service Unavailable if the queue is full or the worker stopped
pub async fn collect_all_handler(
    State(state): State<AppState>,
    Json(payload): Json<CollectAllRequest>,
) -> Result<Json<EnqueuedResponse>, AppError> {
    payload.validate()?;

    let limit = payload.limit.unwrap_or(DEFAULT_ALL_LIMIT);
    enqueue(&state, CollectJob::All { limit })?;

    Ok(Json(EnqueuedResponse { ok: true }))
}

/// Queues a run over the merchants in the request.
///
/// # Endpoint
///
/// `POST /collect_mirrors_batch`
///
/// # Request Body
///
/// ```json
/// {
///   "items": [
///     { "merchant": "stake", "keywords": ["stake casino"], "country": "in" }
///   ],
///   "limit": 10,
///   "follow_redirects": true,
///   "interactive": false
/// }
/// ```
///
/// # Errors
///
/// - 400 Bad Request on validation failure
/// - 503 Service Unavailable if the queue is full or the worker stopped
pub async fn collect_batch_handler(
    State(state): State<AppState>,
    Json(payload): Json<CollectBatchRequest>,
) -> Result<Json<EnqueuedResponse>, AppError> {
    payload.validate()?;

    let strategy = payload.strategy();
    let job = CollectJob::Batch {
        configs: payload.items.into_iter().map(MerchantConfig::from).collect(),
        limit: payload.limit.unwrap_or(DEFAULT_BATCH_LIMIT),
        strategy,
    };
    enqueue(&state, job)?;

    Ok(Json(EnqueuedResponse { ok: true }))
}

fn enqueue(state: &AppState, job: CollectJob) -> Result<(), AppError> {
    let kind = job.kind();
    match state.job_sender.try_send(job) {
        Ok(()) => {
            tracing::info!(job = kind, "Collect job queued");
            Ok(())
        }
        Err(TrySendError::Full(_)) => {
            tracing::warn!(job = kind, "Collect queue is full");
            Err(AppError::unavailable(
                "Collect queue is full, retry later",
                json!({ "job": kind }),
            ))
        }
        Err(TrySendError::Closed(_)) => {
            tracing::error!(job = kind, "Collect worker is not running");
            Err(AppError::unavailable(
                "Collect worker is not running",
                json!({ "job": kind }),
            ))
        }
    }
}
