// Sync job endpoints

use axum::{extract::State, http::StatusCode, response::Json};
use tracing::{info, warn};

use super::common::{api_error, ApiResponse, ApiResult};
use crate::scheduler::{JobRunOutcome, JobRunRecord, RunTrigger};
use crate::web::middleware::AdminAuth;
use crate::web::{AppState, SyncJobStatus};

/// Whether a run is in progress and how the last one ended
pub async fn get_sync_status(
    _auth: AdminAuth,
    State(state): State<AppState>,
) -> ApiResult<SyncJobStatus> {
    Ok(Json(ApiResponse::success(SyncJobStatus {
        running: state.sync_job.is_running(),
        last_run: state.sync_job.last_run().await,
    })))
}

/// Operator-triggered run; goes through the same guard as the cron trigger
pub async fn run_sync_job(
    _auth: AdminAuth,
    State(state): State<AppState>,
) -> ApiResult<JobRunRecord> {
    info!("Manual sync run requested");

    match state.sync_job.run(RunTrigger::Manual).await {
        JobRunOutcome::Completed(record) => Ok(Json(ApiResponse::success(record))),
        JobRunOutcome::Skipped => {
            warn!("Manual sync run rejected, a run is already in progress");
            Err(api_error(
                StatusCode::CONFLICT,
                "Sync job is already running",
            ))
        }
    }
}
