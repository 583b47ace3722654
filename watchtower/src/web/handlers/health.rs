// Health monitoring endpoints

use axum::{extract::State, response::Json};
use serde_json::{json, Value};
use tracing::{debug, info};

use super::common::{ApiResponse, ApiResult};
use crate::health::HealthCheckResult;
use crate::log_store::LogEntry;
use crate::web::middleware::AdminAuth;
use crate::web::AppState;

/// Latest status per service, most recent first (dashboard feed)
pub async fn get_health_logs(
    _auth: AdminAuth,
    State(state): State<AppState>,
) -> ApiResult<Vec<LogEntry>> {
    if state.log_store.is_empty().await {
        debug!("Log feed requested before the first health check finished");
    }
    Ok(Json(ApiResponse::success(state.log_store.get().await)))
}

/// Run a health check cycle now (for the refresh button)
pub async fn refresh_health(
    _auth: AdminAuth,
    State(state): State<AppState>,
) -> ApiResult<Vec<HealthCheckResult>> {
    info!("Manual health check refresh requested");
    let results = state.health_monitor.perform_check().await;
    Ok(Json(ApiResponse::success(results)))
}

/// Process liveness, no auth
pub async fn liveness() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
