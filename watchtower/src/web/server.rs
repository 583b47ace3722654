// File: watchtower/src/web/server.rs
use crate::web::{handlers, AppState};
use anyhow::Result;
use axum::{
    routing::{get, post},
    Router,
};
use std::future::Future;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub async fn start_web_server<F>(state: AppState, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = create_router(state.clone());
    let addr = format!("{}:{}", state.config.host, state.config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server running on http://{}", addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;
    Ok(())
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(handlers::liveness))
        // === HEALTH MONITORING ROUTES ===
        .route("/api/health/logs", get(handlers::get_health_logs))
        .route("/api/health/refresh", post(handlers::refresh_health))
        // === SYNC JOB ROUTES ===
        .route("/api/jobs/sync/status", get(handlers::get_sync_status))
        .route("/api/jobs/sync/run", post(handlers::run_sync_job))
        // === WEBHOOK ROUTES ===
        .route(
            "/api/webhooks/payments",
            post(handlers::receive_payment_webhook),
        )
        // Add middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
