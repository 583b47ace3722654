// File: watchtower/src/web/mod.rs
pub mod handlers;
pub mod middleware;
pub mod server;

pub use server::{create_router, start_web_server};

use serde::Serialize;
use std::sync::Arc;

use crate::config::Config;
use crate::health::HealthMonitor;
use crate::log_store::LogStore;
use crate::scheduler::{JobRunRecord, SyncJob};
use crate::signature::SignatureVerifier;

// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub log_store: Arc<LogStore>,
    pub health_monitor: Arc<HealthMonitor>,
    pub sync_job: SyncJob,
    pub verifier: Arc<SignatureVerifier>,
}

impl AppState {
    pub fn new(
        config: Arc<Config>,
        log_store: Arc<LogStore>,
        health_monitor: Arc<HealthMonitor>,
        sync_job: SyncJob,
        verifier: Arc<SignatureVerifier>,
    ) -> Self {
        Self {
            config,
            log_store,
            health_monitor,
            sync_job,
            verifier,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SyncJobStatus {
    pub running: bool,
    pub last_run: Option<JobRunRecord>,
}

#[derive(Debug, Clone, Serialize)]
pub struct WebhookAck {
    pub resource_id: String,
    pub request_id: String,
    pub signed: bool,
}
