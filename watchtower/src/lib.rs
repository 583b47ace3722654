pub mod config;
pub mod constants;
pub mod errors;
pub mod health;
pub mod log_store;
pub mod scheduler;
pub mod services;
pub mod signature;
pub mod web;

// Re-export commonly used types
pub use config::{Config, ConfigManager};
pub use health::HealthMonitor;
pub use log_store::LogStore;
pub use scheduler::{SyncJob, SyncJobScheduler};
pub use services::{AlertNotifier, SyncPipeline, WebhookAlertNotifier};
pub use signature::SignatureVerifier;
