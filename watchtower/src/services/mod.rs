// File: watchtower/src/services/mod.rs

pub mod alert_service;
pub mod sync_pipeline;

pub use alert_service::{AlertNotifier, AlertPayload, WebhookAlertNotifier};
pub use sync_pipeline::{
    HttpSyncPipeline, RecurringPaymentSummary, SubscriptionSyncSummary, SyncPipeline,
};
