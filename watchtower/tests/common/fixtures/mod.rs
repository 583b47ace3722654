//! This module provides reusable test utilities:
//! - Scripted sync pipeline
//! - Recording and failing alert notifiers
//! - Static, slow and panicking health probes
//! - Mock alert webhook server
//! - Common test data

// Allow unused code in test fixtures - not every test binary uses every helper
#![allow(dead_code)]
#![allow(unused_imports)]

pub mod mock_notifier;
pub mod mock_pipeline;
pub mod mock_probes;
pub mod mock_webhook;
pub mod test_data;

// Re-export commonly used items
pub use mock_notifier::{FailingNotifier, RecordingNotifier};
pub use mock_pipeline::{MockSyncPipeline, StageBehavior};
pub use mock_probes::{PanickingProbe, SlowProbe, StaticProbe};
pub use mock_webhook::MockWebhookServer;
pub use test_data::*;
