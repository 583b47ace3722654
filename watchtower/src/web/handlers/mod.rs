//! HTTP request handlers.
//!
//! This module is organized by domain:
//! - `common` - Response envelope shared by every endpoint
//! - `health` - Dashboard log feed and manual health refresh
//! - `jobs` - Sync job status and manual runs
//! - `webhooks` - Signed payment provider notifications

pub mod common;
pub mod health;
pub mod jobs;
pub mod webhooks;

pub use health::*;
pub use jobs::*;
pub use webhooks::*;
