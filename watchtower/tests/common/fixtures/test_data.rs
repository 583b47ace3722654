//! Common test data and constants

use watchtower::services::{RecurringPaymentSummary, SubscriptionSyncSummary};

/// Common test service names
pub mod services {
    pub const WEBSITE: &str = "website";
    pub const PAYMENTS_API: &str = "payments-api";
    pub const BILLING: &str = "billing";
}

/// Reference webhook signature vector
pub mod signing {
    pub const SECRET: &str = "s3cr3t";
    pub const RESOURCE_ID: &str = "123";
    pub const REQUEST_ID: &str = "abc";
    pub const TIMESTAMP: &str = "1700000000";
    pub const ADMIN_KEY: &str = "admin-test-key";

    /// HMAC-SHA256 of "123abc1700000000" keyed with "s3cr3t", computed
    /// outside this crate
    pub const EXPECTED_HASH: &str =
        "fc7e6f6c1e229302265f352fc34437e5a106d8df7a6405dedd84a1f78e166fe6";

    /// Signature header for the reference vector
    pub fn header() -> String {
        format!("ts={},v1={}", TIMESTAMP, EXPECTED_HASH)
    }

    pub fn payload() -> serde_json::Value {
        serde_json::json!({
            "type": "payment",
            "data": { "id": RESOURCE_ID }
        })
    }
}

/// Stage summaries used across sync job tests
pub mod summaries {
    use super::*;

    pub fn subscriptions() -> SubscriptionSyncSummary {
        SubscriptionSyncSummary {
            synced: 8,
            errors: 2,
            total: 10,
        }
    }

    pub fn payments() -> RecurringPaymentSummary {
        RecurringPaymentSummary {
            processed: 5,
            leads_added: 3,
            total: 5,
        }
    }
}
