//! Mock webhook server for testing alert delivery
//!
//! This simulates the notification gateway that receives alerts,
//! allowing tests to verify alerts are sent correctly.

use serde_json::Value;
use wiremock::{
    matchers::{method, path},
    Mock, MockServer, ResponseTemplate,
};

/// Captured webhook request
#[derive(Debug, Clone)]
pub struct WebhookRequest {
    pub body: Value,
    pub authorization: Option<String>,
}

/// Mock gateway that records alert requests
pub struct MockWebhookServer {
    pub server: MockServer,
    pub base_url: String,
}

impl MockWebhookServer {
    /// Create a new mock webhook server
    pub async fn start() -> Self {
        let server = MockServer::start().await;
        let base_url = server.uri();
        Self { server, base_url }
    }

    /// Mock successful webhook delivery
    pub async fn mock_success(&self) {
        Mock::given(method("POST"))
            .and(path("/webhook"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&self.server)
            .await;
    }

    /// Mock webhook failure
    pub async fn mock_failure(&self, status_code: u16) {
        Mock::given(method("POST"))
            .and(path("/webhook"))
            .respond_with(ResponseTemplate::new(status_code))
            .mount(&self.server)
            .await;
    }

    /// Get all captured webhook requests
    pub async fn get_captured_requests(&self) -> Vec<WebhookRequest> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .into_iter()
            .filter_map(|req| {
                let authorization = req
                    .headers
                    .get("authorization")
                    .and_then(|v| v.to_str().ok())
                    .map(str::to_string);
                req.body_json::<Value>().ok().map(|body| WebhookRequest {
                    body,
                    authorization,
                })
            })
            .collect()
    }

    /// Get the number of webhook requests received
    pub async fn request_count(&self) -> usize {
        self.get_captured_requests().await.len()
    }

    /// Get the webhook URL
    pub fn webhook_url(&self) -> String {
        format!("{}/webhook", self.base_url)
    }

    /// Verify specific alert was sent
    pub async fn assert_alert_sent(&self, service: &str, message_contains: &str) -> bool {
        let requests = self.get_captured_requests().await;
        requests.iter().any(|req| {
            let service_matches = req
                .body
                .get("service")
                .and_then(|v| v.as_str())
                .map(|v| v == service)
                .unwrap_or(false);

            let message_matches = req
                .body
                .get("message")
                .and_then(|v| v.as_str())
                .map(|v| v.contains(message_contains))
                .unwrap_or(false);

            service_matches && message_matches
        })
    }
}
