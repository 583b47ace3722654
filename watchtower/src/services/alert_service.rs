// File: watchtower/src/services/alert_service.rs
use crate::constants::alerts;
use crate::errors::NotificationError;
use anyhow::Result;
use chrono::{DateTime, Utc};
use futures::future::BoxFuture;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, info};

/// Delivers an alert through an external channel.
///
/// Callers treat delivery as fire-and-forget: an `Err` is logged by the
/// caller and never propagated further.
pub trait AlertNotifier: Send + Sync {
    fn send_alert<'a>(&'a self, service: &'a str, message: &'a str) -> BoxFuture<'a, Result<()>>;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertPayload {
    pub timestamp: DateTime<Utc>,
    pub service: String,
    pub message: String,
    pub recipient: Option<String>,
}

/// Posts alerts as JSON to a notification gateway webhook.
#[derive(Clone)]
pub struct WebhookAlertNotifier {
    webhook_url: String,
    recipient: Option<String>,
    token: Option<String>,
    client: Client,
}

impl WebhookAlertNotifier {
    pub fn new(webhook_url: String, recipient: Option<String>, token: Option<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(alerts::WEBHOOK_TIMEOUT_SECONDS))
            .build()?;

        Ok(Self {
            webhook_url,
            recipient,
            token,
            client,
        })
    }

    pub fn is_enabled(&self) -> bool {
        !self.webhook_url.is_empty()
    }

    pub fn get_webhook_url(&self) -> &str {
        &self.webhook_url
    }

    async fn send_webhook(&self, payload: &AlertPayload) -> Result<()> {
        if !self.is_enabled() {
            debug!("No alert webhook URL configured, skipping alert for {}", payload.service);
            return Ok(());
        }

        let mut request = self.client.post(&self.webhook_url).json(payload);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        match timeout(
            Duration::from_secs(alerts::WEBHOOK_TIMEOUT_SECONDS),
            request.send(),
        )
        .await
        {
            Ok(Ok(response)) => {
                if response.status().is_success() {
                    info!("Alert sent successfully for {}", payload.service);
                    Ok(())
                } else {
                    Err(NotificationError::Rejected {
                        service: payload.service.clone(),
                        status: response.status().as_u16(),
                    }
                    .into())
                }
            }
            Ok(Err(e)) => Err(NotificationError::DeliveryFailed {
                service: payload.service.clone(),
                reason: e.to_string(),
            }
            .into()),
            Err(_) => Err(NotificationError::Timeout {
                service: payload.service.clone(),
            }
            .into()),
        }
    }
}

impl AlertNotifier for WebhookAlertNotifier {
    fn send_alert<'a>(&'a self, service: &'a str, message: &'a str) -> BoxFuture<'a, Result<()>> {
        Box::pin(async move {
            let payload = AlertPayload {
                timestamp: Utc::now(),
                service: service.to_string(),
                message: message.to_string(),
                recipient: self.recipient.clone(),
            };

            self.send_webhook(&payload).await
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_disabled_notifier_is_a_no_op() {
        let notifier = WebhookAlertNotifier::new(String::new(), None, None).unwrap();
        assert!(!notifier.is_enabled());
        assert!(notifier.send_alert("website", "down").await.is_ok());
    }

    #[tokio::test]
    async fn test_alert_is_posted_with_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/alerts"))
            .and(header("authorization", "Bearer gateway-token"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let notifier = WebhookAlertNotifier::new(
            format!("{}/alerts", server.uri()),
            Some("+5511999999999".to_string()),
            Some("gateway-token".to_string()),
        )
        .unwrap();

        notifier.send_alert("website", "HTTP 503").await.unwrap();

        let requests = server.received_requests().await.unwrap();
        let body: serde_json::Value = requests[0].body_json().unwrap();
        assert_eq!(body["service"], "website");
        assert_eq!(body["message"], "HTTP 503");
        assert_eq!(body["recipient"], "+5511999999999");
    }

    #[tokio::test]
    async fn test_rejected_delivery_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let notifier = WebhookAlertNotifier::new(server.uri(), None, None).unwrap();
        let err = notifier.send_alert("website", "down").await.unwrap_err();
        assert!(err.to_string().contains("500"));
    }
}
