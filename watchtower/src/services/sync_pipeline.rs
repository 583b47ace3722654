// File: watchtower/src/services/sync_pipeline.rs
use crate::constants::http;
use crate::errors::ConfigError;
use anyhow::{anyhow, Context, Result};
use futures::future::BoxFuture;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SubscriptionSyncSummary {
    pub synced: u64,
    pub errors: u64,
    pub total: u64,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RecurringPaymentSummary {
    pub processed: u64,
    pub leads_added: u64,
    pub total: u64,
}

/// The two stages of the daily sync. Implementations own the actual
/// provider calls; the scheduler only consumes the summaries.
pub trait SyncPipeline: Send + Sync {
    fn sync_all_subscriptions(&self) -> BoxFuture<'_, Result<SubscriptionSyncSummary>>;
    fn process_recurring_payments(&self) -> BoxFuture<'_, Result<RecurringPaymentSummary>>;
}

/// Drives both stages through the billing backend's HTTP endpoints.
pub struct HttpSyncPipeline {
    base_url: Option<String>,
    api_key: Option<String>,
    client: Client,
}

impl HttpSyncPipeline {
    pub fn new(base_url: Option<String>, api_key: Option<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(http::SYNC_STAGE_TIMEOUT)
            .connect_timeout(http::CONNECT_TIMEOUT)
            .build()?;

        Ok(Self {
            base_url: base_url.map(|url| url.trim_end_matches('/').to_string()),
            api_key,
            client,
        })
    }

    #[instrument(skip(self))]
    async fn post_stage<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T> {
        let base_url = self.base_url.as_ref().ok_or_else(|| ConfigError::MissingRequired {
            field: "sync.base_url".to_string(),
        })?;
        let url = format!("{}{}", base_url, endpoint);

        let mut request = self.client.post(&url);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .with_context(|| format!("Request to {} failed", url))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow!("{} returned HTTP {}: {}", url, status.as_u16(), body));
        }

        let summary = response
            .json::<T>()
            .await
            .with_context(|| format!("Invalid summary returned by {}", url))?;

        debug!("Stage endpoint {} answered", url);
        Ok(summary)
    }
}

impl SyncPipeline for HttpSyncPipeline {
    fn sync_all_subscriptions(&self) -> BoxFuture<'_, Result<SubscriptionSyncSummary>> {
        Box::pin(self.post_stage("/sync/subscriptions"))
    }

    fn process_recurring_payments(&self) -> BoxFuture<'_, Result<RecurringPaymentSummary>> {
        Box::pin(self.post_stage("/sync/recurring-payments"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_stage_summaries_are_decoded() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/sync/subscriptions"))
            .and(header("authorization", "Bearer billing-key"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"synced": 8, "errors": 2, "total": 10})),
            )
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/sync/recurring-payments"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"processed": 5, "leadsAdded": 3, "total": 5})),
            )
            .mount(&server)
            .await;

        let pipeline =
            HttpSyncPipeline::new(Some(format!("{}/", server.uri())), Some("billing-key".into()))
                .unwrap();

        assert_eq!(
            pipeline.sync_all_subscriptions().await.unwrap(),
            SubscriptionSyncSummary {
                synced: 8,
                errors: 2,
                total: 10
            }
        );
        assert_eq!(
            pipeline.process_recurring_payments().await.unwrap(),
            RecurringPaymentSummary {
                processed: 5,
                leads_added: 3,
                total: 5
            }
        );
    }

    #[tokio::test]
    async fn test_missing_base_url_fails_the_stage() {
        let pipeline = HttpSyncPipeline::new(None, None).unwrap();
        let err = pipeline.sync_all_subscriptions().await.unwrap_err();
        assert!(err.to_string().contains("sync.base_url"));
    }

    #[tokio::test]
    async fn test_server_error_fails_the_stage() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
            .mount(&server)
            .await;

        let pipeline = HttpSyncPipeline::new(Some(server.uri()), None).unwrap();
        let err = pipeline.process_recurring_payments().await.unwrap_err();
        assert!(err.to_string().contains("502"));
    }
}
