// Payment provider webhook ingress

use axum::response::Json;
use tracing::info;

use super::common::{ApiResponse, ApiResult};
use crate::signature::resource_id;
use crate::web::middleware::VerifiedWebhook;
use crate::web::WebhookAck;

/// Acknowledge a notification that passed the signature gate.
/// Domain processing of the event happens downstream.
pub async fn receive_payment_webhook(webhook: VerifiedWebhook) -> ApiResult<WebhookAck> {
    let resource_id = resource_id(&webhook.payload);
    let event_type = webhook
        .payload
        .get("type")
        .or_else(|| webhook.payload.get("action"))
        .and_then(|v| v.as_str())
        .unwrap_or("unknown");

    info!(
        request_id = %webhook.request_id,
        resource_id = %resource_id,
        signed = webhook.signed,
        "Accepted payment webhook ({})",
        event_type
    );

    Ok(Json(ApiResponse::success(WebhookAck {
        resource_id,
        request_id: webhook.request_id,
        signed: webhook.signed,
    })))
}
