//! Request extractors for the web server
//!
//! Provides admin authentication and the webhook signature gate.

use axum::{
    body::Bytes,
    extract::{FromRequest, FromRequestParts, Request},
    http::{request::Parts, HeaderMap, StatusCode},
};
use serde_json::Value;
use tracing::warn;

use crate::constants::webhooks::{REQUEST_ID_HEADER, SIGNATURE_HEADER};
use crate::web::handlers::common::{api_error, ApiError};
use crate::web::AppState;

/// Extractor that validates the admin key from the Authorization header.
/// Requests are refused when no admin key is configured.
///
/// # Example
/// ```ignore
/// async fn my_handler(
///     _auth: AdminAuth,  // This validates the admin key
///     State(state): State<AppState>,
/// ) -> ApiResult<()> {
///     // Handler logic here - caller is already authenticated
/// }
/// ```
pub struct AdminAuth;

impl FromRequestParts<AppState> for AdminAuth {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.strip_prefix("Bearer "));

        match (token, state.config.secrets.admin_api_key.as_deref()) {
            (Some(token), Some(expected)) if token == expected => Ok(AdminAuth),
            _ => Err(api_error(StatusCode::UNAUTHORIZED, "Unauthorized")),
        }
    }
}

/// A webhook body that passed signature verification.
///
/// `signed` is false only for unsigned requests let through by the
/// development bypass.
pub struct VerifiedWebhook {
    pub payload: Value,
    pub request_id: String,
    pub signed: bool,
}

fn header_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

impl FromRequest<AppState> for VerifiedWebhook {
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &AppState) -> Result<Self, Self::Rejection> {
        let signature = header_value(req.headers(), SIGNATURE_HEADER);
        let request_id = header_value(req.headers(), REQUEST_ID_HEADER).unwrap_or_default();

        if signature.is_none() && !state.config.unsigned_webhooks_allowed() {
            warn!(request_id = %request_id, "Rejected webhook without signature header");
            return Err(api_error(StatusCode::UNAUTHORIZED, "Unauthorized"));
        }

        let body = Bytes::from_request(req, state)
            .await
            .map_err(|e| api_error(StatusCode::BAD_REQUEST, e.body_text()))?;
        let payload: Value = serde_json::from_slice(&body)
            .map_err(|e| api_error(StatusCode::BAD_REQUEST, format!("Invalid JSON body: {}", e)))?;

        let Some(signature) = signature else {
            warn!(
                request_id = %request_id,
                "Accepting unsigned webhook (development bypass enabled)"
            );
            return Ok(Self {
                payload,
                request_id,
                signed: false,
            });
        };

        if !state.verifier.verify(&payload, &signature, &request_id) {
            return Err(api_error(StatusCode::UNAUTHORIZED, "Unauthorized"));
        }

        Ok(Self {
            payload,
            request_id,
            signed: true,
        })
    }
}
