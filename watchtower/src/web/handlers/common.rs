//! Response envelope shared by every endpoint
//!
//! Successful calls carry `data`, refused ones carry `error`; never both.

use axum::{http::StatusCode, response::Json};
use chrono::{DateTime, Utc};
use serde::Serialize;

pub type ApiResult<T> = Result<Json<ApiResponse<T>>, ApiError>;
pub type ApiError = (StatusCode, Json<ApiResponse<()>>);

#[derive(Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            timestamp: Utc::now(),
        }
    }
}

/// Status plus an `error` envelope, usable as a handler or extractor rejection
pub fn api_error(status: StatusCode, message: impl Into<String>) -> ApiError {
    let body = ApiResponse {
        success: false,
        data: None,
        error: Some(message.into()),
        timestamp: Utc::now(),
    };
    (status, Json(body))
}
