//! API error envelope and error codes
//!
//! Successful loyalty responses are plain JSON bodies; every failure uses
//! `ApiResponse` so clients get a stable `{code, msg}` shape.

use axum::{Json, http::StatusCode};
use serde::Serialize;
use utoipa::ToSchema;

/// Unified API response wrapper
///
/// - code: 0 = success, non-zero = error code
/// - msg: short message description
/// - data: actual data (success) or absent (error)
#[derive(Debug, Serialize, ToSchema)]
pub struct ApiResponse<T> {
    #[schema(example = 0)]
    pub code: i32,
    #[schema(example = "ok")]
    pub msg: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            code: error_codes::SUCCESS,
            msg: "ok".to_string(),
            data: Some(data),
        }
    }

    pub fn error(code: i32, msg: impl Into<String>) -> ApiResponse<()> {
        ApiResponse {
            code,
            msg: msg.into(),
            data: None,
        }
    }
}

/// Handler error: HTTP status plus envelope
pub type ApiError = (StatusCode, Json<ApiResponse<()>>);

pub fn api_error(status: StatusCode, code: i32, msg: impl Into<String>) -> ApiError {
    (status, Json(ApiResponse::<()>::error(code, msg)))
}

/// Standard API error codes
pub mod error_codes {
    pub const SUCCESS: i32 = 0;

    // Client errors (1xxx)
    pub const INVALID_PARAMETER: i32 = 1001;
    pub const INSUFFICIENT_BALANCE: i32 = 1002;
    pub const INVALID_ORDER_NUMBER: i32 = 1003;
    pub const UNSUPPORTED_CONTENT_TYPE: i32 = 1004;

    // Auth errors (2xxx)
    pub const MISSING_AUTH: i32 = 2001;
    pub const AUTH_FAILED: i32 = 2002;

    // Conflict errors (4xxx)
    pub const ORDER_CONFLICT: i32 = 4091;
    pub const LOGIN_TAKEN: i32 = 4092;

    // Server errors (5xxx)
    pub const INTERNAL_ERROR: i32 = 5000;
    pub const SERVICE_UNAVAILABLE: i32 = 5001;
}
