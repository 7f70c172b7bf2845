//! Liveness handler

use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode};
use chrono::Utc;
use utoipa::ToSchema;

use crate::gateway::state::AppState;
use crate::gateway::types::{ApiResponse, error_codes};

/// Ping response data
#[derive(serde::Serialize, ToSchema)]
pub struct PingResponse {
    /// Server timestamp in milliseconds
    #[schema(example = 1703494800000_i64)]
    pub timestamp_ms: i64,
}

/// Store liveness
///
/// - Healthy: 200 OK + {code: 0, data: {timestamp_ms}}
/// - Store unreachable: 503 + {code: 5001, msg: "unavailable"}
#[utoipa::path(
    get,
    path = "/ping",
    responses(
        (status = 200, description = "Ledger store reachable", body = PingResponse, content_type = "application/json"),
        (status = 503, description = "Ledger store unreachable")
    ),
    tag = "System"
)]
pub async fn ping(
    State(state): State<Arc<AppState>>,
) -> (StatusCode, Json<ApiResponse<PingResponse>>) {
    match state.store.health_check().await {
        Ok(()) => (
            StatusCode::OK,
            Json(ApiResponse::success(PingResponse {
                timestamp_ms: Utc::now().timestamp_millis(),
            })),
        ),
        Err(e) => {
            tracing::error!(error = %e, "[HEALTH] Ledger store ping failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ApiResponse {
                    code: error_codes::SERVICE_UNAVAILABLE,
                    msg: "unavailable".to_string(),
                    data: None,
                }),
            )
        }
    }
}
