//! Balance, withdrawals and withdrawal history

use std::sync::Arc;

use axum::{
    Extension, Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::Response,
};

use super::helpers::loyalty_error;
use super::orders::listing_response;
use crate::gateway::state::AppState;
use crate::gateway::types::{ApiError, WithdrawRequest, api_error, error_codes};
use crate::ledger::{BalanceSummary, Withdrawal};
use crate::user_auth::AuthUser;

/// Current balance and total withdrawn
///
/// GET /api/user/balance
#[utoipa::path(
    get,
    path = "/api/user/balance",
    responses(
        (status = 200, description = "Balance summary", body = BalanceSummary),
        (status = 401, description = "Not authenticated"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_jwt" = [])),
    tag = "Balance"
)]
pub async fn get_balance(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<BalanceSummary>, ApiError> {
    let balance = state
        .query
        .balance(user.user_id)
        .await
        .map_err(loyalty_error)?;
    Ok(Json(balance))
}

/// Spend points against an order number
///
/// POST /api/user/balance/withdraw
#[utoipa::path(
    post,
    path = "/api/user/balance/withdraw",
    request_body = WithdrawRequest,
    responses(
        (status = 200, description = "Points withdrawn"),
        (status = 400, description = "Malformed request body"),
        (status = 401, description = "Not authenticated"),
        (status = 402, description = "Insufficient balance"),
        (status = 422, description = "Invalid order number or amount"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_jwt" = [])),
    tag = "Balance"
)]
pub async fn withdraw(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    body: Result<Json<WithdrawRequest>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let Json(req) = body.map_err(|rejection| {
        tracing::debug!(error = %rejection, "Malformed withdrawal body");
        api_error(
            StatusCode::BAD_REQUEST,
            error_codes::INVALID_PARAMETER,
            "Malformed request body",
        )
    })?;

    state
        .withdrawal
        .withdraw(user.user_id, &req.order, req.sum)
        .await
        .map_err(loyalty_error)?;
    Ok(StatusCode::OK)
}

/// Withdrawal history, oldest first
///
/// GET /api/user/withdrawals
#[utoipa::path(
    get,
    path = "/api/user/withdrawals",
    responses(
        (status = 200, description = "Withdrawals", body = Vec<Withdrawal>),
        (status = 204, description = "No withdrawals"),
        (status = 401, description = "Not authenticated"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_jwt" = [])),
    tag = "Balance"
)]
pub async fn get_withdrawals(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Response, ApiError> {
    let listing = state
        .query
        .list_withdrawals(user.user_id)
        .await
        .map_err(loyalty_error)?;
    Ok(listing_response(listing))
}
