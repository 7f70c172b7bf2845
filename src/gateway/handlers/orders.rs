//! Order upload and listing

use std::sync::Arc;

use axum::{
    Extension, Json,
    extract::State,
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
};

use super::helpers::loyalty_error;
use crate::gateway::state::AppState;
use crate::gateway::types::{ApiError, api_error, error_codes};
use crate::ledger::Order;
use crate::loyalty::{Listing, SubmissionOutcome};
use crate::user_auth::AuthUser;

/// Upload an order number
///
/// POST /api/user/orders (text/plain body)
///
/// A number the caller already spent points against is owned by them, so it
/// answers 200 and stays out of the order listing. Other users get 409.
#[utoipa::path(
    post,
    path = "/api/user/orders",
    request_body(content = String, content_type = "text/plain"),
    responses(
        (status = 200, description = "Order already uploaded by this user"),
        (status = 202, description = "Order accepted"),
        (status = 400, description = "Body is not text/plain"),
        (status = 401, description = "Not authenticated"),
        (status = 409, description = "Order uploaded by another user"),
        (status = 422, description = "Invalid order number"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_jwt" = [])),
    tag = "Orders"
)]
pub async fn upload_order(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    headers: HeaderMap,
    body: String,
) -> Result<StatusCode, ApiError> {
    if !is_text_plain(&headers) {
        return Err(api_error(
            StatusCode::BAD_REQUEST,
            error_codes::UNSUPPORTED_CONTENT_TYPE,
            "Expected text/plain body",
        ));
    }

    match state.submission.submit(user.user_id, &body).await {
        Ok(SubmissionOutcome::Accepted) => Ok(StatusCode::ACCEPTED),
        Ok(SubmissionOutcome::AlreadyOwned) => Ok(StatusCode::OK),
        Err(e) => Err(loyalty_error(e)),
    }
}

/// List uploaded orders, oldest first
///
/// GET /api/user/orders
#[utoipa::path(
    get,
    path = "/api/user/orders",
    responses(
        (status = 200, description = "Uploaded orders", body = Vec<Order>),
        (status = 204, description = "No orders uploaded"),
        (status = 401, description = "Not authenticated"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_jwt" = [])),
    tag = "Orders"
)]
pub async fn get_orders(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Response, ApiError> {
    let listing = state
        .query
        .list_orders(user.user_id)
        .await
        .map_err(loyalty_error)?;
    Ok(listing_response(listing))
}

/// 200 + JSON array, or 204 with no body
pub(crate) fn listing_response<T: serde::Serialize>(listing: Listing<T>) -> Response {
    match listing {
        Listing::Empty => StatusCode::NO_CONTENT.into_response(),
        Listing::Items(items) => (StatusCode::OK, Json(items)).into_response(),
    }
}

fn is_text_plain(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .is_some_and(|mime| mime.trim().eq_ignore_ascii_case("text/plain"))
}
