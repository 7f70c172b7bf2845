use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode, header},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

use crate::gateway::{
    state::AppState,
    types::{ApiError, api_error, error_codes},
};

/// Authenticated caller, injected into request extensions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser {
    pub user_id: i64,
}

pub async fn jwt_auth_middleware(
    State(state): State<Arc<AppState>>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    // 1. Extract Authorization header
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| {
            api_error(
                StatusCode::UNAUTHORIZED,
                error_codes::MISSING_AUTH,
                "Missing Authorization header",
            )
        })?;

    let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
        api_error(
            StatusCode::UNAUTHORIZED,
            error_codes::AUTH_FAILED,
            "Invalid token format",
        )
    })?;

    // 2. Verify token
    let user_id = state
        .user_auth
        .verify_token(token.trim())
        .and_then(|claims| claims.user_id())
        .map_err(|e| {
            tracing::debug!(error = %e, "Rejected bearer token");
            api_error(
                StatusCode::UNAUTHORIZED,
                error_codes::AUTH_FAILED,
                "Invalid or expired token",
            )
        })?;

    // 3. Inject caller
    request.extensions_mut().insert(AuthUser { user_id });
    Ok(next.run(request).await)
}
