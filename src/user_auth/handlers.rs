use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::{HeaderMap, HeaderValue, StatusCode, header},
};
use std::sync::Arc;

use super::service::{AuthError, AuthResponse, Credentials};
use crate::gateway::state::AppState;
use crate::gateway::types::{ApiError, api_error, error_codes};

type TokenReply = (StatusCode, HeaderMap, Json<AuthResponse>);

/// Register a new user
///
/// POST /api/user/register
#[utoipa::path(
    post,
    path = "/api/user/register",
    request_body = Credentials,
    responses(
        (status = 200, description = "User registered and authenticated", body = AuthResponse),
        (status = 400, description = "Malformed request"),
        (status = 409, description = "Login already taken"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Auth"
)]
pub async fn register(
    State(state): State<Arc<AppState>>,
    body: Result<Json<Credentials>, JsonRejection>,
) -> Result<TokenReply, ApiError> {
    let Json(req) = body.map_err(malformed)?;

    match state.user_auth.register(&req).await {
        Ok(resp) => token_reply(resp),
        Err(AuthError::LoginTaken) => {
            tracing::debug!(login = %req.login, "Registration for existing login");
            Err(api_error(
                StatusCode::CONFLICT,
                error_codes::LOGIN_TAKEN,
                "Login already taken",
            ))
        }
        Err(e) => Err(auth_failure(e)),
    }
}

/// Login user
///
/// POST /api/user/login
#[utoipa::path(
    post,
    path = "/api/user/login",
    request_body = Credentials,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 400, description = "Malformed request"),
        (status = 401, description = "Invalid credentials"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Auth"
)]
pub async fn login(
    State(state): State<Arc<AppState>>,
    body: Result<Json<Credentials>, JsonRejection>,
) -> Result<TokenReply, ApiError> {
    let Json(req) = body.map_err(malformed)?;

    match state.user_auth.login(&req).await {
        Ok(resp) => token_reply(resp),
        Err(e) => Err(auth_failure(e)),
    }
}

fn token_reply(resp: AuthResponse) -> Result<TokenReply, ApiError> {
    let value = HeaderValue::from_str(&format!("Bearer {}", resp.token)).map_err(|e| {
        tracing::error!(error = %e, "Issued token is not a valid header value");
        api_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            error_codes::INTERNAL_ERROR,
            "Internal server error",
        )
    })?;

    let mut headers = HeaderMap::new();
    headers.insert(header::AUTHORIZATION, value);
    Ok((StatusCode::OK, headers, Json(resp)))
}

fn malformed(rejection: JsonRejection) -> ApiError {
    tracing::debug!(error = %rejection, "Malformed credentials body");
    api_error(
        StatusCode::BAD_REQUEST,
        error_codes::INVALID_PARAMETER,
        "Malformed request body",
    )
}

fn auth_failure(e: AuthError) -> ApiError {
    match e {
        AuthError::MissingCredentials => api_error(
            StatusCode::BAD_REQUEST,
            error_codes::INVALID_PARAMETER,
            "Login and password are required",
        ),
        AuthError::InvalidCredentials => api_error(
            StatusCode::UNAUTHORIZED,
            error_codes::AUTH_FAILED,
            "Invalid login or password",
        ),
        AuthError::LoginTaken => api_error(
            StatusCode::CONFLICT,
            error_codes::LOGIN_TAKEN,
            "Login already taken",
        ),
        other => {
            tracing::error!(error = %other, "Authentication failed");
            api_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                error_codes::INTERNAL_ERROR,
                "Internal server error",
            )
        }
    }
}
