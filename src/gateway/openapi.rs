//! OpenAPI documentation
//!
//! Served as JSON at `/api-docs/openapi.json`; also exported by the
//! `export_openapi` binary.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::gateway::handlers::PingResponse;
use crate::gateway::types::WithdrawRequest;
use crate::ledger::{BalanceSummary, Order, OrderStatus, Withdrawal};
use crate::user_auth::{AuthResponse, Credentials};

/// Bearer JWT security scheme
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_jwt",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some(
                            "Token from /api/user/register or /api/user/login",
                        ))
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Gophermart Loyalty API",
        version = "1.0.0",
        description = "Loyalty points ledger: order uploads, accruals and withdrawals.",
        license(
            name = "MIT"
        )
    ),
    servers(
        (url = "http://localhost:8080", description = "Development"),
    ),
    paths(
        crate::gateway::handlers::health::ping,
        crate::user_auth::handlers::register,
        crate::user_auth::handlers::login,
        crate::gateway::handlers::orders::upload_order,
        crate::gateway::handlers::orders::get_orders,
        crate::gateway::handlers::balance::get_balance,
        crate::gateway::handlers::balance::withdraw,
        crate::gateway::handlers::balance::get_withdrawals,
    ),
    components(
        schemas(
            PingResponse,
            Credentials,
            AuthResponse,
            Order,
            OrderStatus,
            Withdrawal,
            BalanceSummary,
            WithdrawRequest,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Auth", description = "Registration and login"),
        (name = "Orders", description = "Order uploads (auth required)"),
        (name = "Balance", description = "Balance and withdrawals (auth required)"),
        (name = "System", description = "Health checks")
    )
)]
pub struct ApiDoc;
