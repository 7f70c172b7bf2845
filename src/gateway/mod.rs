pub mod handlers;
pub mod openapi;
pub mod state;
pub mod types;


use axum::{
    Json, Router,
    middleware::from_fn_with_state,
    routing::{get, post},
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::{compression::CompressionLayer, trace::TraceLayer};
use utoipa::OpenApi;

use crate::user_auth::{handlers as auth_handlers, jwt_auth_middleware};
use state::AppState;

/// Build the full application router
pub fn router(state: Arc<AppState>) -> Router {
    // ==========================================================================
    // Auth Routes (public)
    // ==========================================================================
    let auth_routes = Router::new()
        .route("/register", post(auth_handlers::register))
        .route("/login", post(auth_handlers::login));

    // ==========================================================================
    // Loyalty Routes - Protected by JWT
    // ==========================================================================
    let loyalty_routes = Router::new()
        .route(
            "/orders",
            post(handlers::upload_order).get(handlers::get_orders),
        )
        .route("/balance", get(handlers::get_balance))
        .route("/balance/withdraw", post(handlers::withdraw))
        .route("/withdrawals", get(handlers::get_withdrawals))
        .route_layer(from_fn_with_state(state.clone(), jwt_auth_middleware));

    Router::new()
        .route("/ping", get(handlers::ping))
        .nest("/api/user", auth_routes.merge(loyalty_routes))
        .with_state(state)
        .route(
            "/api-docs/openapi.json",
            get(|| async { Json(openapi::ApiDoc::openapi()) }),
        )
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
}

/// Bind `addr` and serve until Ctrl-C
pub async fn run_server(addr: &str, state: Arc<AppState>) -> std::io::Result<()> {
    let app = router(state);

    let listener = TcpListener::bind(addr).await.map_err(|e| {
        tracing::error!(%addr, error = %e, "Failed to bind");
        e
    })?;

    tracing::info!("Gateway listening on http://{}", listener.local_addr()?);
    tracing::info!("OpenAPI: http://{}/api-docs/openapi.json", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install Ctrl-C handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
