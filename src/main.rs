//! Gophermart - Loyalty Points Ledger
//!
//! ```text
//! ┌──────────┐    ┌──────────┐    ┌──────────┐    ┌──────────┐
//! │  Config  │───▶│ Gateway  │───▶│ Loyalty  │───▶│  Ledger  │
//! │(YAML+env)│    │ (axum)   │    │ services │    │ (PG/mem) │
//! └──────────┘    └──────────┘    └────┬─────┘    └──────────┘
//!                                      │
//!                                      ▼
//!                                 ┌──────────┐
//!                                 │ Accrual  │
//!                                 │  system  │
//!                                 └──────────┘
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;

use gophermart::accrual::HttpAccrualClient;
use gophermart::config::{AppConfig, Cli};
use gophermart::db::Database;
use gophermart::gateway::{self, state::AppState};
use gophermart::ledger::{LedgerStore, MemoryLedgerStore, PgLedgerStore};
use gophermart::logging::init_logging;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::resolve(&cli).context("Invalid configuration")?;
    let _log_guard = init_logging(&config);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        git = env!("GIT_HASH"),
        "Starting gophermart"
    );

    let store = open_store(&config).await?;

    let oracle = HttpAccrualClient::new(&config.accrual_system_address, config.accrual_timeout())
        .context("Failed to build accrual client")?;
    tracing::info!(
        address = %config.accrual_system_address,
        timeout_ms = config.accrual_timeout_ms,
        "Accrual system client ready"
    );

    let state = Arc::new(AppState::new(store, Arc::new(oracle), &config));

    gateway::run_server(&config.bind_address(), state)
        .await
        .with_context(|| format!("Gateway on {} failed", config.run_address))?;

    tracing::info!("Gophermart stopped");
    Ok(())
}

/// PostgreSQL when `database_uri` is set, otherwise the in-memory ledger
async fn open_store(config: &AppConfig) -> Result<Arc<dyn LedgerStore>> {
    if !config.uses_database() {
        tracing::warn!("No database_uri configured, using in-memory ledger (data is not persisted)");
        return Ok(Arc::new(MemoryLedgerStore::new()));
    }

    let db = Database::connect(&config.database_uri)
        .await
        .context("Failed to connect to PostgreSQL")?;
    db.migrate().await.context("Failed to apply schema")?;
    tracing::info!("PostgreSQL ledger ready");

    Ok(Arc::new(PgLedgerStore::new(db.pool().clone())))
}
