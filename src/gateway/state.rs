use std::sync::Arc;

use crate::accrual::AccrualOracle;
use crate::config::AppConfig;
use crate::ledger::LedgerStore;
use crate::loyalty::{LedgerQueryService, OrderSubmissionService, WithdrawalService};
use crate::user_auth::UserAuthService;

/// Gateway application state (shared by every request)
pub struct AppState {
    /// Ledger backend, also pinged by `/ping`
    pub store: Arc<dyn LedgerStore>,
    pub user_auth: UserAuthService,
    pub submission: OrderSubmissionService,
    pub withdrawal: WithdrawalService,
    pub query: LedgerQueryService,
}

impl AppState {
    pub fn new(
        store: Arc<dyn LedgerStore>,
        oracle: Arc<dyn AccrualOracle>,
        config: &AppConfig,
    ) -> Self {
        Self {
            user_auth: UserAuthService::new(
                store.clone(),
                config.jwt_secret.clone(),
                config.token_ttl_hours,
            ),
            submission: OrderSubmissionService::new(store.clone(), oracle),
            withdrawal: WithdrawalService::new(store.clone()),
            query: LedgerQueryService::new(store.clone()),
            store,
        }
    }
}
