use std::sync::Arc;

use super::error::LoyaltyError;
use crate::ledger::{BalanceSummary, LedgerStore, Order, StoreError, Withdrawal};

/// Read-path result; `Empty` is a successful "no content"
#[derive(Debug, Clone, PartialEq)]
pub enum Listing<T> {
    Empty,
    Items(Vec<T>),
}

impl<T> From<Vec<T>> for Listing<T> {
    fn from(items: Vec<T>) -> Self {
        if items.is_empty() {
            Listing::Empty
        } else {
            Listing::Items(items)
        }
    }
}

/// Ledger read paths; no mutation
pub struct LedgerQueryService {
    store: Arc<dyn LedgerStore>,
}

impl LedgerQueryService {
    pub fn new(store: Arc<dyn LedgerStore>) -> Self {
        Self { store }
    }

    /// Uploaded orders, oldest first
    pub async fn list_orders(&self, user_id: i64) -> Result<Listing<Order>, LoyaltyError> {
        let orders = self
            .store
            .list_orders(user_id)
            .await
            .map_err(|e| log_read_failure(user_id, "orders", e))?;
        Ok(orders.into())
    }

    pub async fn balance(&self, user_id: i64) -> Result<BalanceSummary, LoyaltyError> {
        self.store
            .balance(user_id)
            .await
            .map_err(|e| log_read_failure(user_id, "balance", e))
    }

    /// Withdrawals, oldest first
    pub async fn list_withdrawals(
        &self,
        user_id: i64,
    ) -> Result<Listing<Withdrawal>, LoyaltyError> {
        let withdrawals = self
            .store
            .list_withdrawals(user_id)
            .await
            .map_err(|e| log_read_failure(user_id, "withdrawals", e))?;
        Ok(withdrawals.into())
    }
}

fn log_read_failure(user_id: i64, what: &str, e: StoreError) -> LoyaltyError {
    tracing::error!(user_id, error = %e, "Failed to read {}", what);
    LoyaltyError::Storage(e)
}
