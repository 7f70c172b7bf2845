use std::sync::Arc;

use super::error::LoyaltyError;
use crate::accrual::AccrualOracle;
use crate::ledger::{InsertOrderOutcome, LedgerStore, NewOrder, OrderStatus};
use crate::order_number::OrderNumber;

/// Successful submission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionOutcome {
    /// New order stored
    Accepted,
    /// Same user uploaded this number before; nothing changed
    AlreadyOwned,
}

pub struct OrderSubmissionService {
    store: Arc<dyn LedgerStore>,
    oracle: Arc<dyn AccrualOracle>,
}

impl OrderSubmissionService {
    pub fn new(store: Arc<dyn LedgerStore>, oracle: Arc<dyn AccrualOracle>) -> Self {
        Self { store, oracle }
    }

    /// Register an order number for `user_id`
    ///
    /// 1. Trim & validate (Luhn)
    /// 2. Ownership check: same user is idempotent, other user is a conflict
    /// 3. Ask the accrual system (pending / result / failure)
    /// 4. Insert, crediting the accrual in the same transaction
    pub async fn submit(
        &self,
        user_id: i64,
        raw: &str,
    ) -> Result<SubmissionOutcome, LoyaltyError> {
        let number = OrderNumber::parse(raw)?;

        // 1. Ownership
        if let Some(owner) = self.find_owner(user_id, &number).await? {
            return Self::resolve_existing(user_id, owner, &number);
        }

        // 2. Oracle
        let reply = self.oracle.query(&number).await.map_err(|e| {
            tracing::error!(
                user_id,
                order = %number,
                error = %e,
                "Accrual system query failed, order not stored"
            );
            e
        })?;

        let new_order = match reply {
            None => NewOrder {
                number: number.clone(),
                user_id,
                status: OrderStatus::New,
                accrual: None,
            },
            Some(result) => NewOrder {
                number: number.clone(),
                user_id,
                status: result.status.into(),
                accrual: result.accrual,
            },
        };

        // 3. Persist (+ credit)
        let outcome = self.store.insert_order(&new_order).await.map_err(|e| {
            tracing::error!(user_id, order = %number, error = %e, "Failed to store order");
            e
        })?;

        match outcome {
            InsertOrderOutcome::Inserted => {
                tracing::info!(
                    user_id,
                    order = %number,
                    status = %new_order.status,
                    accrual = ?new_order.accrual,
                    "Order accepted"
                );
                Ok(SubmissionOutcome::Accepted)
            }
            // Lost the insert race to a concurrent submission
            InsertOrderOutcome::Duplicate { owner } => {
                Self::resolve_existing(user_id, owner, &number)
            }
        }
    }

    async fn find_owner(
        &self,
        user_id: i64,
        number: &OrderNumber,
    ) -> Result<Option<i64>, LoyaltyError> {
        self.store.find_order_owner(number).await.map_err(|e| {
            tracing::error!(user_id, order = %number, error = %e, "Order lookup failed");
            LoyaltyError::from(e)
        })
    }

    fn resolve_existing(
        user_id: i64,
        owner: i64,
        number: &OrderNumber,
    ) -> Result<SubmissionOutcome, LoyaltyError> {
        if owner == user_id {
            tracing::debug!(user_id, order = %number, "Order already uploaded by this user");
            Ok(SubmissionOutcome::AlreadyOwned)
        } else {
            tracing::debug!(user_id, owner, order = %number, "Order owned by another user");
            Err(LoyaltyError::Conflict)
        }
    }
}
