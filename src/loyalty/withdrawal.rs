use rust_decimal::Decimal;
use std::sync::Arc;

use super::error::LoyaltyError;
use crate::ledger::{LedgerStore, WithdrawOutcome, is_storable_points};
use crate::order_number::OrderNumber;

pub struct WithdrawalService {
    store: Arc<dyn LedgerStore>,
}

impl WithdrawalService {
    pub fn new(store: Arc<dyn LedgerStore>) -> Self {
        Self { store }
    }

    /// Spend `amount` points against `order_number`
    ///
    /// The order number is a spend reference: an existing order is reused
    /// whoever owns it, otherwise an anchor order is created for `user_id`.
    /// The balance check and the debit are one conditional update in the
    /// store, so concurrent withdrawals cannot overdraw.
    pub async fn withdraw(
        &self,
        user_id: i64,
        order_number: &str,
        amount: Decimal,
    ) -> Result<(), LoyaltyError> {
        let number = OrderNumber::parse(order_number)?;

        // Points are kept with two decimals; anything finer cannot be
        // debited exactly.
        if amount <= Decimal::ZERO || !is_storable_points(amount) {
            return Err(LoyaltyError::InvalidAmount);
        }

        let outcome = self
            .store
            .withdraw(user_id, &number, amount)
            .await
            .map_err(|e| {
                tracing::error!(
                    user_id,
                    order = %number,
                    %amount,
                    error = %e,
                    "Withdrawal failed"
                );
                e
            })?;

        match outcome {
            WithdrawOutcome::Withdrawn => {
                tracing::info!(user_id, order = %number, %amount, "Points withdrawn");
                Ok(())
            }
            WithdrawOutcome::InsufficientFunds => {
                tracing::debug!(user_id, order = %number, %amount, "Insufficient points");
                Err(LoyaltyError::InsufficientFunds)
            }
        }
    }
}
