use thiserror::Error;

use crate::accrual::AccrualError;
use crate::ledger::StoreError;
use crate::order_number::InvalidOrderNumber;

#[derive(Debug, Error)]
pub enum LoyaltyError {
    #[error("Invalid order number format")]
    InvalidFormat,

    #[error("Invalid amount: must be positive")]
    InvalidAmount,

    #[error("Order number already uploaded by another user")]
    Conflict,

    #[error("Insufficient funds")]
    InsufficientFunds,

    #[error("Accrual system error: {0}")]
    Integration(#[from] AccrualError),

    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),
}

impl LoyaltyError {
    /// Faults of the system rather than of the request; these get logged
    pub fn is_internal(&self) -> bool {
        matches!(self, LoyaltyError::Integration(_) | LoyaltyError::Storage(_))
    }
}

impl From<InvalidOrderNumber> for LoyaltyError {
    fn from(_: InvalidOrderNumber) -> Self {
        LoyaltyError::InvalidFormat
    }
}
