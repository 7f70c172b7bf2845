//! Service-error to HTTP mapping shared by the loyalty handlers

use axum::http::StatusCode;

use crate::gateway::types::{ApiError, api_error, error_codes};
use crate::loyalty::LoyaltyError;

/// Map a service failure to status + envelope
///
/// Internal failures were already logged with context by the service; the
/// client only gets a generic message.
pub fn loyalty_error(e: LoyaltyError) -> ApiError {
    match e {
        LoyaltyError::InvalidFormat => api_error(
            StatusCode::UNPROCESSABLE_ENTITY,
            error_codes::INVALID_ORDER_NUMBER,
            "Invalid order number",
        ),
        LoyaltyError::InvalidAmount => api_error(
            StatusCode::UNPROCESSABLE_ENTITY,
            error_codes::INVALID_PARAMETER,
            "Amount must be positive",
        ),
        LoyaltyError::Conflict => api_error(
            StatusCode::CONFLICT,
            error_codes::ORDER_CONFLICT,
            "Order number already uploaded by another user",
        ),
        LoyaltyError::InsufficientFunds => api_error(
            StatusCode::PAYMENT_REQUIRED,
            error_codes::INSUFFICIENT_BALANCE,
            "Insufficient balance",
        ),
        LoyaltyError::Integration(_) | LoyaltyError::Storage(_) => api_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            error_codes::INTERNAL_ERROR,
            "Internal server error",
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accrual::AccrualError;
    use crate::ledger::StoreError;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (LoyaltyError::InvalidFormat, StatusCode::UNPROCESSABLE_ENTITY),
            (LoyaltyError::InvalidAmount, StatusCode::UNPROCESSABLE_ENTITY),
            (LoyaltyError::Conflict, StatusCode::CONFLICT),
            (LoyaltyError::InsufficientFunds, StatusCode::PAYMENT_REQUIRED),
            (
                LoyaltyError::Integration(AccrualError::UnexpectedStatus {
                    status: 500,
                    retry_after: None,
                }),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                LoyaltyError::Storage(StoreError::Unavailable("poisoned".into())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, expected) in cases {
            let (status, _) = loyalty_error(err);
            assert_eq!(status, expected);
        }
    }

    #[test]
    fn test_internal_details_not_leaked() {
        let (_, body) = loyalty_error(LoyaltyError::Storage(StoreError::Corrupt(
            "status 'BOGUS'".into(),
        )));
        assert_eq!(body.0.msg, "Internal server error");
    }
}
