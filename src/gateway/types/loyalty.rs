use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::ToSchema;

/// Withdrawal request body
#[derive(Debug, Deserialize, ToSchema)]
pub struct WithdrawRequest {
    /// Order number the points are spent on
    #[schema(example = "2377225624")]
    pub order: String,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64, example = 751)]
    pub sum: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_withdraw_request_accepts_float_sum() {
        let req: WithdrawRequest =
            serde_json::from_str(r#"{"order":"2377225624","sum":751.5}"#).unwrap();
        assert_eq!(req.order, "2377225624");
        assert_eq!(req.sum, Decimal::new(7515, 1));

        let req: WithdrawRequest = serde_json::from_str(r#"{"order":"18","sum":3}"#).unwrap();
        assert_eq!(req.sum, Decimal::from(3));
    }
}
