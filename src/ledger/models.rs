//! Ledger data models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

use crate::accrual::AccrualStatus;
use crate::order_number::OrderNumber;

// ============================================================================
// Points precision
// ============================================================================

/// Decimal places kept for points (`NUMERIC(18, 2)` columns)
pub const POINTS_SCALE: u32 = 2;

/// Largest value a `NUMERIC(18, 2)` column holds: 9999999999999999.99
pub const MAX_POINTS: Decimal = Decimal::from_parts(0xA763_FFFF, 0x0DE0_B6B3, 0, false, 2);

/// Whether `amount` is stored exactly by both ledger stores: at most two
/// decimal places and within the column range
pub fn is_storable_points(amount: Decimal) -> bool {
    amount.normalize().scale() <= POINTS_SCALE && amount.abs() <= MAX_POINTS
}

/// Order processing status as stored in `orders.status`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderStatus {
    New,
    Processing,
    Invalid,
    Processed,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::New => "NEW",
            OrderStatus::Processing => "PROCESSING",
            OrderStatus::Invalid => "INVALID",
            OrderStatus::Processed => "PROCESSED",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "NEW" => Ok(OrderStatus::New),
            "PROCESSING" => Ok(OrderStatus::Processing),
            "INVALID" => Ok(OrderStatus::Invalid),
            "PROCESSED" => Ok(OrderStatus::Processed),
            _ => Err(format!("Invalid order status: {}", s)),
        }
    }
}

impl From<AccrualStatus> for OrderStatus {
    fn from(status: AccrualStatus) -> Self {
        match status {
            AccrualStatus::Registered => OrderStatus::New,
            AccrualStatus::Processing => OrderStatus::Processing,
            AccrualStatus::Invalid => OrderStatus::Invalid,
            AccrualStatus::Processed => OrderStatus::Processed,
        }
    }
}

/// Order to be inserted by the submission flow
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub number: OrderNumber,
    pub user_id: i64,
    pub status: OrderStatus,
    /// Credited to the owner's balance together with the insert
    pub accrual: Option<Decimal>,
}

/// Uploaded order as listed to its owner
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Order {
    #[schema(example = "12345678903")]
    pub number: String,
    pub status: OrderStatus,
    #[serde(
        skip_serializing_if = "Option::is_none",
        with = "rust_decimal::serde::float_option"
    )]
    #[schema(value_type = Option<f64>, example = 500)]
    pub accrual: Option<Decimal>,
    pub uploaded_at: DateTime<Utc>,
}

/// Recorded spend of points
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Withdrawal {
    #[schema(example = "2377225624")]
    pub order: String,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64, example = 500)]
    pub sum: Decimal,
    pub processed_at: DateTime<Utc>,
}

/// Points available now and points spent so far
#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct BalanceSummary {
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64, example = 500.5)]
    pub current: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64, example = 42)]
    pub withdrawn: Decimal,
}

/// Stored login credentials
#[derive(Debug, Clone)]
pub struct UserCredentials {
    pub user_id: i64,
    pub login: String,
    pub password_hash: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storable_points() {
        assert_eq!(MAX_POINTS.to_string(), "9999999999999999.99");

        assert!(is_storable_points(Decimal::new(995, 2)));
        assert!(is_storable_points(Decimal::new(10_000, 3))); // 10.000
        assert!(is_storable_points(MAX_POINTS));
        assert!(!is_storable_points(Decimal::new(9995, 3)));
        assert!(!is_storable_points(Decimal::new(4, 3)));
        assert!(!is_storable_points(MAX_POINTS + Decimal::new(1, 2)));
    }

    #[test]
    fn test_order_status_round_trip_text() {
        for status in [
            OrderStatus::New,
            OrderStatus::Processing,
            OrderStatus::Invalid,
            OrderStatus::Processed,
        ] {
            assert_eq!(status.as_str().parse::<OrderStatus>().unwrap(), status);
        }
        assert!("DONE".parse::<OrderStatus>().is_err());
    }

    #[test]
    fn test_registered_maps_to_new() {
        assert_eq!(OrderStatus::from(AccrualStatus::Registered), OrderStatus::New);
        assert_eq!(
            OrderStatus::from(AccrualStatus::Processed),
            OrderStatus::Processed
        );
    }

    #[test]
    fn test_order_json_omits_missing_accrual() {
        let order = Order {
            number: "9278923470".to_string(),
            status: OrderStatus::Processing,
            accrual: None,
            uploaded_at: "2020-12-10T15:12:01Z".parse().unwrap(),
        };
        let json = serde_json::to_value(&order).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "number": "9278923470",
                "status": "PROCESSING",
                "uploaded_at": "2020-12-10T15:12:01Z"
            })
        );
    }

    #[test]
    fn test_balance_json_uses_numbers() {
        let balance = BalanceSummary {
            current: Decimal::new(5005, 1),
            withdrawn: Decimal::from(42),
        };
        let json = serde_json::to_value(balance).unwrap();
        assert_eq!(json["current"], serde_json::json!(500.5));
        assert_eq!(json["withdrawn"], serde_json::json!(42.0));
    }
}
