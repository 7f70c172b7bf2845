//! Reqwest-backed accrual oracle client

use async_trait::async_trait;
use reqwest::{Client, StatusCode, header};
use std::time::Duration;

use rust_decimal::{Decimal, RoundingStrategy};

use super::{AccrualError, AccrualOracle, AccrualResult};
use crate::ledger::{MAX_POINTS, POINTS_SCALE};
use crate::order_number::OrderNumber;

/// HTTP client for `GET {base}/api/orders/{number}`
#[derive(Debug, Clone)]
pub struct HttpAccrualClient {
    client: Client,
    base_url: String,
}

impl HttpAccrualClient {
    /// Build a client whose every request is bounded by `timeout`
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn order_url(&self, number: &OrderNumber) -> String {
        format!("{}/api/orders/{}", self.base_url, number)
    }
}

#[async_trait]
impl AccrualOracle for HttpAccrualClient {
    async fn query(&self, number: &OrderNumber) -> Result<Option<AccrualResult>, AccrualError> {
        let response = self
            .client
            .get(self.order_url(number))
            .send()
            .await
            .map_err(AccrualError::Transport)?;

        match response.status() {
            StatusCode::OK => {
                let mut result = response
                    .json::<AccrualResult>()
                    .await
                    .map_err(AccrualError::Decode)?;
                result.accrual = result
                    .accrual
                    .map(|accrual| normalize_accrual(number, accrual))
                    .transpose()?;
                tracing::debug!(
                    order = %number,
                    status = %result.status,
                    accrual = ?result.accrual,
                    "Accrual system answered"
                );
                Ok(Some(result))
            }
            StatusCode::NO_CONTENT => Ok(None),
            status => {
                let retry_after = response
                    .headers()
                    .get(header::RETRY_AFTER)
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.trim().parse::<u64>().ok());
                Err(AccrualError::UnexpectedStatus {
                    status: status.as_u16(),
                    retry_after,
                })
            }
        }
    }
}

/// Reject accruals the ledger cannot hold and round to stored precision
fn normalize_accrual(number: &OrderNumber, accrual: Decimal) -> Result<Decimal, AccrualError> {
    if accrual.is_sign_negative() {
        return Err(AccrualError::InvalidPayload(format!(
            "negative accrual for order {}",
            number
        )));
    }
    if accrual > MAX_POINTS {
        return Err(AccrualError::InvalidPayload(format!(
            "accrual {} for order {} exceeds {}",
            accrual, number, MAX_POINTS
        )));
    }
    Ok(accrual.round_dp_with_strategy(POINTS_SCALE, RoundingStrategy::MidpointAwayFromZero))
}
