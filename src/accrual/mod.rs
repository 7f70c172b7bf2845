//! Accrual Oracle
//!
//! The accrual system is an independently deployed service that decides
//! whether an order earns points and how many. This module holds the
//! boundary types and the [`AccrualOracle`] seam; [`http`] is the reqwest
//! implementation used in production.

pub mod http;

pub use http::HttpAccrualClient;

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::fmt;
use thiserror::Error;

use crate::order_number::OrderNumber;

/// Order status as reported by the accrual system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AccrualStatus {
    Registered,
    Processing,
    Invalid,
    Processed,
}

impl fmt::Display for AccrualStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccrualStatus::Registered => write!(f, "REGISTERED"),
            AccrualStatus::Processing => write!(f, "PROCESSING"),
            AccrualStatus::Invalid => write!(f, "INVALID"),
            AccrualStatus::Processed => write!(f, "PROCESSED"),
        }
    }
}

/// `200 OK` payload of `GET /api/orders/{number}`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AccrualResult {
    pub order: String,
    pub status: AccrualStatus,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub accrual: Option<Decimal>,
}

#[derive(Debug, Error)]
pub enum AccrualError {
    #[error("Accrual system returned unexpected status {status}")]
    UnexpectedStatus {
        status: u16,
        /// `Retry-After` seconds, only sent with 429
        retry_after: Option<u64>,
    },
    #[error("Accrual system unreachable: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("Accrual response could not be decoded: {0}")]
    Decode(#[source] reqwest::Error),
    #[error("Accrual response rejected: {0}")]
    InvalidPayload(String),
}

/// Single bounded lookup against the accrual system
///
/// `Ok(None)` means the oracle does not know the order yet (204); the caller
/// stores it as pending. No implementation retries.
#[async_trait]
pub trait AccrualOracle: Send + Sync {
    async fn query(&self, number: &OrderNumber) -> Result<Option<AccrualResult>, AccrualError>;
}

/// Scripted oracle for tests
#[cfg(test)]
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Canned oracle reply
    #[derive(Debug, Clone)]
    pub enum Reply {
        Pending,
        Result(AccrualStatus, Option<Decimal>),
        Status(u16),
    }

    pub struct MockOracle {
        replies: Mutex<HashMap<String, Reply>>,
        default_reply: Mutex<Reply>,
        query_count: AtomicUsize,
    }

    impl MockOracle {
        pub fn new() -> Self {
            Self {
                replies: Mutex::new(HashMap::new()),
                default_reply: Mutex::new(Reply::Pending),
                query_count: AtomicUsize::new(0),
            }
        }

        pub fn set_reply(&self, number: &str, reply: Reply) {
            self.replies
                .lock()
                .unwrap()
                .insert(number.to_string(), reply);
        }

        pub fn set_default(&self, reply: Reply) {
            *self.default_reply.lock().unwrap() = reply;
        }

        pub fn query_count(&self) -> usize {
            self.query_count.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl AccrualOracle for MockOracle {
        async fn query(
            &self,
            number: &OrderNumber,
        ) -> Result<Option<AccrualResult>, AccrualError> {
            self.query_count.fetch_add(1, Ordering::SeqCst);

            let reply = self
                .replies
                .lock()
                .unwrap()
                .get(number.as_str())
                .cloned()
                .unwrap_or_else(|| self.default_reply.lock().unwrap().clone());

            match reply {
                Reply::Pending => Ok(None),
                Reply::Result(status, accrual) => Ok(Some(AccrualResult {
                    order: number.to_string(),
                    status,
                    accrual,
                })),
                Reply::Status(status) => Err(AccrualError::UnexpectedStatus {
                    status,
                    retry_after: None,
                }),
            }
        }
    }
}
