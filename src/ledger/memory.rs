//! In-process ledger store
//!
//! Holds all tables behind one mutex; every trait method takes the lock
//! once, so each operation is atomic exactly like a store transaction.
//! Used by the test suites and when the gateway runs without `database_uri`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use super::models::{
    BalanceSummary, MAX_POINTS, NewOrder, Order, OrderStatus, UserCredentials, Withdrawal,
};
use super::{CreateUserOutcome, InsertOrderOutcome, LedgerStore, StoreError, WithdrawOutcome};
use crate::order_number::OrderNumber;

#[derive(Debug, Clone)]
struct OrderRow {
    order_id: i64,
    number: String,
    user_id: i64,
    status: Option<OrderStatus>,
    accrual: Option<Decimal>,
    submitted_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
struct WithdrawalRow {
    user_id: i64,
    order_id: i64,
    amount: Decimal,
    processed_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct Tables {
    users: Vec<UserCredentials>,
    /// order_number -> row
    orders: HashMap<String, OrderRow>,
    balances: HashMap<i64, Decimal>,
    withdrawals: Vec<WithdrawalRow>,
    next_user_id: i64,
    next_order_id: i64,
}

impl Tables {
    fn next_order_id(&mut self) -> i64 {
        self.next_order_id += 1;
        self.next_order_id
    }
}

#[derive(Debug, Default)]
pub struct MemoryLedgerStore {
    tables: Mutex<Tables>,
}

impl MemoryLedgerStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Tables>, StoreError> {
        self.tables
            .lock()
            .map_err(|_| StoreError::Unavailable("memory ledger lock poisoned".to_string()))
    }
}

#[async_trait]
impl LedgerStore for MemoryLedgerStore {
    async fn find_order_owner(&self, number: &OrderNumber) -> Result<Option<i64>, StoreError> {
        let tables = self.lock()?;
        Ok(tables.orders.get(number.as_str()).map(|o| o.user_id))
    }

    async fn insert_order(&self, order: &NewOrder) -> Result<InsertOrderOutcome, StoreError> {
        let mut tables = self.lock()?;

        if let Some(existing) = tables.orders.get(order.number.as_str()) {
            return Ok(InsertOrderOutcome::Duplicate {
                owner: existing.user_id,
            });
        }

        // Same bound as the NUMERIC(18, 2) column; checked before any write.
        let credited = match order.accrual {
            Some(accrual) => {
                let points = tables.balances.get(&order.user_id).copied().unwrap_or_default();
                let credited = points
                    .checked_add(accrual)
                    .filter(|p| *p <= MAX_POINTS)
                    .ok_or_else(|| {
                        StoreError::OutOfRange(format!(
                            "balance of user {} cannot take {} more points",
                            order.user_id, accrual
                        ))
                    })?;
                Some(credited)
            }
            None => None,
        };

        let order_id = tables.next_order_id();
        tables.orders.insert(
            order.number.to_string(),
            OrderRow {
                order_id,
                number: order.number.to_string(),
                user_id: order.user_id,
                status: Some(order.status),
                accrual: order.accrual,
                submitted_at: Utc::now(),
            },
        );

        if let Some(points) = credited {
            tables.balances.insert(order.user_id, points);
        }

        Ok(InsertOrderOutcome::Inserted)
    }

    async fn withdraw(
        &self,
        user_id: i64,
        number: &OrderNumber,
        amount: Decimal,
    ) -> Result<WithdrawOutcome, StoreError> {
        let mut tables = self.lock()?;

        let points = tables.balances.get(&user_id).copied().unwrap_or_default();
        if points < amount {
            return Ok(WithdrawOutcome::InsufficientFunds);
        }

        let order_id = match tables.orders.get(number.as_str()) {
            Some(existing) => existing.order_id,
            None => {
                let order_id = tables.next_order_id();
                tables.orders.insert(
                    number.to_string(),
                    OrderRow {
                        order_id,
                        number: number.to_string(),
                        user_id,
                        status: None,
                        accrual: None,
                        submitted_at: Utc::now(),
                    },
                );
                order_id
            }
        };

        tables.balances.insert(user_id, points - amount);
        tables.withdrawals.push(WithdrawalRow {
            user_id,
            order_id,
            amount,
            processed_at: Utc::now(),
        });

        Ok(WithdrawOutcome::Withdrawn)
    }

    async fn list_orders(&self, user_id: i64) -> Result<Vec<Order>, StoreError> {
        let tables = self.lock()?;

        let mut rows: Vec<&OrderRow> = tables
            .orders
            .values()
            .filter(|o| o.user_id == user_id && o.status.is_some())
            .collect();
        rows.sort_by_key(|o| (o.submitted_at, o.order_id));

        Ok(rows
            .into_iter()
            .filter_map(|o| {
                o.status.map(|status| Order {
                    number: o.number.clone(),
                    status,
                    accrual: o.accrual,
                    uploaded_at: o.submitted_at,
                })
            })
            .collect())
    }

    async fn balance(&self, user_id: i64) -> Result<BalanceSummary, StoreError> {
        let tables = self.lock()?;

        let current = tables.balances.get(&user_id).copied().unwrap_or_default();
        let withdrawn = tables
            .withdrawals
            .iter()
            .filter(|w| w.user_id == user_id)
            .map(|w| w.amount)
            .sum();

        Ok(BalanceSummary { current, withdrawn })
    }

    async fn list_withdrawals(&self, user_id: i64) -> Result<Vec<Withdrawal>, StoreError> {
        let tables = self.lock()?;

        let numbers: HashMap<i64, &str> = tables
            .orders
            .values()
            .map(|o| (o.order_id, o.number.as_str()))
            .collect();

        // Rows are appended in processing order already.
        tables
            .withdrawals
            .iter()
            .filter(|w| w.user_id == user_id)
            .map(|w| -> Result<Withdrawal, StoreError> {
                let order = numbers.get(&w.order_id).ok_or_else(|| {
                    StoreError::Corrupt(format!("withdrawal references order {}", w.order_id))
                })?;
                Ok(Withdrawal {
                    order: order.to_string(),
                    sum: w.amount,
                    processed_at: w.processed_at,
                })
            })
            .collect()
    }

    async fn create_user(
        &self,
        login: &str,
        password_hash: &str,
    ) -> Result<CreateUserOutcome, StoreError> {
        let mut tables = self.lock()?;

        if tables.users.iter().any(|u| u.login == login) {
            return Ok(CreateUserOutcome::LoginTaken);
        }

        tables.next_user_id += 1;
        let user_id = tables.next_user_id;
        tables.users.push(UserCredentials {
            user_id,
            login: login.to_string(),
            password_hash: password_hash.to_string(),
        });
        tables.balances.insert(user_id, Decimal::ZERO);

        Ok(CreateUserOutcome::Created { user_id })
    }

    async fn find_user_by_login(
        &self,
        login: &str,
    ) -> Result<Option<UserCredentials>, StoreError> {
        let tables = self.lock()?;
        Ok(tables.users.iter().find(|u| u.login == login).cloned())
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        self.lock().map(|_| ())
    }
}
