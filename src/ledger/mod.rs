//! Ledger store
//!
//! Persistence boundary for orders, balances and withdrawals. Every
//! mutation that touches more than one row is a single store operation so
//! the invariants hold under concurrent requests and across process
//! instances:
//!
//! - at most one order row per order number (unique constraint)
//! - `balance.points >= 0` (conditional debit + CHECK constraint)
//! - order insert and balance credit commit together
//! - debit, anchor-order creation and withdrawal insert commit together
//!
//! [`PgLedgerStore`] is the PostgreSQL implementation; [`MemoryLedgerStore`]
//! serialises operations under one lock for tests and database-less runs.

pub mod memory;
pub mod models;
pub mod postgres;

pub use memory::MemoryLedgerStore;
pub use models::{
    BalanceSummary, MAX_POINTS, NewOrder, Order, OrderStatus, POINTS_SCALE, UserCredentials,
    Withdrawal, is_storable_points,
};
pub use postgres::PgLedgerStore;

use async_trait::async_trait;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::order_number::OrderNumber;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Store unavailable: {0}")]
    Unavailable(String),
    #[error("Corrupt row: {0}")]
    Corrupt(String),
    #[error("Value out of range: {0}")]
    OutOfRange(String),
}

/// Result of inserting a new order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOrderOutcome {
    Inserted,
    /// The number already exists; `owner` holds it
    Duplicate { owner: i64 },
}

/// Result of a debit attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WithdrawOutcome {
    Withdrawn,
    InsufficientFunds,
}

/// Result of creating a user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateUserOutcome {
    Created { user_id: i64 },
    LoginTaken,
}

#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Owner of an existing order, if any
    async fn find_order_owner(&self, number: &OrderNumber) -> Result<Option<i64>, StoreError>;

    /// Insert an order and, when it carries an accrual, credit the owner's
    /// balance in the same transaction
    ///
    /// A lost race on the order number yields `Duplicate`, never a second row.
    async fn insert_order(&self, order: &NewOrder) -> Result<InsertOrderOutcome, StoreError>;

    /// Debit `amount` and record the withdrawal against `number`
    ///
    /// The debit is conditional on `points >= amount`; when it does not
    /// apply nothing is written. A missing order row is created as an
    /// anchor owned by `user_id`.
    async fn withdraw(
        &self,
        user_id: i64,
        number: &OrderNumber,
        amount: Decimal,
    ) -> Result<WithdrawOutcome, StoreError>;

    /// Orders with a status, oldest first
    async fn list_orders(&self, user_id: i64) -> Result<Vec<Order>, StoreError>;

    async fn balance(&self, user_id: i64) -> Result<BalanceSummary, StoreError>;

    /// Withdrawals, oldest first
    async fn list_withdrawals(&self, user_id: i64) -> Result<Vec<Withdrawal>, StoreError>;

    /// Create a user and its zero balance together
    async fn create_user(
        &self,
        login: &str,
        password_hash: &str,
    ) -> Result<CreateUserOutcome, StoreError>;

    async fn find_user_by_login(&self, login: &str)
    -> Result<Option<UserCredentials>, StoreError>;

    async fn health_check(&self) -> Result<(), StoreError>;
}
