//! Gophermart - Loyalty Points Ledger
//!
//! Users upload order numbers, the external accrual system decides how many
//! points each order earns, and users spend points against other order
//! numbers. Every balance change is one atomic store operation.
//!
//! # Modules
//!
//! - [`order_number`] - Luhn validation and the `OrderNumber` newtype
//! - [`accrual`] - Accrual system client (`AccrualOracle` trait + reqwest impl)
//! - [`ledger`] - `LedgerStore` trait, PostgreSQL and in-memory stores
//! - [`db`] - Connection pool and schema bootstrap
//! - [`loyalty`] - Order submission, withdrawal and read-path services
//! - [`user_auth`] - Registration, login, JWT middleware
//! - [`gateway`] - axum router, handlers, OpenAPI
//! - [`config`] - YAML + flag/env configuration
//! - [`logging`] - tracing subscriber setup

pub mod accrual;
pub mod config;
pub mod db;
pub mod gateway;
pub mod ledger;
pub mod logging;
pub mod loyalty;
pub mod order_number;
pub mod user_auth;

pub use order_number::OrderNumber;
