//! HTTP handlers
//!
//! - [`health`]: store liveness
//! - [`orders`]: order upload and listing
//! - [`balance`]: balance, withdrawals and withdrawal history
//! - [`helpers`]: service-error to HTTP mapping

pub mod balance;
pub mod health;
pub mod helpers;
pub mod orders;

pub use balance::{get_balance, get_withdrawals, withdraw};
pub use health::{PingResponse, ping};
pub use orders::{get_orders, upload_order};
