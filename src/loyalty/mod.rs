//! Loyalty services
//!
//! Order submission, withdrawals and the ledger read paths. Services hold
//! `Arc<dyn LedgerStore>` / `Arc<dyn AccrualOracle>` handles and are shared
//! across requests; they keep no mutable state of their own.

pub mod error;
pub mod query;
pub mod submission;
pub mod withdrawal;


pub use error::LoyaltyError;
pub use query::{LedgerQueryService, Listing};
pub use submission::{OrderSubmissionService, SubmissionOutcome};
pub use withdrawal::WithdrawalService;
