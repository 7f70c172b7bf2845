//! Gateway types module
//!
//! - [`response`]: `ApiResponse<T>` error envelope and error codes
//! - [`loyalty`]: request bodies for the loyalty endpoints

pub mod loyalty;
pub mod response;

pub use loyalty::WithdrawRequest;
pub use response::{ApiError, ApiResponse, api_error, error_codes};
