//! Balance overview: current vs previous balance, income and expense.

pub mod error;
pub mod service;
pub mod types;


pub use error::BalanceError;
pub use service::BalanceService;
pub use types::{BalanceSnapshot, Comparison};
