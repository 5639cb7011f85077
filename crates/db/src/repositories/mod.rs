//! Repository implementations for data access.
//!
//! Each repository implements one of the read-side traits from `moneta-core`,
//! hiding the `SeaORM` implementation details from the services.

pub mod account_balance;
pub mod budget;
pub mod transaction;

pub use account_balance::AccountBalanceRepository;
pub use budget::BudgetRepository;
pub use transaction::TransactionRepository;
