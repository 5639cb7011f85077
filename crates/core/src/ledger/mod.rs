//! Transaction ledger queries.
//!
//! The ledger is read-only from this crate's point of view. It defines:
//! - [`TransactionFilter`], the predicate set every aggregate query is scoped by
//! - [`TransactionReader`] and [`BalanceReader`], implemented by the db crate
//! - Errors for invalid filters and failed queries

pub mod error;
pub mod filter;
pub mod reader;

pub use error::{BoxError, FilterError, RepositoryError};
pub use filter::{MAX_SEARCH_LEN, TransactionFilter};
pub use reader::{BalanceReader, TransactionReader};
