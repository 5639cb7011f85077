//! Core business logic for Moneta.
//!
//! This crate holds the period-comparison engine with no web or database
//! dependencies. Persistence is reached through the repository traits defined here.
//!
//! # Modules
//!
//! - `dates` - Current vs previous window derivation
//! - `variation` - Fixed-point percentage variation
//! - `ledger` - Transaction filters and read-side repository traits
//! - `balance` - Balance, income and expense overview
//! - `budget` - Monthly budget consumption

pub mod balance;
pub mod budget;
pub mod clock;
pub mod dates;
pub mod ledger;
pub mod variation;

#[cfg(test)]
mod test_support;

pub use clock::{Clock, FixedClock, SystemClock};
pub use dates::{ComparisonDates, DateRange};
pub use variation::calculate_percentage_variation;
