//! Monthly budget consumption.

pub mod error;
pub mod service;
pub mod types;


pub use error::BudgetError;
pub use service::{BudgetReader, BudgetService};
pub use types::{
    Budget, BudgetCategory, BudgetCategorySnapshot, BudgetCategoryWithMeta, BudgetSnapshot,
    Category,
};
