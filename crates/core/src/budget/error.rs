//! Budget aggregation errors.

use chrono::NaiveDate;
use moneta_shared::types::UserId;
use moneta_shared::AppError;
use thiserror::Error;

use crate::ledger::RepositoryError;

/// Errors returned by [`super::BudgetService`].
#[derive(Debug, Error)]
pub enum BudgetError {
    /// The user has no budget for the month.
    #[error("no budget for user {user_id} in {}", month.format("%Y-%m"))]
    NotFound {
        /// Owner of the budget.
        user_id: UserId,
        /// First day of the requested month.
        month: NaiveDate,
    },

    /// No user was given.
    #[error("user id is required")]
    MissingUser,

    /// A repository query failed.
    #[error("repository error: {0}")]
    Repository(#[from] RepositoryError),
}

impl BudgetError {
    /// Create a not found error.
    #[must_use]
    pub fn not_found(user_id: UserId, month: NaiveDate) -> Self {
        Self::NotFound { user_id, month }
    }
}

impl From<BudgetError> for AppError {
    fn from(err: BudgetError) -> Self {
        match err {
            BudgetError::NotFound { .. } => Self::NotFound(err.to_string()),
            BudgetError::MissingUser => Self::Validation(err.to_string()),
            BudgetError::Repository(e) => e.into(),
        }
    }
}
