//! Balance aggregation errors.

use moneta_shared::AppError;
use thiserror::Error;

use crate::ledger::{FilterError, RepositoryError};

/// Errors returned by [`super::BalanceService`].
#[derive(Debug, Error)]
pub enum BalanceError {
    /// No user was given.
    #[error("user id is required")]
    MissingUser,

    /// The transaction filter was rejected.
    #[error("invalid filter: {0}")]
    InvalidFilter(#[from] FilterError),

    /// One of the aggregate queries failed.
    #[error("repository error: {0}")]
    Repository(#[from] RepositoryError),
}

impl From<BalanceError> for AppError {
    fn from(err: BalanceError) -> Self {
        match err {
            BalanceError::MissingUser => Self::Validation(err.to_string()),
            BalanceError::InvalidFilter(e) => e.into(),
            BalanceError::Repository(e) => e.into(),
        }
    }
}
