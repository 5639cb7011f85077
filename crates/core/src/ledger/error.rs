//! Ledger query errors.

use thiserror::Error;

/// Boxed cause of a failed repository call.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors raised by repository implementations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// The backing store rejected or failed the query.
    #[error("query failed: {0}")]
    Query(#[source] BoxError),

    /// A stored value could not be mapped to a domain type.
    #[error("corrupt record: {0}")]
    Corrupt(String),
}

impl RepositoryError {
    /// Wraps a backend error.
    #[must_use]
    pub fn query(err: impl Into<BoxError>) -> Self {
        Self::Query(err.into())
    }

    /// Create a corrupt record error.
    #[must_use]
    pub fn corrupt(msg: impl Into<String>) -> Self {
        Self::Corrupt(msg.into())
    }
}

/// Rejected transaction filters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterError {
    /// `is_income` and `is_expense` were both set to true.
    #[error("a filter cannot select both incomes and expenses")]
    ConflictingDirection,

    /// Search text exceeds the accepted length.
    #[error("search text is {len} characters, maximum is {max}")]
    SearchTooLong {
        /// Length of the submitted text.
        len: usize,
        /// Maximum accepted length.
        max: usize,
    },

    /// The window ends before it starts.
    #[error("filter window ends before it starts")]
    InvertedWindow,
}

impl From<RepositoryError> for moneta_shared::AppError {
    fn from(err: RepositoryError) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<FilterError> for moneta_shared::AppError {
    fn from(err: FilterError) -> Self {
        Self::Validation(err.to_string())
    }
}
