//! Predicates for transaction aggregate queries.

use chrono::{DateTime, Utc};
use moneta_shared::types::{CategoryId, InstitutionId, PaymentMethodId};
use serde::{Deserialize, Serialize};

use super::error::FilterError;

/// Maximum accepted length of the free-text search, in characters.
pub const MAX_SEARCH_LEN: usize = 255;

/// Narrows which transactions an aggregate query covers.
///
/// Every field is optional; an empty filter matches all of a user's transactions.
/// Id lists match any of their members, and an empty list does not constrain.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionFilter {
    /// Case-insensitive match against the description.
    pub search: Option<String>,
    /// Restrict to these categories.
    pub category_ids: Vec<CategoryId>,
    /// Restrict to accounts held at these institutions.
    pub institution_ids: Vec<InstitutionId>,
    /// Restrict to these payment methods.
    pub payment_method_ids: Vec<PaymentMethodId>,
    /// `Some(true)` keeps only outflows (negative amounts).
    pub is_expense: Option<bool>,
    /// `Some(true)` keeps only inflows (positive amounts).
    pub is_income: Option<bool>,
    /// Match on the user's "ignore in totals" flag.
    pub is_ignored: Option<bool>,
    /// Inclusive lower bound on the transaction date.
    pub start_date: Option<DateTime<Utc>>,
    /// Inclusive upper bound on the transaction date.
    pub end_date: Option<DateTime<Utc>>,
}

impl TransactionFilter {
    /// Creates an empty filter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Keeps only expenses.
    #[must_use]
    pub fn expenses(mut self) -> Self {
        self.is_expense = Some(true);
        self.is_income = None;
        self
    }

    /// Keeps only incomes.
    #[must_use]
    pub fn incomes(mut self) -> Self {
        self.is_income = Some(true);
        self.is_expense = None;
        self
    }

    /// Drops transactions the user flagged as ignored.
    #[must_use]
    pub fn excluding_ignored(mut self) -> Self {
        self.is_ignored = Some(false);
        self
    }

    /// Bounds the filter to `[start, end]`.
    #[must_use]
    pub fn within(mut self, (start, end): (DateTime<Utc>, DateTime<Utc>)) -> Self {
        self.start_date = Some(start);
        self.end_date = Some(end);
        self
    }

    /// Returns true when the filter selects by free text.
    #[must_use]
    pub fn has_search(&self) -> bool {
        self.search.as_deref().is_some_and(|s| !s.trim().is_empty())
    }

    /// Checks that the filter can match anything meaningful.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError`] when both directions are requested, the search text is
    /// too long, or the window is inverted.
    pub fn validate(&self) -> Result<(), FilterError> {
        if self.is_expense == Some(true) && self.is_income == Some(true) {
            return Err(FilterError::ConflictingDirection);
        }

        if let Some(search) = &self.search {
            let len = search.chars().count();
            if len > MAX_SEARCH_LEN {
                return Err(FilterError::SearchTooLong {
                    len,
                    max: MAX_SEARCH_LEN,
                });
            }
        }

        if let (Some(start), Some(end)) = (self.start_date, self.end_date)
            && start > end
        {
            return Err(FilterError::InvertedWindow);
        }

        Ok(())
    }
}
