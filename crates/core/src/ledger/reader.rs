//! Read-side repository contracts for transactions and balances.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use moneta_shared::types::{CategoryId, InstitutionId, Money, UserId};

use super::error::RepositoryError;
use super::filter::TransactionFilter;

/// Aggregates over a user's transactions.
///
/// Implemented by the db crate. Amounts carry their sign: incomes are positive and
/// expenses negative.
pub trait TransactionReader: Send + Sync {
    /// Sum of the amounts matching `filter`. No matches sum to zero.
    fn sum_amount(
        &self,
        user_id: UserId,
        filter: &TransactionFilter,
    ) -> impl std::future::Future<Output = Result<Money, RepositoryError>> + Send;

    /// Sums of the amounts matching `filter`, grouped by category.
    ///
    /// Uncategorized transactions are grouped under `None`. Categories without
    /// matches are absent from the map.
    fn sum_amount_by_category(
        &self,
        user_id: UserId,
        filter: &TransactionFilter,
    ) -> impl std::future::Future<Output = Result<HashMap<Option<CategoryId>, Money>, RepositoryError>>
    + Send;
}

/// Point-in-time account balances.
pub trait BalanceReader: Send + Sync {
    /// Sum over the user's bank accounts of each account's latest balance recorded
    /// at or before `as_of`.
    ///
    /// An empty `institution_ids` covers every institution. Accounts without a
    /// record before `as_of` contribute nothing.
    fn balance_as_of(
        &self,
        user_id: UserId,
        as_of: DateTime<Utc>,
        institution_ids: &[InstitutionId],
    ) -> impl std::future::Future<Output = Result<Money, RepositoryError>> + Send;
}
