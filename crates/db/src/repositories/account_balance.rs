//! Account balance repository: point-in-time balances from balance snapshots.

use chrono::{DateTime, Utc};
use moneta_core::ledger::{BalanceReader, RepositoryError};
use moneta_shared::types::{InstitutionId, Money, UserId};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Select,
};
use uuid::Uuid;

use crate::entities::{account_balances, accounts, sea_orm_active_enums::AccountType};

/// Account balance repository.
#[derive(Debug, Clone)]
pub struct AccountBalanceRepository {
    db: DatabaseConnection,
}

impl AccountBalanceRepository {
    /// Creates a new account balance repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

impl BalanceReader for AccountBalanceRepository {
    async fn balance_as_of(
        &self,
        user_id: UserId,
        as_of: DateTime<Utc>,
        institution_ids: &[InstitutionId],
    ) -> Result<Money, RepositoryError> {
        let latest: Vec<(Uuid, i64)> = latest_balances_query(user_id, as_of, institution_ids)
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(RepositoryError::query)?;

        Ok(latest
            .into_iter()
            .map(|(_, balance)| Money::from_minor(balance))
            .sum())
    }
}

/// Latest balance per bank account recorded at or before `as_of`.
///
/// One row per account through `DISTINCT ON (account_id)` ordered by date descending.
pub(crate) fn latest_balances_query(
    user_id: UserId,
    as_of: DateTime<Utc>,
    institution_ids: &[InstitutionId],
) -> Select<account_balances::Entity> {
    let mut query = account_balances::Entity::find()
        .select_only()
        .column(account_balances::Column::AccountId)
        .column(account_balances::Column::Balance)
        .distinct_on([(
            account_balances::Entity,
            account_balances::Column::AccountId,
        )])
        .inner_join(accounts::Entity)
        .filter(accounts::Column::UserId.eq(user_id.into_inner()))
        .filter(accounts::Column::AccountType.eq(AccountType::Bank))
        .filter(account_balances::Column::Date.lte(as_of));

    if !institution_ids.is_empty() {
        query = query.filter(
            accounts::Column::InstitutionId.is_in(institution_ids.iter().map(|id| id.into_inner())),
        );
    }

    query
        .order_by_asc(account_balances::Column::AccountId)
        .order_by_desc(account_balances::Column::Date)
}
