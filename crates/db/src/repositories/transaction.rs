//! Transaction repository: filtered sums over the transactions table.

use std::collections::HashMap;

use moneta_core::ledger::{RepositoryError, TransactionFilter, TransactionReader};
use moneta_shared::types::{CategoryId, Money, UserId};
use sea_orm::sea_query::{Alias, Expr, Func, LikeExpr, SimpleExpr};
use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter, QuerySelect, QueryTrait,
    Select,
};
use uuid::Uuid;

use crate::entities::{accounts, transactions};

/// Transaction repository for aggregate queries.
#[derive(Debug, Clone)]
pub struct TransactionRepository {
    db: DatabaseConnection,
}

impl TransactionRepository {
    /// Creates a new transaction repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

impl TransactionReader for TransactionRepository {
    async fn sum_amount(
        &self,
        user_id: UserId,
        filter: &TransactionFilter,
    ) -> Result<Money, RepositoryError> {
        let total: Option<i64> = sum_query(user_id, filter)
            .into_tuple()
            .one(&self.db)
            .await
            .map_err(RepositoryError::query)?;

        Ok(total.map(Money::from_minor).unwrap_or_default())
    }

    async fn sum_amount_by_category(
        &self,
        user_id: UserId,
        filter: &TransactionFilter,
    ) -> Result<HashMap<Option<CategoryId>, Money>, RepositoryError> {
        let rows: Vec<(Option<Uuid>, i64)> = sum_by_category_query(user_id, filter)
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(RepositoryError::query)?;

        Ok(rows
            .into_iter()
            .map(|(category_id, total)| {
                (category_id.map(CategoryId::from), Money::from_minor(total))
            })
            .collect())
    }
}

/// `COALESCE(CAST(SUM(transactions.amount) AS BIGINT), 0)`
///
/// Postgres widens `SUM(bigint)` to numeric, so the cast keeps it decodable as `i64`.
fn total_amount() -> SimpleExpr {
    Func::coalesce([
        Func::cast_as(
            Func::sum(Expr::col((transactions::Entity, transactions::Column::Amount))),
            Alias::new("BIGINT"),
        )
        .into(),
        Expr::val(0_i64).into(),
    ])
    .into()
}

pub(crate) fn sum_query(user_id: UserId, filter: &TransactionFilter) -> Select<transactions::Entity> {
    transactions::Entity::find()
        .select_only()
        .column_as(total_amount(), "total")
        .filter(filter_condition(user_id, filter))
}

pub(crate) fn sum_by_category_query(
    user_id: UserId,
    filter: &TransactionFilter,
) -> Select<transactions::Entity> {
    transactions::Entity::find()
        .select_only()
        .column(transactions::Column::CategoryId)
        .column_as(total_amount(), "total")
        .filter(filter_condition(user_id, filter))
        .group_by(transactions::Column::CategoryId)
}

/// Translates a filter into a `WHERE` condition scoped to one user.
pub(crate) fn filter_condition(user_id: UserId, filter: &TransactionFilter) -> Condition {
    let mut condition =
        Condition::all().add(transactions::Column::UserId.eq(user_id.into_inner()));

    if let Some(start) = filter.start_date {
        condition = condition.add(transactions::Column::Date.gte(start));
    }
    if let Some(end) = filter.end_date {
        condition = condition.add(transactions::Column::Date.lte(end));
    }
    if filter.is_expense == Some(true) {
        condition = condition.add(transactions::Column::Amount.lt(0));
    }
    if filter.is_income == Some(true) {
        condition = condition.add(transactions::Column::Amount.gt(0));
    }
    if let Some(ignored) = filter.is_ignored {
        condition = condition.add(transactions::Column::IsIgnored.eq(ignored));
    }
    if !filter.category_ids.is_empty() {
        condition = condition.add(
            transactions::Column::CategoryId
                .is_in(filter.category_ids.iter().map(|id| id.into_inner())),
        );
    }
    if !filter.payment_method_ids.is_empty() {
        condition = condition.add(
            transactions::Column::PaymentMethodId
                .is_in(filter.payment_method_ids.iter().map(|id| id.into_inner())),
        );
    }
    if !filter.institution_ids.is_empty() {
        let accounts_at_institutions = accounts::Entity::find()
            .select_only()
            .column(accounts::Column::Id)
            .filter(
                accounts::Column::InstitutionId
                    .is_in(filter.institution_ids.iter().map(|id| id.into_inner())),
            )
            .into_query();
        condition = condition
            .add(transactions::Column::AccountId.in_subquery(accounts_at_institutions));
    }
    if let Some(search) = filter.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        let pattern = format!("%{}%", escape_like(&search.to_lowercase()));
        condition = condition.add(
            Expr::expr(Func::lower(Expr::col((
                transactions::Entity,
                transactions::Column::Description,
            ))))
            .like(LikeExpr::new(pattern).escape('\\')),
        );
    }

    condition
}

/// Escapes `LIKE` wildcards so user text matches literally.
pub(crate) fn escape_like(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
#[path = "transaction_tests.rs"]
mod tests;
