//! Budget repository for budget lookups.

use chrono::NaiveDate;
use moneta_core::budget::{Budget, BudgetCategory, BudgetCategoryWithMeta, BudgetReader, Category};
use moneta_core::ledger::RepositoryError;
use moneta_shared::types::{BudgetId, Money, UserId};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};

use crate::entities::{budget_categories, budgets, categories};

/// Budget repository.
#[derive(Debug, Clone)]
pub struct BudgetRepository {
    db: DatabaseConnection,
}

impl BudgetRepository {
    /// Creates a new budget repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

impl BudgetReader for BudgetRepository {
    async fn find_budget(
        &self,
        user_id: UserId,
        month_start: NaiveDate,
    ) -> Result<Option<Budget>, RepositoryError> {
        let model = budgets::Entity::find()
            .filter(budgets::Column::UserId.eq(user_id.into_inner()))
            .filter(budgets::Column::Date.eq(month_start))
            .one(&self.db)
            .await
            .map_err(RepositoryError::query)?;

        Ok(model.map(to_budget))
    }

    async fn list_budget_categories(
        &self,
        budget_id: BudgetId,
    ) -> Result<Vec<BudgetCategoryWithMeta>, RepositoryError> {
        let rows = budget_categories::Entity::find()
            .filter(budget_categories::Column::BudgetId.eq(budget_id.into_inner()))
            .find_also_related(categories::Entity)
            .order_by_asc(categories::Column::Name)
            .all(&self.db)
            .await
            .map_err(RepositoryError::query)?;

        rows.into_iter()
            .map(|(row, category)| {
                let category = category.ok_or_else(|| {
                    RepositoryError::corrupt(format!(
                        "budget category {} references missing category {}",
                        row.id, row.category_id
                    ))
                })?;
                Ok(BudgetCategoryWithMeta {
                    budget_category: to_budget_category(row),
                    category: to_category(category),
                })
            })
            .collect()
    }
}

fn to_budget(model: budgets::Model) -> Budget {
    Budget {
        id: model.id.into(),
        user_id: model.user_id.into(),
        amount: Money::from_minor(model.amount),
        date: model.date,
    }
}

fn to_budget_category(model: budget_categories::Model) -> BudgetCategory {
    BudgetCategory {
        id: model.id.into(),
        budget_id: model.budget_id.into(),
        category_id: model.category_id.into(),
        amount: Money::from_minor(model.amount),
    }
}

fn to_category(model: categories::Model) -> Category {
    Category {
        id: model.id.into(),
        name: model.name,
        icon: model.icon,
    }
}

#[cfg(test)]
#[path = "budget_tests.rs"]
mod tests;
