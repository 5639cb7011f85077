//! Budget aggregation service.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, TimeZone};
use moneta_shared::types::{BudgetId, CategoryId, Money, UserId};
use tracing::{debug, instrument};

use super::error::BudgetError;
use super::types::{Budget, BudgetCategorySnapshot, BudgetCategoryWithMeta, BudgetSnapshot};
use crate::clock::Clock;
use crate::dates::{ComparisonDates, calendar};
use crate::ledger::{RepositoryError, TransactionFilter, TransactionReader};
use crate::variation::calculate_percentage_variation;

/// Repository trait for budget lookups.
///
/// This trait is implemented by the db crate to provide actual database operations.
pub trait BudgetReader: Send + Sync {
    /// Find the user's budget for the month starting on `month_start`.
    fn find_budget(
        &self,
        user_id: UserId,
        month_start: NaiveDate,
    ) -> impl std::future::Future<Output = Result<Option<Budget>, RepositoryError>> + Send;

    /// List the categories planned in a budget, with their category details.
    fn list_budget_categories(
        &self,
        budget_id: BudgetId,
    ) -> impl std::future::Future<Output = Result<Vec<BudgetCategoryWithMeta>, RepositoryError>>
    + Send;
}

/// Computes how much of a monthly budget has been consumed.
pub struct BudgetService<R, T, C>
where
    R: BudgetReader,
    T: TransactionReader,
    C: Clock,
{
    budgets: Arc<R>,
    transactions: Arc<T>,
    clock: C,
}

impl<R, T, C> BudgetService<R, T, C>
where
    R: BudgetReader,
    T: TransactionReader,
    C: Clock,
{
    /// Create a new budget service.
    #[must_use]
    pub fn new(budgets: Arc<R>, transactions: Arc<T>, clock: C) -> Self {
        Self {
            budgets,
            transactions,
            clock,
        }
    }

    /// Builds the consumption snapshot of the budget for the month containing `date`.
    ///
    /// Spending is compared with the previous month using the same budget amount.
    /// Per-day figures are only computed when `date` falls in the current month, as
    /// seen in `date`'s time zone.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `user_id` is nil
    /// - The user has no budget for the month
    /// - Any repository query fails
    #[instrument(skip_all, fields(user_id = %user_id, month = %date.date_naive().format("%Y-%m")))]
    pub async fn get_budget<Tz: TimeZone>(
        &self,
        user_id: UserId,
        date: DateTime<Tz>,
    ) -> Result<BudgetSnapshot<Tz>, BudgetError> {
        if user_id.is_nil() {
            return Err(BudgetError::MissingUser);
        }

        let tz = date.timezone();
        let now = self.clock.now().with_timezone(&tz);
        let month_start = calendar::month_start(&date);
        let dates = ComparisonDates::calculate(
            month_start.clone(),
            calendar::month_end(&date),
            now.clone(),
        );
        let current = dates.current_window_utc();
        let previous = dates.comparison_window_utc();
        debug!(?current, ?previous, "derived comparison windows");

        let month = month_start.date_naive();
        let budget = self
            .budgets
            .find_budget(user_id, month)
            .await?
            .ok_or_else(|| BudgetError::not_found(user_id, month))?;

        let expenses = TransactionFilter::new().expenses().excluding_ignored();
        let current_filter = expenses.clone().within(current);
        let previous_filter = expenses.within(previous);

        let (categories, spent_by_category, previous_total) = tokio::try_join!(
            self.budgets.list_budget_categories(budget.id),
            self.transactions
                .sum_amount_by_category(user_id, &current_filter),
            self.transactions.sum_amount(user_id, &previous_filter),
        )?;

        let spent = -spent_by_category.values().sum::<Money>();
        let previous_spent = -previous_total;
        let available = budget.amount - spent;
        let available_previous = budget.amount - previous_spent;
        let available_percentage_variation =
            calculate_percentage_variation(available.minor(), available_previous.minor());

        let (available_per_day, available_per_day_percentage_variation) =
            if calendar::same_month(&date, &now) {
                let current_per_day = per_day(
                    available,
                    calendar::days_remaining_in_month(now.date_naive()),
                );
                let previous_per_day = per_day(
                    available_previous,
                    calendar::days_remaining_in_month(dates.comparison_end_date.date_naive()),
                );
                (
                    Some(current_per_day),
                    Some(calculate_percentage_variation(
                        current_per_day.minor(),
                        previous_per_day.minor(),
                    )),
                )
            } else {
                (None, None)
            };

        Ok(BudgetSnapshot {
            categories: category_snapshots(categories, &spent_by_category),
            budget,
            spent,
            previous_spent,
            available,
            available_percentage_variation,
            available_per_day,
            available_per_day_percentage_variation,
            dates,
        })
    }
}

/// Splits `amount` evenly over `days`, truncating toward zero.
fn per_day(amount: Money, days: u32) -> Money {
    Money::from_minor(amount.minor() / i64::from(days.max(1)))
}

fn category_snapshots(
    categories: Vec<BudgetCategoryWithMeta>,
    spent_by_category: &HashMap<Option<CategoryId>, Money>,
) -> Vec<BudgetCategorySnapshot> {
    categories
        .into_iter()
        .map(|row| {
            let spent = -spent_by_category
                .get(&Some(row.budget_category.category_id))
                .copied()
                .unwrap_or_default();
            BudgetCategorySnapshot {
                available: row.budget_category.amount - spent,
                spent,
                budget_category: row.budget_category,
                category: row.category,
            }
        })
        .collect()
}
