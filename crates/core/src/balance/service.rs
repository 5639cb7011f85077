//! Balance aggregation service.

use std::sync::Arc;

use chrono::{DateTime, TimeZone};
use moneta_shared::types::UserId;
use tracing::{debug, instrument};

use super::error::BalanceError;
use super::types::{BalanceSnapshot, Comparison};
use crate::clock::Clock;
use crate::dates::ComparisonDates;
use crate::ledger::{BalanceReader, TransactionFilter, TransactionReader};

/// Builds balance overviews from ledger aggregates.
pub struct BalanceService<T, B, C>
where
    T: TransactionReader,
    B: BalanceReader,
    C: Clock,
{
    transactions: Arc<T>,
    balances: Arc<B>,
    clock: C,
}

impl<T, B, C> BalanceService<T, B, C>
where
    T: TransactionReader,
    B: BalanceReader,
    C: Clock,
{
    /// Create a new balance service.
    #[must_use]
    pub fn new(transactions: Arc<T>, balances: Arc<B>, clock: C) -> Self {
        Self {
            transactions,
            balances,
            clock,
        }
    }

    /// Computes balance, income and expense for `[start, end]` and the window before it.
    ///
    /// The six underlying queries run concurrently. The first failure is returned and
    /// the queries still in flight are dropped.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `user_id` is nil
    /// - `filter` fails validation
    /// - Any repository query fails
    #[instrument(skip_all, fields(user_id = %user_id))]
    pub async fn get_balance<Tz: TimeZone>(
        &self,
        user_id: UserId,
        filter: TransactionFilter,
        start: DateTime<Tz>,
        end: DateTime<Tz>,
    ) -> Result<BalanceSnapshot<Tz>, BalanceError> {
        if user_id.is_nil() {
            return Err(BalanceError::MissingUser);
        }
        filter.validate()?;

        let now = self.clock.now().with_timezone(&end.timezone());
        let dates = ComparisonDates::calculate(start, end, now);
        let current = dates.current_window_utc();
        let previous = dates.comparison_window_utc();
        debug!(?current, ?previous, "derived comparison windows");

        let income_filter = filter.clone().incomes();
        let expense_filter = filter.clone().expenses();
        let current_income = income_filter.clone().within(current);
        let previous_income = income_filter.within(previous);
        let current_expense = expense_filter.clone().within(current);
        let previous_expense = expense_filter.within(previous);

        let (
            current_balance,
            previous_balance,
            current_income,
            previous_income,
            current_expense,
            previous_expense,
        ) = tokio::try_join!(
            self.balances
                .balance_as_of(user_id, current.1, &filter.institution_ids),
            self.balances
                .balance_as_of(user_id, previous.1, &filter.institution_ids),
            self.transactions.sum_amount(user_id, &current_income),
            self.transactions.sum_amount(user_id, &previous_income),
            self.transactions.sum_amount(user_id, &current_expense),
            self.transactions.sum_amount(user_id, &previous_expense),
        )?;

        Ok(BalanceSnapshot {
            balance: Comparison::new(current_balance, previous_balance),
            income: Comparison::new(current_income, previous_income),
            expense: Comparison::new(-current_expense, -previous_expense),
            dates,
        })
    }
}
