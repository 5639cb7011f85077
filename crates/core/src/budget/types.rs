//! Budget data types.

use chrono::{FixedOffset, NaiveDate, TimeZone};
use moneta_shared::types::{BudgetCategoryId, BudgetId, CategoryId, Money, UserId};
use serde::{Deserialize, Serialize};

use crate::dates::ComparisonDates;

/// A monthly spending budget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Budget {
    /// Budget ID.
    pub id: BudgetId,
    /// Owner.
    pub user_id: UserId,
    /// Total amount planned for the month.
    pub amount: Money,
    /// First day of the month the budget covers.
    pub date: NaiveDate,
}

/// A transaction category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Category ID.
    pub id: CategoryId,
    /// Display name.
    pub name: String,
    /// Icon identifier, if any.
    pub icon: Option<String>,
}

/// The share of a budget planned for one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetCategory {
    /// Budget category ID.
    pub id: BudgetCategoryId,
    /// Parent budget.
    pub budget_id: BudgetId,
    /// Category the amount is planned for.
    pub category_id: CategoryId,
    /// Planned amount.
    pub amount: Money,
}

/// A budget category joined with its category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BudgetCategoryWithMeta {
    /// The planned amount row.
    pub budget_category: BudgetCategory,
    /// Category details.
    pub category: Category,
}

/// Consumption of one budget category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BudgetCategorySnapshot {
    /// The planned amount row.
    #[serde(flatten)]
    pub budget_category: BudgetCategory,
    /// Category details.
    pub category: Category,
    /// Spent in the category during the current window.
    pub spent: Money,
    /// `amount - spent`.
    pub available: Money,
}

/// Consumption of a budget, compared with the previous month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(bound = "")]
pub struct BudgetSnapshot<Tz: TimeZone = FixedOffset> {
    /// The stored budget.
    #[serde(flatten)]
    pub budget: Budget,
    /// Spent during the current window.
    pub spent: Money,
    /// Spent during the comparison window.
    pub previous_spent: Money,
    /// `amount - spent`.
    pub available: Money,
    /// Variation of `available` against what the same amount would have left in the
    /// comparison window.
    pub available_percentage_variation: i64,
    /// What may still be spent per remaining day. Only set for the current month.
    pub available_per_day: Option<Money>,
    /// Variation of `available_per_day` against the comparison window. Only set for the
    /// current month.
    pub available_per_day_percentage_variation: Option<i64>,
    /// Per-category consumption.
    pub categories: Vec<BudgetCategorySnapshot>,
    /// The windows the figures cover.
    pub dates: ComparisonDates<Tz>,
}

impl<Tz: TimeZone> BudgetSnapshot<Tz> {
    /// Re-expresses the windows with fixed UTC offsets.
    #[must_use]
    pub fn fixed_offset(self) -> BudgetSnapshot<FixedOffset> {
        BudgetSnapshot {
            dates: self.dates.fixed_offset(),
            budget: self.budget,
            spent: self.spent,
            previous_spent: self.previous_spent,
            available: self.available,
            available_percentage_variation: self.available_percentage_variation,
            available_per_day: self.available_per_day,
            available_per_day_percentage_variation: self.available_per_day_percentage_variation,
            categories: self.categories,
        }
    }
}
