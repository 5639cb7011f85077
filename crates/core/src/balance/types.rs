//! Balance overview data types.

use chrono::{FixedOffset, TimeZone};
use moneta_shared::types::Money;
use serde::Serialize;

use crate::dates::ComparisonDates;

/// Current vs previous figures for one measure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Comparison {
    /// Value over the current window.
    pub current: Money,
    /// Value over the comparison window.
    pub previous: Money,
    /// Variation of `current` relative to `previous`, `10_000` = 100.00%.
    pub percentage_variation: i64,
}

impl Comparison {
    /// Pairs two figures and computes their variation.
    #[must_use]
    pub fn new(current: Money, previous: Money) -> Self {
        Self {
            current,
            previous,
            percentage_variation: crate::variation::calculate_percentage_variation(
                current.minor(),
                previous.minor(),
            ),
        }
    }
}

/// Balance overview for a window and the window before it.
///
/// Expenses are reported as positive amounts spent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(bound = "")]
pub struct BalanceSnapshot<Tz: TimeZone = FixedOffset> {
    /// Account balance at the end of each window.
    pub balance: Comparison,
    /// Income received in each window.
    pub income: Comparison,
    /// Money spent in each window.
    pub expense: Comparison,
    /// The windows the figures cover.
    pub dates: ComparisonDates<Tz>,
}

impl<Tz: TimeZone> BalanceSnapshot<Tz> {
    /// Re-expresses the windows with fixed UTC offsets.
    #[must_use]
    pub fn fixed_offset(self) -> BalanceSnapshot<FixedOffset> {
        BalanceSnapshot {
            balance: self.balance,
            income: self.income,
            expense: self.expense,
            dates: self.dates.fixed_offset(),
        }
    }
}
