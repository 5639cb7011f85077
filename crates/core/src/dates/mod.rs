//! Date windows for period comparisons.
//!
//! This module derives the "current" and "previous" windows that balances and
//! budgets are compared over:
//! - Day and month boundaries in the caller's time zone
//! - Month-aware comparison windows (Feb vs Jan keeps correct day counts)
//! - Resolution of optional request bounds

pub mod calendar;
pub mod comparison;

#[cfg(test)]
mod tests;

use chrono::{DateTime, TimeZone};

pub use comparison::ComparisonDates;

/// A requested window whose bounds may be omitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateRange<Tz: TimeZone> {
    /// Requested start.
    pub start: Option<DateTime<Tz>>,
    /// Requested end.
    pub end: Option<DateTime<Tz>>,
}

impl<Tz: TimeZone> DateRange<Tz> {
    /// Creates a range from optional bounds.
    #[must_use]
    pub const fn new(start: Option<DateTime<Tz>>, end: Option<DateTime<Tz>>) -> Self {
        Self { start, end }
    }

    /// Fills in missing bounds.
    ///
    /// A missing end means `now`. A missing start means all time: the start of
    /// [`calendar::LEDGER_EPOCH`] in the end's zone, which no ledger record predates
    /// and which still fits the database's timestamp range.
    #[must_use]
    pub fn resolve(self, now: DateTime<Tz>) -> (DateTime<Tz>, DateTime<Tz>) {
        let end = self.end.unwrap_or(now);
        let start = self
            .start
            .unwrap_or_else(|| calendar::at_day_start(&end.timezone(), calendar::LEDGER_EPOCH));
        (start, end)
    }
}
