//! Current vs previous window derivation.

use chrono::{DateTime, Duration, FixedOffset, TimeZone, Utc};
use serde::Serialize;

use super::calendar;

/// A normalized current window and the prior window it is compared against.
///
/// All four instants are inclusive bounds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(bound = "")]
pub struct ComparisonDates<Tz: TimeZone = FixedOffset> {
    /// First instant of the current window.
    pub start_date: DateTime<Tz>,
    /// Last instant of the current window.
    pub end_date: DateTime<Tz>,
    /// First instant of the previous window.
    pub comparison_start_date: DateTime<Tz>,
    /// Last instant of the previous window.
    pub comparison_end_date: DateTime<Tz>,
}

impl<Tz: TimeZone> ComparisonDates<Tz> {
    /// Derives the comparison windows for `[start, end]` as seen at `now`.
    ///
    /// - `end` is clamped to `now`, then `start` is clamped to `end`.
    /// - `start` is read as an instant and moved into `end`'s zone, so both bounds
    ///   are widened to whole days in that zone.
    /// - A window inside one calendar month is compared with the same days of the
    ///   previous month; a window covering the whole month is compared with the whole
    ///   previous month.
    /// - Any other window is compared with the block of `N` days right before it, where
    ///   `N` is the number of whole days between the normalized bounds.
    #[must_use]
    pub fn calculate(start: DateTime<Tz>, end: DateTime<Tz>, now: DateTime<Tz>) -> Self {
        let start = start.with_timezone(&end.timezone());
        let end = if end > now {
            now.with_timezone(&end.timezone())
        } else {
            end
        };
        let start = if start > end { end.clone() } else { start };

        let start_date = calendar::day_start(&start);
        let end_date = calendar::day_end(&end);

        if calendar::same_month(&start_date, &end_date) {
            let is_full_month = start_date == calendar::month_start(&start_date)
                && end_date == calendar::month_end(&end_date);

            let (comparison_start_date, comparison_end_date) = if is_full_month {
                let previous = calendar::previous_month(&start_date);
                (
                    calendar::month_start(&previous),
                    calendar::month_end(&previous),
                )
            } else {
                (
                    calendar::previous_month(&start_date),
                    calendar::previous_month(&end_date),
                )
            };

            return Self {
                start_date,
                end_date,
                comparison_start_date,
                comparison_end_date,
            };
        }

        let duration = end_date.clone().signed_duration_since(start_date.clone());
        let days = u64::try_from(duration.num_hours() / 24).unwrap_or(0);

        let comparison_end_date = start_date
            .clone()
            .checked_sub_signed(Duration::nanoseconds(1))
            .unwrap_or_else(|| start_date.clone());
        let comparison_start_date = calendar::days_before_start(&start_date, days);

        Self {
            start_date,
            end_date,
            comparison_start_date,
            comparison_end_date,
        }
    }

    /// Current window bounds in UTC, for repository queries.
    #[must_use]
    pub fn current_window_utc(&self) -> (DateTime<Utc>, DateTime<Utc>) {
        (
            self.start_date.with_timezone(&Utc),
            self.end_date.with_timezone(&Utc),
        )
    }

    /// Previous window bounds in UTC, for repository queries.
    #[must_use]
    pub fn comparison_window_utc(&self) -> (DateTime<Utc>, DateTime<Utc>) {
        (
            self.comparison_start_date.with_timezone(&Utc),
            self.comparison_end_date.with_timezone(&Utc),
        )
    }

    /// Converts every bound to its fixed UTC offset.
    #[must_use]
    pub fn fixed_offset(&self) -> ComparisonDates<FixedOffset> {
        ComparisonDates {
            start_date: self.start_date.fixed_offset(),
            end_date: self.end_date.fixed_offset(),
            comparison_start_date: self.comparison_start_date.fixed_offset(),
            comparison_end_date: self.comparison_end_date.fixed_offset(),
        }
    }
}
