//! Tests for comparison window derivation.

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, TimeZone, Timelike, Utc};
use proptest::prelude::*;
use rstest::rstest;

use super::calendar::{self, END_OF_DAY};
use super::{ComparisonDates, DateRange};

fn ts(s: &str) -> DateTime<FixedOffset> {
    DateTime::parse_from_rfc3339(s).unwrap()
}

/// An evaluation time far after every fixture so no clamping happens.
fn far_future() -> DateTime<FixedOffset> {
    ts("2030-01-01T00:00:00-03:00")
}

#[rstest]
// Full month compares with the full previous month.
#[case(
    "2024-11-01T00:00:00-03:00",
    "2024-11-30T23:59:59.999999999-03:00",
    "2024-10-01T00:00:00-03:00",
    "2024-10-31T23:59:59.999999999-03:00"
)]
// Window spanning two months compares with the block of days right before it.
#[case(
    "2024-10-31T00:00:00-03:00",
    "2024-11-11T23:59:59.999999999-03:00",
    "2024-10-20T00:00:00-03:00",
    "2024-10-30T23:59:59.999999999-03:00"
)]
// March compares with a 29-day February in a leap year.
#[case(
    "2024-03-01T00:00:00-03:00",
    "2024-03-31T23:59:59.999999999-03:00",
    "2024-02-01T00:00:00-03:00",
    "2024-02-29T23:59:59.999999999-03:00"
)]
// ...and with a 28-day February otherwise.
#[case(
    "2023-03-01T00:00:00-03:00",
    "2023-03-31T23:59:59.999999999-03:00",
    "2023-02-01T00:00:00-03:00",
    "2023-02-28T23:59:59.999999999-03:00"
)]
// February compares with the full 31-day January.
#[case(
    "2024-02-01T00:00:00-03:00",
    "2024-02-29T23:59:59.999999999-03:00",
    "2024-01-01T00:00:00-03:00",
    "2024-01-31T23:59:59.999999999-03:00"
)]
// January compares with December of the previous year.
#[case(
    "2024-01-01T00:00:00-03:00",
    "2024-01-31T23:59:59.999999999-03:00",
    "2023-12-01T00:00:00-03:00",
    "2023-12-31T23:59:59.999999999-03:00"
)]
// Partial month keeps the same day numbers.
#[case(
    "2024-03-01T00:00:00-03:00",
    "2024-03-15T23:59:59.999999999-03:00",
    "2024-02-01T00:00:00-03:00",
    "2024-02-15T23:59:59.999999999-03:00"
)]
// Day-of-month overflow clamps to the last day of the target month.
#[case(
    "2023-03-30T00:00:00-03:00",
    "2023-03-31T23:59:59.999999999-03:00",
    "2023-02-28T00:00:00-03:00",
    "2023-02-28T23:59:59.999999999-03:00"
)]
// Month-end without month-start is still a partial comparison.
#[case(
    "2024-05-10T00:00:00-03:00",
    "2024-05-31T23:59:59.999999999-03:00",
    "2024-04-10T00:00:00-03:00",
    "2024-04-30T23:59:59.999999999-03:00"
)]
// Two aligned months are not a month comparison: 60 whole days before.
#[case(
    "2024-10-01T00:00:00-03:00",
    "2024-11-30T23:59:59.999999999-03:00",
    "2024-08-02T00:00:00-03:00",
    "2024-09-30T23:59:59.999999999-03:00"
)]
fn test_comparison_windows(
    #[case] start: &str,
    #[case] end: &str,
    #[case] expected_start: &str,
    #[case] expected_end: &str,
) {
    let dates = ComparisonDates::calculate(ts(start), ts(end), far_future());

    assert_eq!(dates.start_date, ts(start));
    assert_eq!(dates.end_date, ts(end));
    assert_eq!(dates.comparison_start_date, ts(expected_start));
    assert_eq!(dates.comparison_end_date, ts(expected_end));
}

#[test]
fn test_bounds_are_normalized_to_whole_days() {
    let dates = ComparisonDates::calculate(
        ts("2024-11-01T10:30:00-03:00"),
        ts("2024-11-30T08:00:00-03:00"),
        far_future(),
    );

    assert_eq!(dates.start_date, ts("2024-11-01T00:00:00-03:00"));
    assert_eq!(dates.end_date, ts("2024-11-30T23:59:59.999999999-03:00"));
    // Normalization makes the window a full month.
    assert_eq!(dates.comparison_start_date, ts("2024-10-01T00:00:00-03:00"));
    assert_eq!(
        dates.comparison_end_date,
        ts("2024-10-31T23:59:59.999999999-03:00")
    );
}

#[test]
fn test_future_end_is_clamped_to_today() {
    let now = ts("2024-11-19T15:00:00-03:00");

    let dates = ComparisonDates::calculate(
        ts("2024-11-01T00:00:00-03:00"),
        ts("2024-11-30T23:59:59.999999999-03:00"),
        now,
    );

    assert_eq!(dates.start_date, ts("2024-11-01T00:00:00-03:00"));
    assert_eq!(dates.end_date, ts("2024-11-19T23:59:59.999999999-03:00"));
    assert_eq!(dates.comparison_start_date, ts("2024-10-01T00:00:00-03:00"));
    assert_eq!(
        dates.comparison_end_date,
        ts("2024-10-19T23:59:59.999999999-03:00")
    );
}

#[test]
fn test_start_after_end_is_clamped_to_end() {
    let dates = ComparisonDates::calculate(
        ts("2024-11-20T00:00:00-03:00"),
        ts("2024-11-10T12:00:00-03:00"),
        far_future(),
    );

    assert_eq!(dates.start_date, ts("2024-11-10T00:00:00-03:00"));
    assert_eq!(dates.end_date, ts("2024-11-10T23:59:59.999999999-03:00"));
    assert_eq!(dates.comparison_start_date, ts("2024-10-10T00:00:00-03:00"));
    assert_eq!(
        dates.comparison_end_date,
        ts("2024-10-10T23:59:59.999999999-03:00")
    );
}

#[test]
fn test_start_and_end_both_in_future() {
    let now = ts("2024-11-19T15:00:00-03:00");

    let dates = ComparisonDates::calculate(
        ts("2024-12-01T00:00:00-03:00"),
        ts("2024-12-31T23:59:59.999999999-03:00"),
        now,
    );

    assert_eq!(dates.start_date, ts("2024-11-19T00:00:00-03:00"));
    assert_eq!(dates.end_date, ts("2024-11-19T23:59:59.999999999-03:00"));
}

#[test]
fn test_windows_follow_the_input_offset() {
    let dates = ComparisonDates::calculate(
        ts("2024-11-01T00:00:00+09:00"),
        ts("2024-11-30T23:59:59.999999999+09:00"),
        far_future(),
    );

    assert_eq!(dates.comparison_start_date, ts("2024-10-01T00:00:00+09:00"));
    assert_eq!(dates.comparison_start_date.offset().local_minus_utc(), 9 * 3600);
}

#[test]
fn test_named_time_zone_full_month() {
    let tz = chrono_tz::America::Sao_Paulo;
    let start = tz.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
    let end = calendar::month_end(&start);
    let now = tz.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap();

    let dates = ComparisonDates::calculate(start, end, now);

    assert_eq!(
        dates.comparison_start_date.date_naive(),
        NaiveDate::from_ymd_opt(2024, 2, 1).unwrap()
    );
    assert_eq!(
        dates.comparison_end_date.date_naive(),
        NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
    );
    assert_eq!(dates.comparison_end_date.time(), END_OF_DAY);
}

#[test]
fn test_utc_windows_for_queries() {
    let dates = ComparisonDates::calculate(
        ts("2024-11-01T00:00:00-03:00"),
        ts("2024-11-30T23:59:59.999999999-03:00"),
        far_future(),
    );

    let (start, end) = dates.current_window_utc();
    assert_eq!(start, Utc.with_ymd_and_hms(2024, 11, 1, 3, 0, 0).unwrap());
    assert_eq!(end.date_naive(), NaiveDate::from_ymd_opt(2024, 12, 1).unwrap());

    let (comparison_start, _) = dates.comparison_window_utc();
    assert_eq!(
        comparison_start,
        Utc.with_ymd_and_hms(2024, 10, 1, 3, 0, 0).unwrap()
    );
}

#[test]
fn test_start_is_read_in_the_end_zone() {
    // The same instant as Nov 1 00:00 at -03:00.
    let dates = ComparisonDates::calculate(
        ts("2024-11-01T03:00:00Z"),
        ts("2024-11-30T23:59:59.999999999-03:00"),
        far_future(),
    );

    assert_eq!(dates.start_date, ts("2024-11-01T00:00:00-03:00"));
    assert_eq!(dates.start_date.offset().local_minus_utc(), -3 * 3600);
    assert_eq!(dates.comparison_start_date, ts("2024-10-01T00:00:00-03:00"));
    assert_eq!(
        dates.comparison_end_date,
        ts("2024-10-31T23:59:59.999999999-03:00")
    );
}

#[test]
fn test_start_can_land_on_another_day_in_the_end_zone() {
    let dates = ComparisonDates::calculate(
        ts("2024-11-01T00:00:00+01:00"),
        ts("2024-11-10T12:00:00-03:00"),
        far_future(),
    );

    assert_eq!(dates.start_date, ts("2024-10-31T00:00:00-03:00"));
}

#[test]
fn test_date_range_defaults_to_all_time() {
    let now = ts("2024-11-19T15:00:00-03:00");

    let (start, end) = DateRange::new(None, None).resolve(now);

    assert_eq!(start, ts("1970-01-01T00:00:00-03:00"));
    assert_eq!(end, now);

    let dates = ComparisonDates::calculate(start, end, now);
    assert_eq!(dates.start_date, ts("1970-01-01T00:00:00-03:00"));
    assert_eq!(dates.end_date, ts("2024-11-19T23:59:59.999999999-03:00"));
    assert_eq!(
        dates.comparison_end_date,
        ts("1969-12-31T23:59:59.999999999-03:00")
    );
    assert!(dates.comparison_start_date < dates.comparison_end_date);
}

#[test]
fn test_date_range_keeps_explicit_bounds() {
    let now = ts("2024-11-19T15:00:00-03:00");
    let explicit_start = ts("2024-09-05T00:00:00-03:00");
    let explicit_end = ts("2024-10-05T00:00:00-03:00");

    let (start, end) = DateRange::new(Some(explicit_start), Some(explicit_end)).resolve(now);
    assert_eq!((start, end), (explicit_start, explicit_end));

    let (start, _) = DateRange::new(None, Some(explicit_end)).resolve(now);
    assert_eq!(start, ts("1970-01-01T00:00:00-03:00"));
}

fn offset() -> FixedOffset {
    FixedOffset::west_opt(3 * 3600).unwrap()
}

proptest! {
    /// Calculation is a pure function of its inputs.
    #[test]
    fn prop_calculation_is_idempotent(
        start_secs in 946_684_800i64..1_893_456_000,
        span_secs in 0i64..40_000_000,
    ) {
        let start = offset().timestamp_opt(start_secs, 0).unwrap();
        let end = offset().timestamp_opt(start_secs + span_secs, 0).unwrap();
        let now = offset().timestamp_opt(1_893_456_000, 0).unwrap();

        let first = ComparisonDates::calculate(start, end, now);
        let second = ComparisonDates::calculate(start, end, now);
        prop_assert_eq!(first, second);
    }

    /// Every full month compares with the full month before it.
    #[test]
    fn prop_full_month_compares_with_previous_full_month(
        year in 1990i32..2090,
        month in 1u32..=12,
    ) {
        let first = NaiveDate::from_ymd_opt(year, month, 1).unwrap();
        let start = calendar::at_day_start(&offset(), first);
        let end = calendar::month_end(&start);
        let now = offset().with_ymd_and_hms(2100, 1, 1, 0, 0, 0).unwrap();

        let dates = ComparisonDates::calculate(start, end, now);

        let previous = first.checked_sub_months(chrono::Months::new(1)).unwrap();
        prop_assert_eq!(dates.comparison_start_date, calendar::at_day_start(&offset(), previous));
        prop_assert_eq!(
            dates.comparison_end_date,
            calendar::at_day_end(&offset(), calendar::last_day_of_month(previous))
        );
    }

    /// Windows are ordered, whole-day aligned and never reach past today.
    #[test]
    fn prop_windows_are_ordered_and_clamped(
        start_secs in 946_684_800i64..1_893_456_000,
        end_secs in 946_684_800i64..1_893_456_000,
        now_secs in 946_684_800i64..1_893_456_000,
    ) {
        let start = offset().timestamp_opt(start_secs, 0).unwrap();
        let end = offset().timestamp_opt(end_secs, 0).unwrap();
        let now = offset().timestamp_opt(now_secs, 0).unwrap();

        let dates = ComparisonDates::calculate(start, end, now);

        prop_assert!(dates.start_date <= dates.end_date);
        prop_assert!(dates.comparison_start_date <= dates.comparison_end_date);
        prop_assert!(dates.comparison_start_date < dates.start_date);
        prop_assert!(dates.end_date <= calendar::day_end(&now));
        prop_assert_eq!(dates.start_date.time(), chrono::NaiveTime::MIN);
        prop_assert_eq!(dates.end_date.time(), END_OF_DAY);
        prop_assert_eq!(dates.comparison_start_date.time(), chrono::NaiveTime::MIN);
        prop_assert_eq!(dates.comparison_end_date.time(), END_OF_DAY);
    }

    /// Windows spanning months end right before the current window and cover
    /// the same number of whole days.
    #[test]
    fn prop_spanning_window_is_the_preceding_block(
        start_day in 0i64..20_000,
        span_days in 0i64..400,
    ) {
        let base = offset().with_ymd_and_hms(1990, 1, 1, 0, 0, 0).unwrap();
        let start = base + Duration::days(start_day);
        let end = calendar::day_end(&(start + Duration::days(span_days)));
        prop_assume!(!calendar::same_month(&start, &end));
        let now = offset().with_ymd_and_hms(2100, 1, 1, 0, 0, 0).unwrap();

        let dates = ComparisonDates::calculate(start, end, now);

        prop_assert_eq!(
            dates.comparison_end_date,
            dates.start_date - Duration::nanoseconds(1)
        );
        let covered = dates.start_date.date_naive() - dates.comparison_start_date.date_naive();
        prop_assert_eq!(covered.num_days(), span_days);
        prop_assert_eq!(dates.comparison_start_date.hour(), 0);
    }
}
