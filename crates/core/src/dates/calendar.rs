//! Calendar helpers that keep wall-clock semantics in the caller's time zone.
//!
//! Every helper saturates at chrono's representable range instead of panicking.

use chrono::{
    DateTime, Datelike, Days, Duration, LocalResult, Months, NaiveDate, NaiveDateTime, NaiveTime,
    Offset, TimeZone,
};

/// Last representable instant of a day.
pub const END_OF_DAY: NaiveTime = match NaiveTime::from_hms_nano_opt(23, 59, 59, 999_999_999) {
    Some(time) => time,
    None => NaiveTime::MIN,
};

/// Earliest day a ledger window can start on. Open-ended ranges start here.
pub const LEDGER_EPOCH: NaiveDate = match NaiveDate::from_ymd_opt(1970, 1, 1) {
    Some(date) => date,
    None => NaiveDate::MIN,
};

/// Resolves a wall-clock time in `tz`.
///
/// Ambiguous times (DST fall back) resolve to the earlier instant. Times inside a
/// DST gap resolve to the first instant after the gap.
pub fn localize<Tz: TimeZone>(tz: &Tz, local: NaiveDateTime) -> DateTime<Tz> {
    match tz.from_local_datetime(&local) {
        LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => dt,
        LocalResult::None => {
            let probe = local.checked_sub_signed(Duration::days(1)).unwrap_or(local);
            let offset = tz.offset_from_utc_datetime(&probe).fix();
            let utc = local
                .checked_sub_signed(Duration::seconds(i64::from(offset.local_minus_utc())))
                .unwrap_or(local);
            tz.from_utc_datetime(&utc)
        }
    }
}

/// First instant (00:00:00.000000000) of `dt`'s day.
pub fn day_start<Tz: TimeZone>(dt: &DateTime<Tz>) -> DateTime<Tz> {
    at_day_start(&dt.timezone(), dt.date_naive())
}

/// Last instant (23:59:59.999999999) of `dt`'s day.
pub fn day_end<Tz: TimeZone>(dt: &DateTime<Tz>) -> DateTime<Tz> {
    at_day_end(&dt.timezone(), dt.date_naive())
}

/// First instant of `dt`'s calendar month.
pub fn month_start<Tz: TimeZone>(dt: &DateTime<Tz>) -> DateTime<Tz> {
    at_day_start(&dt.timezone(), first_day_of_month(dt.date_naive()))
}

/// Last instant of `dt`'s calendar month.
pub fn month_end<Tz: TimeZone>(dt: &DateTime<Tz>) -> DateTime<Tz> {
    at_day_end(&dt.timezone(), last_day_of_month(dt.date_naive()))
}

/// Start of `date` in `tz`.
pub fn at_day_start<Tz: TimeZone>(tz: &Tz, date: NaiveDate) -> DateTime<Tz> {
    localize(tz, date.and_time(NaiveTime::MIN))
}

/// End of `date` in `tz`.
pub fn at_day_end<Tz: TimeZone>(tz: &Tz, date: NaiveDate) -> DateTime<Tz> {
    localize(tz, date.and_time(END_OF_DAY))
}

/// Day 1 of `date`'s month.
#[must_use]
pub fn first_day_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// Last day of `date`'s month.
#[must_use]
pub fn last_day_of_month(date: NaiveDate) -> NaiveDate {
    first_day_of_month(date)
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .unwrap_or(NaiveDate::MAX)
}

/// Number of days in `date`'s month.
#[must_use]
pub fn days_in_month(date: NaiveDate) -> u32 {
    last_day_of_month(date).day()
}

/// Days left in the month counting `date` itself.
#[must_use]
pub fn days_remaining_in_month(date: NaiveDate) -> u32 {
    days_in_month(date) - date.day() + 1
}

/// Same wall-clock time one calendar month earlier.
///
/// When the day-of-month does not exist in the previous month the last valid day is
/// used (Mar 31 becomes Feb 28/29).
pub fn previous_month<Tz: TimeZone>(dt: &DateTime<Tz>) -> DateTime<Tz> {
    let local = dt.naive_local();
    let date = local
        .date()
        .checked_sub_months(Months::new(1))
        .unwrap_or(NaiveDate::MIN);
    localize(&dt.timezone(), date.and_time(local.time()))
}

/// Start of the day `days` calendar days before `dt`.
pub fn days_before_start<Tz: TimeZone>(dt: &DateTime<Tz>, days: u64) -> DateTime<Tz> {
    let date = dt
        .date_naive()
        .checked_sub_days(Days::new(days))
        .unwrap_or(NaiveDate::MIN);
    at_day_start(&dt.timezone(), date)
}

/// True when both instants fall in the same calendar month and year.
pub fn same_month<Tz: TimeZone>(a: &DateTime<Tz>, b: &DateTime<Tz>) -> bool {
    a.year() == b.year() && a.month() == b.month()
}
