//! Percentage variation between two amounts.
//!
//! Variations are fixed-point integers where `100` is 1.00% and `10_000` is 100.00%,
//! matching how amounts themselves are stored as integer cents.

use std::cmp::Ordering;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// Fixed-point representation of 100.00%.
pub const FULL_VARIATION: i64 = 10_000;

/// Signed variation of `current` relative to `previous`.
///
/// `(current - previous) / |previous| * 10_000`, rounded half away from zero.
/// Positive means `current` exceeds `previous`.
///
/// When `previous` is zero the ratio is undefined; the result is then `0` if
/// `current` is zero too, otherwise `±10_000` (a full 100% move) following the sign
/// of `current`. Results beyond `i64` saturate.
#[must_use]
pub fn calculate_percentage_variation(current: i64, previous: i64) -> i64 {
    if previous == 0 {
        return match current.cmp(&0) {
            Ordering::Greater => FULL_VARIATION,
            Ordering::Less => -FULL_VARIATION,
            Ordering::Equal => 0,
        };
    }

    let difference = i128::from(current) - i128::from(previous);
    let ratio = Decimal::from_i128_with_scale(difference, 0) * Decimal::from(FULL_VARIATION)
        / Decimal::from(previous.unsigned_abs());

    ratio
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .unwrap_or(if difference.is_positive() {
            i64::MAX
        } else {
            i64::MIN
        })
}
