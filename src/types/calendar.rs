//! Non-leap calendar helpers shared by the normalizer and the selector.

use chrono::{Datelike, NaiveDate};

/// Number of days in the canonical (non-leap) year.
pub const DAYS_PER_YEAR: usize = 365;

/// Number of hourly values making up one day.
pub const HOURS_PER_DAY: usize = 24;

// Any non-leap year works as the reference calendar.
const REFERENCE_YEAR: i32 = 2023;

/// Returns the number of days in `month` for a non-leap year, or `None` if
/// `month` is outside `1..=12`.
///
/// ```
/// use repdays::days_in_month;
///
/// assert_eq!(days_in_month(2), Some(28));
/// assert_eq!(days_in_month(12), Some(31));
/// assert_eq!(days_in_month(13), None);
/// ```
pub fn days_in_month(month: u32) -> Option<u32> {
    let first = NaiveDate::from_ymd_opt(REFERENCE_YEAR, month, 1)?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(REFERENCE_YEAR + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(REFERENCE_YEAR, month + 1, 1)?
    };
    u32::try_from(next.signed_duration_since(first).num_days()).ok()
}

/// Returns the 1-based ordinal of `(month, day)` in the non-leap year.
/// Feb 29 and other impossible dates yield `None`.
pub fn day_of_year(month: u32, day: u32) -> Option<u32> {
    NaiveDate::from_ymd_opt(REFERENCE_YEAR, month, day).map(|d| d.ordinal())
}

/// Iterates every `(month, day)` of the non-leap year in calendar order.
pub fn calendar_days() -> impl Iterator<Item = (u32, u32)> {
    (1..=12u32).flat_map(|month| {
        let days = days_in_month(month).unwrap_or(0);
        (1..=days).map(move |day| (month, day))
    })
}

#[inline]
pub(crate) fn is_leap_day(month: i64, day: i64) -> bool {
    month == 2 && day == 29
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn calendar_has_365_days() {
        assert_eq!(calendar_days().count(), DAYS_PER_YEAR);
        assert_eq!(calendar_days().next(), Some((1, 1)));
        assert_eq!(calendar_days().last(), Some((12, 31)));
    }

    #[test]
    fn day_of_year_rejects_leap_day() {
        assert_eq!(day_of_year(1, 1), Some(1));
        assert_eq!(day_of_year(3, 1), Some(60));
        assert_eq!(day_of_year(12, 31), Some(365));
        assert_eq!(day_of_year(2, 29), None);
        assert_eq!(day_of_year(4, 31), None);
    }

    #[test]
    fn month_lengths() {
        let lengths: Vec<u32> = (1..=12).filter_map(days_in_month).collect();
        assert_eq!(lengths, vec![31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31]);
        assert_eq!(days_in_month(0), None);
    }
}
