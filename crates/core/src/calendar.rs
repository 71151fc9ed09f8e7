//! Workday calendar math
//!
//! Workdays are Monday through Friday with no holiday awareness. Both
//! functions are pure and total; an invalid year/month combination counts as
//! an empty month rather than an error.

use chrono::{Datelike, NaiveDate, Weekday};

/// Number of workdays (Mon-Fri) in the given calendar month.
pub fn workdays_in_month(year: i32, month: u32) -> u32 {
    let Some(last) = last_day_of_month(year, month) else {
        return 0;
    };
    workdays_between(year, month, 1, last)
}

/// Number of workdays (Mon-Fri) from the first of the month through
/// `day_of_month` inclusive.
///
/// `day_of_month` must be a valid day in the month; out-of-range days are
/// clamped to the month's end, mirroring the permissiveness of the original.
pub fn workdays_elapsed(year: i32, month: u32, day_of_month: u32) -> u32 {
    let Some(last) = last_day_of_month(year, month) else {
        return 0;
    };
    workdays_between(year, month, 1, day_of_month.min(last))
}

fn workdays_between(year: i32, month: u32, from_day: u32, to_day: u32) -> u32 {
    (from_day..=to_day)
        .filter_map(|day| NaiveDate::from_ymd_opt(year, month, day))
        .filter(|date| !matches!(date.weekday(), Weekday::Sat | Weekday::Sun))
        .count() as u32
}

fn last_day_of_month(year: i32, month: u32) -> Option<u32> {
    NaiveDate::from_ymd_opt(year, month, 1)?;
    let next_month = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    Some(next_month.pred_opt()?.day())
}
