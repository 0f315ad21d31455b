//! Calendar helpers — month bounds and day iteration.

use chrono::{Datelike, Duration, NaiveDate};

/// First and last day of a calendar month. `None` for an invalid month
/// number; the last day is computed, never assumed 30/31.
pub fn month_bounds(year: i32, month: u32) -> Option<(NaiveDate, NaiveDate)> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next_first = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    Some((first, next_first - Duration::days(1)))
}

pub fn year_bounds(year: i32) -> Option<(NaiveDate, NaiveDate)> {
    Some((
        NaiveDate::from_ymd_opt(year, 1, 1)?,
        NaiveDate::from_ymd_opt(year, 12, 31)?,
    ))
}

/// All days of a month in order. Empty for an invalid month number.
pub fn days_in_month(year: i32, month: u32) -> Vec<NaiveDate> {
    let Some((first, last)) = month_bounds(year, month) else {
        return Vec::new();
    };
    let mut days = Vec::with_capacity(31);
    let mut d = first;
    while d <= last {
        days.push(d);
        d += Duration::days(1);
    }
    days
}

/// ISO `YYYY-MM-DD`, the storage format for all roster dates.
pub fn iso(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub fn parse_iso(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

/// Whether `date` falls into the requested scope: the given year, and the
/// given month when one is set.
pub fn in_scope(date: NaiveDate, year: i32, month: Option<u32>) -> bool {
    date.year() == year && month.is_none_or(|m| date.month() == m)
}
