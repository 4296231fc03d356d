use chrono::{Datelike, Duration, NaiveDate, Weekday};

/// Find the nth (1-based) occurrence of a weekday in a month.
pub fn nth_weekday(year: i32, month: u32, weekday: Weekday, n: u32) -> Option<NaiveDate> {
    if n == 0 {
        return None;
    }
    NaiveDate::from_weekday_of_month_opt(year, month, weekday, u8::try_from(n).ok()?)
}

/// Find the last occurrence of a weekday in a month.
pub fn last_weekday(year: i32, month: u32, weekday: Weekday) -> Option<NaiveDate> {
    let mut date = first_of_next_month(year, month)? - Duration::days(1);
    while date.weekday() != weekday {
        date = date - Duration::days(1);
    }
    Some(date)
}

pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

fn first_of_next_month(year: i32, month: u32) -> Option<NaiveDate> {
    if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    }
}

/// (year, month) pairs touched by an inclusive date range.
pub fn months_in_range(start: NaiveDate, end: NaiveDate) -> Vec<(i32, u32)> {
    let mut months = Vec::new();
    let mut current = first_of_month(start);
    while current <= end {
        months.push((current.year(), current.month()));
        match first_of_next_month(current.year(), current.month()) {
            Some(next) => current = next,
            None => break,
        }
    }
    months
}

/// Every date in an inclusive range.
pub fn days_in_range(start: NaiveDate, end: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    start.iter_days().take_while(move |day| *day <= end)
}
