//! Month-view calendar grid.

use chrono::{Datelike, Days, NaiveDate};

use super::{DateError, DateResult};

/// One cell of the month grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarCell {
    pub date: NaiveDate,
    /// False for padding days from the neighbouring months
    pub in_month: bool,
}

/// Cells for a month padded to whole Sunday-first weeks.
///
/// `month` is 1-based. Leading cells come from the previous month so the 1st
/// sits under its weekday; trailing cells from the next month finish the last
/// week on a Saturday.
pub fn calendar_dates(year: i32, month: u32) -> DateResult<Vec<CalendarCell>> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or(DateError::InvalidMonth { year, month })?;
    let last = last_day_of_month(first)?;

    let leading = first.weekday().num_days_from_sunday() as u64;
    let trailing = 6 - last.weekday().num_days_from_sunday() as u64;

    let start = first
        .checked_sub_days(Days::new(leading))
        .ok_or(DateError::OutOfRange)?;
    let end = last
        .checked_add_days(Days::new(trailing))
        .ok_or(DateError::OutOfRange)?;

    Ok(start
        .iter_days()
        .take_while(|d| *d <= end)
        .map(|date| CalendarCell {
            date,
            in_month: date.month() == month && date.year() == year,
        })
        .collect())
}

/// Year and month `delta` months away from the given one.
pub fn shift_month(year: i32, month: u32, delta: i32) -> (i32, u32) {
    let index = year * 12 + (month as i32 - 1) + delta;
    (index.div_euclid(12), (index.rem_euclid(12) + 1) as u32)
}

/// Heading for a month view, e.g. `January 2025`.
pub fn month_title(year: i32, month: u32) -> DateResult<String> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or(DateError::InvalidMonth { year, month })?;
    Ok(first.format("%B %Y").to_string())
}

fn last_day_of_month(first: NaiveDate) -> DateResult<NaiveDate> {
    let (next_year, next_month) = shift_month(first.year(), first.month(), 1);
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|d| d.pred_opt())
        .ok_or(DateError::OutOfRange)
}
