//! Date and time helpers.
//!
//! Instants are stored in UTC. Anything that depends on the wall clock
//! (calendar days, form inputs, display) takes a `TimeZone`; production
//! callers pass `chrono::Local`.

mod calendar;
#[cfg(test)]
pub(crate) mod test_zones;

pub use calendar::*;

use chrono::{
    DateTime, Days, FixedOffset, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, Offset,
    TimeZone, Utc,
};
use thiserror::Error;

/// Date helper errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DateError {
    #[error("Invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("Invalid time '{0}', expected HH:MM")]
    InvalidTime(String),

    #[error("Invalid month {month} for year {year}")]
    InvalidMonth { year: i32, month: u32 },

    #[error("Date out of range")]
    OutOfRange,
}

pub type DateResult<T> = Result<T, DateError>;

/// Add calendar days in local time.
///
/// The local wall-clock time is kept, so the result is correct across DST
/// changes. A wall time that falls into a DST gap keeps the original offset.
pub fn add_days<Tz: TimeZone>(ts: DateTime<Utc>, days: i64, tz: &Tz) -> DateResult<DateTime<Utc>> {
    let local = ts.with_timezone(tz);
    let original_offset = local.offset().fix();
    let naive = local.naive_local();

    let shifted = if days >= 0 {
        naive.checked_add_days(Days::new(days as u64))
    } else {
        naive.checked_sub_days(Days::new(days.unsigned_abs()))
    }
    .ok_or(DateError::OutOfRange)?;

    resolve_local(tz, &shifted, original_offset)
}

/// Build an instant from separate `YYYY-MM-DD` and `HH:MM` local inputs.
pub fn combine_date_and_time<Tz: TimeZone>(
    date: &str,
    time: &str,
    tz: &Tz,
) -> DateResult<DateTime<Utc>> {
    let date = parse_date(date)?;
    let time = NaiveTime::parse_from_str(time.trim(), "%H:%M")
        .map_err(|_| DateError::InvalidTime(time.to_string()))?;
    let naive = date.and_time(time);
    let fallback = tz.offset_from_utc_datetime(&naive).fix();

    resolve_local(tz, &naive, fallback)
}

/// Split an instant into local `YYYY-MM-DD` and `HH:MM` strings.
pub fn split_date_and_time<Tz: TimeZone>(ts: DateTime<Utc>, tz: &Tz) -> (String, String) {
    let local = ts.with_timezone(tz).naive_local();
    (
        local.format("%Y-%m-%d").to_string(),
        local.format("%H:%M").to_string(),
    )
}

/// Parse a `YYYY-MM-DD` date.
pub fn parse_date(date: &str) -> DateResult<NaiveDate> {
    NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
        .map_err(|_| DateError::InvalidDate(date.to_string()))
}

/// Local calendar date of an instant.
pub fn local_date<Tz: TimeZone>(ts: DateTime<Utc>, tz: &Tz) -> NaiveDate {
    ts.with_timezone(tz).date_naive()
}

/// Whether `ts` falls on the same local calendar date as `now`.
pub fn is_today<Tz: TimeZone>(ts: DateTime<Utc>, now: DateTime<Utc>, tz: &Tz) -> bool {
    local_date(ts, tz) == local_date(now, tz)
}

/// Whether `ts` lies between `now` and three calendar days later (inclusive).
pub fn is_in_next_three_days<Tz: TimeZone>(
    ts: DateTime<Utc>,
    now: DateTime<Utc>,
    tz: &Tz,
) -> bool {
    match add_days(now, 3, tz) {
        Ok(limit) => ts >= now && ts <= limit,
        Err(_) => false,
    }
}

/// Display form with time, e.g. `Jan 5, 2025, 09:30 AM`.
pub fn format_date_time<Tz: TimeZone>(ts: DateTime<Utc>, tz: &Tz) -> String {
    ts.with_timezone(tz)
        .naive_local()
        .format("%b %-d, %Y, %I:%M %p")
        .to_string()
}

/// Display form without time, e.g. `Jan 5, 2025`.
pub fn format_calendar_date<Tz: TimeZone>(ts: DateTime<Utc>, tz: &Tz) -> String {
    local_date(ts, tz).format("%b %-d, %Y").to_string()
}

/// Today's local date as `YYYY-MM-DD`.
pub fn today_string<Tz: TimeZone>(now: DateTime<Utc>, tz: &Tz) -> String {
    split_date_and_time(now, tz).0
}

/// Current local time as `HH:MM`.
pub fn current_time_string<Tz: TimeZone>(now: DateTime<Utc>, tz: &Tz) -> String {
    split_date_and_time(now, tz).1
}

fn resolve_local<Tz: TimeZone>(
    tz: &Tz,
    naive: &NaiveDateTime,
    fallback: FixedOffset,
) -> DateResult<DateTime<Utc>> {
    match tz.from_local_datetime(naive) {
        LocalResult::Single(dt) => Ok(dt.with_timezone(&Utc)),
        LocalResult::Ambiguous(earliest, _) => Ok(earliest.with_timezone(&Utc)),
        LocalResult::None => fallback
            .from_local_datetime(naive)
            .single()
            .map(|dt| dt.with_timezone(&Utc))
            .ok_or(DateError::OutOfRange),
    }
}

#[cfg(test)]
mod tests {
    use super::test_zones::{FallBack, SpringForward};
    use super::*;

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    #[test]
    fn test_add_days_simple() {
        let start = utc(2025, 1, 1, 9, 30);
        assert_eq!(add_days(start, 7, &Utc).unwrap(), utc(2025, 1, 8, 9, 30));
        assert_eq!(add_days(start, -1, &Utc).unwrap(), utc(2024, 12, 31, 9, 30));
        assert_eq!(add_days(start, 0, &Utc).unwrap(), start);
    }

    #[test]
    fn test_add_days_crosses_month_and_leap_day() {
        let start = utc(2024, 2, 27, 0, 0);
        assert_eq!(add_days(start, 3, &Utc).unwrap(), utc(2024, 3, 1, 0, 0));
    }

    #[test]
    fn test_add_days_keeps_wall_clock_across_dst() {
        // 09:00 local (UTC+1) on Mar 28 -> 09:00 local (UTC+2) on Apr 4
        let start = utc(2025, 3, 28, 8, 0);
        let result = add_days(start, 7, &SpringForward).unwrap();

        assert_eq!(result, utc(2025, 4, 4, 7, 0));
        assert_eq!(
            result.with_timezone(&SpringForward).naive_local().time(),
            NaiveTime::from_hms_opt(9, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_add_days_keeps_wall_clock_across_fall_back() {
        // 10:00 local (UTC+2) on Oct 20 -> 10:00 local (UTC+1) on Oct 27
        let start = utc(2025, 10, 20, 8, 0);
        let result = add_days(start, 7, &FallBack).unwrap();

        assert_eq!(result, utc(2025, 10, 27, 9, 0));
        assert_eq!(local_date(result, &FallBack), NaiveDate::from_ymd_opt(2025, 10, 27).unwrap());
        assert_eq!(
            result.with_timezone(&FallBack).naive_local().time(),
            NaiveTime::from_hms_opt(10, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_add_days_into_overlap_takes_earlier_instant() {
        // 02:30 local on Oct 25 -> 02:30 local on Oct 26, which occurs twice
        let start = utc(2025, 10, 25, 0, 30);
        let result = add_days(start, 1, &FallBack).unwrap();
        assert_eq!(result, utc(2025, 10, 26, 0, 30));
    }

    #[test]
    fn test_add_days_into_gap_keeps_offset() {
        // 02:30 local on Mar 29 lands in the gap on Mar 30
        let start = utc(2025, 3, 29, 1, 30);
        let result = add_days(start, 1, &SpringForward).unwrap();
        assert_eq!(result, utc(2025, 3, 30, 1, 30));
    }

    #[test]
    fn test_combine_date_and_time() {
        let tz = FixedOffset::east_opt(3 * 3600).unwrap();
        let ts = combine_date_and_time("2025-01-01", "10:15", &tz).unwrap();
        assert_eq!(ts, utc(2025, 1, 1, 7, 15));

        assert_eq!(
            split_date_and_time(ts, &tz),
            ("2025-01-01".to_string(), "10:15".to_string())
        );
    }

    #[test]
    fn test_combine_rejects_bad_input() {
        assert_eq!(
            combine_date_and_time("2025-13-01", "10:00", &Utc),
            Err(DateError::InvalidDate("2025-13-01".into()))
        );
        assert_eq!(
            combine_date_and_time("2025-01-01", "25:00", &Utc),
            Err(DateError::InvalidTime("25:00".into()))
        );
    }

    #[test]
    fn test_is_today_uses_local_calendar_date() {
        let tz = FixedOffset::west_opt(5 * 3600).unwrap();
        let now = utc(2025, 6, 1, 12, 0);

        assert!(is_today(utc(2025, 6, 1, 23, 0), now, &tz));
        // 03:00 UTC on Jun 2 is still Jun 1 at UTC-5
        assert!(is_today(utc(2025, 6, 2, 3, 0), now, &tz));
        assert!(!is_today(utc(2025, 6, 2, 6, 0), now, &tz));
    }

    #[test]
    fn test_is_in_next_three_days() {
        let now = utc(2025, 6, 1, 12, 0);

        assert!(is_in_next_three_days(now, now, &Utc));
        assert!(is_in_next_three_days(utc(2025, 6, 4, 12, 0), now, &Utc));
        assert!(!is_in_next_three_days(utc(2025, 6, 4, 12, 1), now, &Utc));
        assert!(!is_in_next_three_days(utc(2025, 6, 1, 11, 59), now, &Utc));
    }

    #[test]
    fn test_formatting() {
        let ts = utc(2025, 1, 5, 21, 7);
        assert_eq!(format_date_time(ts, &Utc), "Jan 5, 2025, 09:07 PM");
        assert_eq!(format_calendar_date(ts, &Utc), "Jan 5, 2025");
        assert_eq!(today_string(ts, &Utc), "2025-01-05");
        assert_eq!(current_time_string(ts, &Utc), "21:07");
    }
}
