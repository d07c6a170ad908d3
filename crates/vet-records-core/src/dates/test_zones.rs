//! Fixed-rule DST zones for tests that must not depend on a tz database.

use chrono::{FixedOffset, LocalResult, NaiveDate, NaiveDateTime, TimeZone};

fn offset(hours: i32) -> FixedOffset {
    FixedOffset::east_opt(hours * 3600).unwrap()
}

fn utc_switch(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(h, 0, 0)
        .unwrap()
}

/// Zone with a spring-forward gap.
///
/// Standard time is UTC+1; from 2025-03-30 02:00 local it is UTC+2.
#[derive(Clone, Copy, Debug)]
pub(crate) struct SpringForward;

impl SpringForward {
    fn switch_utc() -> NaiveDateTime {
        utc_switch(2025, 3, 30, 1)
    }
}

impl TimeZone for SpringForward {
    type Offset = FixedOffset;

    fn from_offset(_offset: &FixedOffset) -> Self {
        SpringForward
    }

    fn offset_from_local_date(&self, local: &NaiveDate) -> LocalResult<FixedOffset> {
        self.offset_from_local_datetime(&local.and_hms_opt(12, 0, 0).unwrap())
    }

    fn offset_from_local_datetime(&self, local: &NaiveDateTime) -> LocalResult<FixedOffset> {
        let gap_start = SpringForward::switch_utc() + chrono::Duration::hours(1);
        let gap_end = gap_start + chrono::Duration::hours(1);
        if *local < gap_start {
            LocalResult::Single(offset(1))
        } else if *local < gap_end {
            LocalResult::None
        } else {
            LocalResult::Single(offset(2))
        }
    }

    fn offset_from_utc_date(&self, utc: &NaiveDate) -> FixedOffset {
        self.offset_from_utc_datetime(&utc.and_hms_opt(0, 0, 0).unwrap())
    }

    fn offset_from_utc_datetime(&self, utc: &NaiveDateTime) -> FixedOffset {
        if *utc < SpringForward::switch_utc() {
            offset(1)
        } else {
            offset(2)
        }
    }
}

/// Zone with a fall-back overlap.
///
/// Summer time is UTC+2; at 2025-10-26 03:00 local clocks go back to 02:00
/// and it is UTC+1 from then on.
#[derive(Clone, Copy, Debug)]
pub(crate) struct FallBack;

impl FallBack {
    fn switch_utc() -> NaiveDateTime {
        utc_switch(2025, 10, 26, 1)
    }
}

impl TimeZone for FallBack {
    type Offset = FixedOffset;

    fn from_offset(_offset: &FixedOffset) -> Self {
        FallBack
    }

    fn offset_from_local_date(&self, local: &NaiveDate) -> LocalResult<FixedOffset> {
        self.offset_from_local_datetime(&local.and_hms_opt(12, 0, 0).unwrap())
    }

    fn offset_from_local_datetime(&self, local: &NaiveDateTime) -> LocalResult<FixedOffset> {
        let overlap_start = FallBack::switch_utc() + chrono::Duration::hours(1);
        let overlap_end = overlap_start + chrono::Duration::hours(1);
        if *local < overlap_start {
            LocalResult::Single(offset(2))
        } else if *local < overlap_end {
            LocalResult::Ambiguous(offset(2), offset(1))
        } else {
            LocalResult::Single(offset(1))
        }
    }

    fn offset_from_utc_date(&self, utc: &NaiveDate) -> FixedOffset {
        self.offset_from_utc_datetime(&utc.and_hms_opt(0, 0, 0).unwrap())
    }

    fn offset_from_utc_datetime(&self, utc: &NaiveDateTime) -> FixedOffset {
        if *utc < FallBack::switch_utc() {
            offset(2)
        } else {
            offset(1)
        }
    }
}
