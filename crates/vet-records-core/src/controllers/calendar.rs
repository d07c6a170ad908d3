//! Month calendar of vaccination doses.

use chrono::{DateTime, Datelike, NaiveDate, TimeZone, Utc};

use crate::dates::{
    calendar_dates, is_in_next_three_days, local_date, month_title, shift_month, DateResult,
};
use crate::models::{Dose, Vaccination};

/// Vaccinations with a dose on the given local date.
pub fn vaccinations_on<'a, Tz: TimeZone>(
    vaccinations: &'a [Vaccination],
    date: NaiveDate,
    tz: &Tz,
) -> Vec<&'a Vaccination> {
    vaccinations
        .iter()
        .filter(|v| v.has_dose_on(date, tz))
        .collect()
}

pub fn has_vaccinations_on<Tz: TimeZone>(
    vaccinations: &[Vaccination],
    date: NaiveDate,
    tz: &Tz,
) -> bool {
    vaccinations.iter().any(|v| v.has_dose_on(date, tz))
}

/// Pending doses due within the next three days, soonest first.
pub fn upcoming_doses<'a, Tz: TimeZone>(
    vaccinations: &'a [Vaccination],
    now: DateTime<Utc>,
    tz: &Tz,
) -> Vec<(&'a Vaccination, &'a Dose)> {
    let mut due: Vec<_> = vaccinations
        .iter()
        .flat_map(|v| v.pending_doses().map(move |d| (v, d)))
        .filter(|(_, d)| is_in_next_three_days(d.date, now, tz))
        .collect();
    due.sort_by_key(|(_, d)| d.date);
    due
}

/// One day cell of the rendered month.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub in_month: bool,
    pub is_today: bool,
    pub vaccination_count: usize,
}

/// Displayed month of the vaccination calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarView {
    pub year: i32,
    /// 1-based
    pub month: u32,
}

impl CalendarView {
    /// View of the month containing `now` in local time.
    pub fn current<Tz: TimeZone>(now: DateTime<Utc>, tz: &Tz) -> Self {
        let today = local_date(now, tz);
        Self {
            year: today.year(),
            month: today.month(),
        }
    }

    pub fn next(&mut self) {
        (self.year, self.month) = shift_month(self.year, self.month, 1);
    }

    pub fn previous(&mut self) {
        (self.year, self.month) = shift_month(self.year, self.month, -1);
    }

    pub fn title(&self) -> DateResult<String> {
        month_title(self.year, self.month)
    }

    /// Day cells for the month, padded to whole weeks.
    pub fn days<Tz: TimeZone>(
        &self,
        vaccinations: &[Vaccination],
        now: DateTime<Utc>,
        tz: &Tz,
    ) -> DateResult<Vec<CalendarDay>> {
        let today = local_date(now, tz);
        Ok(calendar_dates(self.year, self.month)?
            .into_iter()
            .map(|cell| CalendarDay {
                date: cell.date,
                in_month: cell.in_month,
                is_today: cell.date == today,
                vaccination_count: vaccinations_on(vaccinations, cell.date, tz).len(),
            })
            .collect())
    }
}
