//! Multi-dose vaccination schedule generation.

use chrono::{DateTime, TimeZone, Utc};
use thiserror::Error;

use crate::dates::{add_days, local_date, DateError};
use crate::models::Dose;

/// Schedule generation errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScheduleError {
    #[error("At least one dose is required")]
    NoDoses,

    #[error("Days interval must be positive for multiple doses")]
    MissingInterval,

    #[error(transparent)]
    Date(#[from] DateError),
}

pub type ScheduleResult<T> = Result<T, ScheduleError>;

/// Derive the dose list for a vaccination.
///
/// Dose `i` is scheduled `i * days_interval` calendar days after
/// `first_dose`. Administration status is carried over from `prior` by
/// index; a dose with no prior counterpart is pending, except the first dose
/// of a new record, which is taken as given at entry time.
pub fn generate_schedule<Tz: TimeZone>(
    first_dose: DateTime<Utc>,
    total_doses: u32,
    days_interval: u32,
    prior: &[Dose],
    is_new_record: bool,
    tz: &Tz,
) -> ScheduleResult<Vec<Dose>> {
    if total_doses == 0 {
        return Err(ScheduleError::NoDoses);
    }
    if total_doses > 1 && days_interval == 0 {
        return Err(ScheduleError::MissingInterval);
    }

    (0..total_doses)
        .map(|i| -> ScheduleResult<Dose> {
            let date = if i == 0 {
                first_dose
            } else {
                add_days(first_dose, i as i64 * days_interval as i64, tz)?
            };
            let administered = match prior.get(i as usize) {
                Some(existing) => existing.administered,
                None => i == 0 && is_new_record,
            };
            Ok(Dose {
                number: i + 1,
                date,
                administered,
            })
        })
        .collect()
}

/// Recover the interval between doses as the number of local calendar
/// days between the first two.
///
/// Returns 0 when there are fewer than two doses.
pub fn infer_interval_days<Tz: TimeZone>(doses: &[Dose], tz: &Tz) -> u32 {
    match doses {
        [first, second, ..] => {
            let days = (local_date(second.date, tz) - local_date(first.date, tz)).num_days();
            u32::try_from(days.max(0)).unwrap_or(u32::MAX)
        }
        _ => 0,
    }
}
