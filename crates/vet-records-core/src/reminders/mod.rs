//! Local reminders for upcoming vaccination doses.
//!
//! Each pending dose gets one reminder a few days before it is due. Reminders
//! whose fire time has already passed are skipped. Delivery goes through a
//! [`Notifier`] and timing through a [`Timer`], so both can be swapped out by
//! the embedding app and by tests.

mod timer;

pub use timer::*;

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use tracing::{debug, warn};

use crate::dates::add_days;
use crate::models::Vaccination;

/// Days between a reminder and the dose it announces.
pub const DEFAULT_LEAD_DAYS: u32 = 3;

/// Delivers user-visible notifications.
pub trait Notifier: Send + Sync {
    /// Ask the user for permission. Returns whether it is granted.
    fn request_permission(&self) -> bool;

    /// Current permission state, without prompting.
    fn has_permission(&self) -> bool;

    fn notify(&self, reminder: &Reminder);
}

/// A reminder for one pending dose.
#[derive(Debug, Clone, PartialEq)]
pub struct Reminder {
    pub vaccination_id: String,
    pub animal_id: String,
    pub vaccine_type: String,
    pub dose_number: u32,
    pub dose_date: DateTime<Utc>,
    pub fire_at: DateTime<Utc>,
    pub lead_days: u32,
}

impl Reminder {
    pub fn title(&self) -> String {
        format!("Vaccination Reminder: {}", self.animal_id)
    }

    pub fn body(&self) -> String {
        format!(
            "Upcoming {} vaccination (Dose {}) in {} days",
            self.vaccine_type, self.dose_number, self.lead_days
        )
    }
}

/// Reminders due after `now` for every pending dose of a vaccination.
///
/// The fire time is `lead_days` local calendar days before the dose.
pub fn plan_reminders<Tz: TimeZone>(
    vaccination: &Vaccination,
    now: DateTime<Utc>,
    lead_days: u32,
    tz: &Tz,
) -> Vec<Reminder> {
    vaccination
        .pending_doses()
        .filter_map(|dose| {
            let fire_at = match add_days(dose.date, -(lead_days as i64), tz) {
                Ok(at) => at,
                Err(e) => {
                    warn!(dose = dose.number, error = %e, "cannot compute reminder time");
                    return None;
                }
            };
            (fire_at > now).then(|| Reminder {
                vaccination_id: vaccination.id.clone(),
                animal_id: vaccination.animal_id.clone(),
                vaccine_type: vaccination.vaccine_type.clone(),
                dose_number: dose.number,
                dose_date: dose.date,
                fire_at,
                lead_days,
            })
        })
        .collect()
}

/// Arms reminder timers for saved vaccinations.
#[derive(Clone)]
pub struct ReminderScheduler {
    notifier: Arc<dyn Notifier>,
    timer: Arc<dyn Timer>,
    lead_days: u32,
}

impl ReminderScheduler {
    pub fn new(notifier: Arc<dyn Notifier>, timer: Arc<dyn Timer>) -> Self {
        Self {
            notifier,
            timer,
            lead_days: DEFAULT_LEAD_DAYS,
        }
    }

    /// Override the lead time. Values below one day are raised to one.
    pub fn with_lead_days(mut self, lead_days: u32) -> Self {
        self.lead_days = lead_days.max(1);
        self
    }

    pub fn lead_days(&self) -> u32 {
        self.lead_days
    }

    /// Prompt for notification permission, e.g. at startup.
    pub fn request_permission(&self) -> bool {
        self.notifier.request_permission()
    }

    /// Arm a timer for each upcoming reminder of a vaccination.
    ///
    /// Returns the reminders that were armed. Nothing is armed when
    /// permission is not granted.
    pub fn schedule<Tz: TimeZone>(
        &self,
        vaccination: &Vaccination,
        now: DateTime<Utc>,
        tz: &Tz,
    ) -> Vec<Reminder> {
        if !self.notifier.request_permission() {
            debug!(animal_id = %vaccination.animal_id, "notification permission denied");
            return Vec::new();
        }

        let reminders = plan_reminders(vaccination, now, self.lead_days, tz);
        for reminder in &reminders {
            // fire_at > now is guaranteed by plan_reminders
            let delay = (reminder.fire_at - now).to_std().unwrap_or_default();
            let notifier = self.notifier.clone();
            let payload = reminder.clone();

            self.timer.arm(
                delay,
                Box::new(move || {
                    if notifier.has_permission() {
                        notifier.notify(&payload);
                    } else {
                        warn!(animal_id = %payload.animal_id, "permission revoked, reminder dropped");
                    }
                }),
            );

            debug!(
                animal_id = %reminder.animal_id,
                dose = reminder.dose_number,
                fire_at = %reminder.fire_at,
                "reminder armed"
            );
        }
        reminders
    }
}
