//! Vet-Records Core Library
//!
//! Local-first record keeping for a veterinary practice: vaccinations with
//! multi-dose schedules, diagnostic test procedures, a drug formulary with
//! weight-based dosage, and prescriptions.
//!
//! # Architecture
//!
//! ```text
//!   Forms ──validate/build──► Controllers ──save──► RecordStore ──► KeyValueStore
//!                                  │                    │              (SQLite / memory)
//!                                  │                    └── export_all / import_all
//!                                  ▼
//!                          ReminderScheduler ──► Timer ──► Notifier
//! ```
//!
//! # Modules
//!
//! - [`db`]: key-value storage port and its SQLite backend
//! - [`models`]: domain types (Vaccination, TestProcedure, Drug, Prescription, ...)
//! - [`store`]: typed record collections, snapshot import/export, demo data
//! - [`dates`]: time-zone aware date helpers and the month grid
//! - [`calc`]: dosage and dose-schedule calculators
//! - [`reminders`]: local reminders for upcoming doses
//! - [`forms`]: form input and validation
//! - [`controllers`]: list/search state, submission, deletion, prescription builder, calendar
//! - [`search`]: case-insensitive record filtering
//! - [`export`]: backup files and printable prescriptions
//! - [`config`]: startup configuration

pub mod calc;
pub mod config;
pub mod controllers;
pub mod dates;
pub mod db;
pub mod export;
pub mod forms;
pub mod models;
pub mod reminders;
pub mod search;
pub mod store;

// Re-export commonly used types
pub use config::AppConfig;
pub use db::{Database, KeyValueStore, MemoryStore};
pub use models::{
    Dose, Drug, PrescribedDrug, Prescription, Route, Sex, Species, SpeciesDosage, TestProcedure,
    Theme, Vaccination, VaccineType,
};
pub use reminders::{Notifier, Reminder, ReminderScheduler, Timer, TokioTimer};
pub use store::{RecordStore, Snapshot};

// UniFFI setup - using proc macros
uniffi::setup_scaffolding!();

use std::str::FromStr;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Local, Utc};
use tracing::warn;

use controllers::{ControllerError, PrescriptionBuilder, PrescriptionError, RecordView};
use forms::{DrugForm, FormErrors, TestForm, VaccinationForm, VaccineTypeForm};

// =========================================================================
// FFI Error Type
// =========================================================================

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum VetRecordsError {
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Validation failed for {} field(s)", .errors.len())]
    ValidationFailed { errors: Vec<FfiFieldError> },

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Runtime error: {0}")]
    RuntimeError(String),
}

impl From<db::DbError> for VetRecordsError {
    fn from(e: db::DbError) -> Self {
        VetRecordsError::DatabaseError(e.to_string())
    }
}

impl From<store::StoreError> for VetRecordsError {
    fn from(e: store::StoreError) -> Self {
        match e {
            store::StoreError::Db(e) => e.into(),
            store::StoreError::Json(e) => e.into(),
            e @ store::StoreError::Io { .. } => VetRecordsError::RuntimeError(e.to_string()),
            other => VetRecordsError::SerializationError(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for VetRecordsError {
    fn from(e: serde_json::Error) -> Self {
        VetRecordsError::SerializationError(e.to_string())
    }
}

impl From<dates::DateError> for VetRecordsError {
    fn from(e: dates::DateError) -> Self {
        VetRecordsError::InvalidInput(e.to_string())
    }
}

impl From<calc::DosageError> for VetRecordsError {
    fn from(e: calc::DosageError) -> Self {
        VetRecordsError::InvalidInput(e.to_string())
    }
}

impl From<PrescriptionError> for VetRecordsError {
    fn from(e: PrescriptionError) -> Self {
        VetRecordsError::InvalidInput(e.to_string())
    }
}

impl From<FormErrors> for VetRecordsError {
    fn from(errors: FormErrors) -> Self {
        VetRecordsError::ValidationFailed {
            errors: errors
                .iter()
                .map(|(field, message)| FfiFieldError {
                    field: field.to_string(),
                    message: message.to_string(),
                })
                .collect(),
        }
    }
}

impl From<ControllerError> for VetRecordsError {
    fn from(e: ControllerError) -> Self {
        match e {
            ControllerError::Invalid(errors) => errors.into(),
            ControllerError::NotFound(id) => VetRecordsError::NotFound(id),
            ControllerError::Store(e) => e.into(),
        }
    }
}

impl From<config::ConfigError> for VetRecordsError {
    fn from(e: config::ConfigError) -> Self {
        VetRecordsError::InvalidInput(e.to_string())
    }
}

impl<T> From<std::sync::PoisonError<T>> for VetRecordsError {
    fn from(e: std::sync::PoisonError<T>) -> Self {
        VetRecordsError::DatabaseError(format!("Lock poisoned: {}", e))
    }
}

fn parse_enum<T: FromStr<Err = String>>(value: &str) -> Result<T, VetRecordsError> {
    value.parse().map_err(VetRecordsError::InvalidInput)
}

// =========================================================================
// Notifications (implemented by the host app)
// =========================================================================

/// Notification side channel provided by the host app.
#[uniffi::export(with_foreign)]
pub trait NotificationSink: Send + Sync {
    /// Prompt for permission if needed. Returns whether it is granted.
    fn request_permission(&self) -> bool;

    fn has_permission(&self) -> bool;

    fn deliver(&self, title: String, body: String);
}

struct SinkNotifier(Arc<dyn NotificationSink>);

impl Notifier for SinkNotifier {
    fn request_permission(&self) -> bool {
        self.0.request_permission()
    }

    fn has_permission(&self) -> bool {
        self.0.has_permission()
    }

    fn notify(&self, reminder: &Reminder) {
        self.0.deliver(reminder.title(), reminder.body());
    }
}

// =========================================================================
// Factory Functions (exported to FFI)
// =========================================================================

/// Open or create a database at the given path.
#[uniffi::export]
pub fn open_database(path: String) -> Result<Arc<VetRecordsCore>, VetRecordsError> {
    let config = AppConfig::with_database(path.into())?;
    let db = Database::open(config.database_path())?;
    VetRecordsCore::new(db, config.reminder_lead_days())
}

/// Create an in-memory database (for testing).
#[uniffi::export]
pub fn open_database_in_memory() -> Result<Arc<VetRecordsCore>, VetRecordsError> {
    let db = Database::open_in_memory()?;
    VetRecordsCore::new(db, reminders::DEFAULT_LEAD_DAYS)
}

// =========================================================================
// Main API Object
// =========================================================================

/// Thread-safe record store wrapper for FFI.
///
/// Owns a small tokio runtime that runs reminder timers.
#[derive(uniffi::Object)]
pub struct VetRecordsCore {
    store: Arc<Mutex<RecordStore<Database>>>,
    runtime: tokio::runtime::Runtime,
    reminders: Mutex<Option<ReminderScheduler>>,
    lead_days: u32,
}

impl VetRecordsCore {
    fn new(db: Database, lead_days: u32) -> Result<Arc<Self>, VetRecordsError> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("vet-records-reminders")
            .enable_time()
            .build()
            .map_err(|e| VetRecordsError::RuntimeError(e.to_string()))?;

        Ok(Arc::new(Self {
            store: Arc::new(Mutex::new(RecordStore::new(db))),
            runtime,
            reminders: Mutex::new(None),
            lead_days,
        }))
    }

    fn now() -> DateTime<Utc> {
        Utc::now()
    }
}

#[uniffi::export]
impl VetRecordsCore {
    // =========================================================================
    // Notifications
    // =========================================================================

    /// Install the host's notification sink and request permission.
    ///
    /// Returns whether permission was granted.
    pub fn set_notification_sink(&self, sink: Arc<dyn NotificationSink>) -> Result<bool, VetRecordsError> {
        let timer = Arc::new(TokioTimer::new(self.runtime.handle().clone()));
        let scheduler = ReminderScheduler::new(Arc::new(SinkNotifier(sink)), timer)
            .with_lead_days(self.lead_days);
        let granted = scheduler.request_permission();
        *self.reminders.lock()? = Some(scheduler);
        Ok(granted)
    }

    // =========================================================================
    // Vaccination Operations
    // =========================================================================

    /// List vaccinations matching a search term (blank for all).
    pub fn list_vaccinations(&self, query: String) -> Result<Vec<FfiVaccination>, VetRecordsError> {
        let store = self.store.lock()?;
        let all: Vec<Vaccination> = store.get_all()?;
        Ok(search::filter(&all, &query)
            .into_iter()
            .map(|v| v.clone().into())
            .collect())
    }

    /// Create a vaccination, or update the one with `editing_id`.
    ///
    /// Reminders are armed for pending doses when a notification sink is set.
    pub fn save_vaccination(
        &self,
        input: FfiVaccinationInput,
        editing_id: Option<String>,
    ) -> Result<FfiVaccination, VetRecordsError> {
        let form = input.into_form()?;
        let scheduler = self.reminders.lock()?.clone();
        let mut store = self.store.lock()?;
        let mut view = edit_view(editing_id);
        let (saved, _) = controllers::submit_vaccination(
            &mut store,
            &mut view,
            &form,
            scheduler.as_ref(),
            Self::now(),
            &Local,
        )?;
        Ok(saved.into())
    }

    /// Delete a vaccination. Returns whether it existed.
    pub fn delete_vaccination(&self, id: String) -> Result<bool, VetRecordsError> {
        let mut store = self.store.lock()?;
        Ok(store.delete::<Vaccination>(&id)?)
    }

    /// Mark one dose as administered. Returns false for an unknown dose number.
    pub fn mark_dose_administered(&self, id: String, dose_number: u32) -> Result<bool, VetRecordsError> {
        let mut store = self.store.lock()?;
        Ok(controllers::mark_dose_administered(&mut store, &id, dose_number)?)
    }

    /// Vaccinations with a dose on a local `YYYY-MM-DD` date.
    pub fn vaccinations_on(&self, date: String) -> Result<Vec<FfiVaccination>, VetRecordsError> {
        let date = dates::parse_date(&date)?;
        let store = self.store.lock()?;
        let all: Vec<Vaccination> = store.get_all()?;
        Ok(controllers::vaccinations_on(&all, date, &Local)
            .into_iter()
            .map(|v| v.clone().into())
            .collect())
    }

    /// Day cells of a month (1-based) for the vaccination calendar.
    pub fn calendar_month(&self, year: i32, month: u32) -> Result<Vec<FfiCalendarDay>, VetRecordsError> {
        let store = self.store.lock()?;
        let all: Vec<Vaccination> = store.get_all()?;
        let view = controllers::CalendarView { year, month };
        let days = view.days(&all, Self::now(), &Local)?;
        Ok(days.into_iter().map(|d| d.into()).collect())
    }

    // =========================================================================
    // Test Procedure Operations
    // =========================================================================

    pub fn list_tests(&self, query: String) -> Result<Vec<FfiTestProcedure>, VetRecordsError> {
        let store = self.store.lock()?;
        let all: Vec<TestProcedure> = store.get_all()?;
        Ok(search::filter(&all, &query)
            .into_iter()
            .map(|t| t.clone().into())
            .collect())
    }

    /// Test procedures that apply to an animal of a species and age.
    pub fn tests_for_animal(&self, species: String, age: f64) -> Result<Vec<FfiTestProcedure>, VetRecordsError> {
        let species: Species = parse_enum(&species)?;
        let store = self.store.lock()?;
        let all: Vec<TestProcedure> = store.get_all()?;
        Ok(search::tests_for(&all, species, age)
            .into_iter()
            .map(|t| t.clone().into())
            .collect())
    }

    pub fn save_test(
        &self,
        input: FfiTestInput,
        editing_id: Option<String>,
    ) -> Result<FfiTestProcedure, VetRecordsError> {
        let form = input.into_form()?;
        let mut store = self.store.lock()?;
        let mut view = edit_view(editing_id);
        Ok(controllers::submit_test(&mut store, &mut view, &form)?.into())
    }

    pub fn delete_test(&self, id: String) -> Result<bool, VetRecordsError> {
        let mut store = self.store.lock()?;
        Ok(store.delete::<TestProcedure>(&id)?)
    }

    // =========================================================================
    // Drug Operations
    // =========================================================================

    pub fn list_drugs(&self, query: String) -> Result<Vec<FfiDrug>, VetRecordsError> {
        let store = self.store.lock()?;
        let all: Vec<Drug> = store.get_all()?;
        Ok(search::filter(&all, &query)
            .into_iter()
            .map(|d| d.clone().into())
            .collect())
    }

    /// Drugs offering a dosage for a species.
    pub fn drugs_for_species(&self, species: String) -> Result<Vec<FfiDrug>, VetRecordsError> {
        let species: Species = parse_enum(&species)?;
        let store = self.store.lock()?;
        let all: Vec<Drug> = store.get_all()?;
        Ok(calc::drugs_for_species(&all, species)
            .into_iter()
            .map(|d| d.clone().into())
            .collect())
    }

    pub fn save_drug(
        &self,
        input: FfiDrugInput,
        editing_id: Option<String>,
    ) -> Result<FfiDrug, VetRecordsError> {
        let form = input.into_form()?;
        let mut store = self.store.lock()?;
        let mut view = edit_view(editing_id);
        Ok(controllers::submit_drug(&mut store, &mut view, &form)?.into())
    }

    /// Delete a drug. Prescriptions referencing it are left unchanged.
    pub fn delete_drug(&self, id: String) -> Result<bool, VetRecordsError> {
        let mut store = self.store.lock()?;
        Ok(store.delete::<Drug>(&id)?)
    }

    /// Total dose in mg for a drug, species and weight.
    pub fn calculate_dose(&self, drug_id: String, species: String, weight_kg: f64) -> Result<f64, VetRecordsError> {
        let species: Species = parse_enum(&species)?;
        let store = self.store.lock()?;
        let drug: Drug = store
            .get(&drug_id)?
            .ok_or_else(|| VetRecordsError::NotFound(drug_id.clone()))?;
        Ok(calc::calculate_dose(&drug, species, weight_kg)?)
    }

    // =========================================================================
    // Prescription Operations
    // =========================================================================

    pub fn list_prescriptions(&self, query: String) -> Result<Vec<FfiPrescription>, VetRecordsError> {
        let store = self.store.lock()?;
        let all: Vec<Prescription> = store.get_all()?;
        Ok(search::filter(&all, &query)
            .into_iter()
            .map(|p| p.clone().into())
            .collect())
    }

    /// Build and save a prescription dated now.
    pub fn create_prescription(&self, input: FfiPrescriptionInput) -> Result<FfiPrescription, VetRecordsError> {
        let mut store = self.store.lock()?;
        let drugs: Vec<Drug> = store.get_all()?;

        let mut builder = PrescriptionBuilder::new();
        builder.animal_id = input.animal_id;
        builder.set_species(parse_enum(&input.species)?);
        builder.set_weight(&input.weight);

        for line in input.drugs {
            let drug = drugs
                .iter()
                .find(|d| d.id == line.drug_id)
                .ok_or_else(|| VetRecordsError::NotFound(line.drug_id.clone()))?;
            builder.add_drug(drug)?;
            if let Some(route) = line.route {
                builder.update_route(&drug.id, parse_enum(&route)?)?;
            }
        }

        let saved = controllers::submit_prescription(&mut store, &mut builder, Self::now())?;
        Ok(saved.into())
    }

    /// Printable HTML for a saved prescription.
    pub fn prescription_html(&self, id: String) -> Result<String, VetRecordsError> {
        let store = self.store.lock()?;
        let prescription: Prescription = store
            .get(&id)?
            .ok_or_else(|| VetRecordsError::NotFound(id.clone()))?;
        let drugs: Vec<Drug> = store.get_all()?;
        Ok(export::PrescriptionSheet::new(&prescription, &drugs, &Local).to_html())
    }

    // =========================================================================
    // Vaccine Type Operations
    // =========================================================================

    pub fn list_vaccine_types(&self, query: String) -> Result<Vec<FfiVaccineType>, VetRecordsError> {
        let store = self.store.lock()?;
        let all: Vec<VaccineType> = store.get_all()?;
        Ok(search::filter(&all, &query)
            .into_iter()
            .map(|v| v.clone().into())
            .collect())
    }

    /// Vaccine types intended for a species.
    pub fn vaccine_types_for_species(&self, species: String) -> Result<Vec<FfiVaccineType>, VetRecordsError> {
        let species: Species = parse_enum(&species)?;
        let store = self.store.lock()?;
        let all: Vec<VaccineType> = store.get_all()?;
        Ok(search::vaccine_types_for(&all, species)
            .into_iter()
            .map(|v| v.clone().into())
            .collect())
    }

    pub fn save_vaccine_type(
        &self,
        input: FfiVaccineTypeInput,
        editing_id: Option<String>,
    ) -> Result<FfiVaccineType, VetRecordsError> {
        let form = input.into_form()?;
        let mut store = self.store.lock()?;
        let mut view = edit_view(editing_id);
        Ok(controllers::submit_vaccine_type(&mut store, &mut view, &form)?.into())
    }

    pub fn delete_vaccine_type(&self, id: String) -> Result<bool, VetRecordsError> {
        let mut store = self.store.lock()?;
        Ok(store.delete::<VaccineType>(&id)?)
    }

    // =========================================================================
    // Data Operations
    // =========================================================================

    /// Export all records as one JSON document.
    pub fn export_all(&self) -> Result<String, VetRecordsError> {
        let store = self.store.lock()?;
        Ok(store.export_all()?)
    }

    /// Suggested file name for a backup taken today.
    pub fn backup_file_name(&self) -> String {
        export::backup_file_name(dates::local_date(Self::now(), &Local))
    }

    /// Import a JSON document. Returns false, with no changes, if it is malformed.
    pub fn import_all(&self, json: String) -> Result<bool, VetRecordsError> {
        let mut store = self.store.lock()?;
        match store.import_all(&json) {
            Ok(_) => Ok(true),
            Err(store::StoreError::MalformedSnapshot(reason)) => {
                warn!(%reason, "import rejected");
                Ok(false)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Fill empty collections with sample records.
    pub fn seed_demo_data(&self) -> Result<(), VetRecordsError> {
        let mut store = self.store.lock()?;
        store.seed_demo_data(Self::now(), &Local)?;
        Ok(())
    }

    // =========================================================================
    // Theme
    // =========================================================================

    pub fn theme(&self) -> Result<String, VetRecordsError> {
        let store = self.store.lock()?;
        Ok(store.theme()?.to_string())
    }

    /// Set the theme to `light` or `dark`.
    pub fn set_theme(&self, theme: String) -> Result<(), VetRecordsError> {
        let theme = match theme.trim().to_lowercase().as_str() {
            "light" => Theme::Light,
            "dark" => Theme::Dark,
            other => return Err(VetRecordsError::InvalidInput(format!("unknown theme: {}", other))),
        };
        let mut store = self.store.lock()?;
        store.set_theme(theme)?;
        Ok(())
    }

    /// Switch between light and dark. Returns the new theme.
    pub fn toggle_theme(&self) -> Result<String, VetRecordsError> {
        let mut store = self.store.lock()?;
        let theme = store.theme()?.toggled();
        store.set_theme(theme)?;
        Ok(theme.to_string())
    }
}

fn edit_view<R: store::Record + search::Searchable>(editing_id: Option<String>) -> RecordView<R> {
    let mut view = RecordView::new();
    match editing_id {
        Some(id) => view.open_edit(id),
        None => view.open_create(),
    }
    view
}

// =========================================================================
// FFI Types
// =========================================================================

/// FFI-safe validation message.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiFieldError {
    pub field: String,
    pub message: String,
}

/// FFI-safe dose.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiDose {
    pub number: u32,
    /// RFC 3339
    pub date: String,
    pub administered: bool,
}

impl From<Dose> for FfiDose {
    fn from(dose: Dose) -> Self {
        Self {
            number: dose.number,
            date: dose.date.to_rfc3339(),
            administered: dose.administered,
        }
    }
}

/// FFI-safe vaccination.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiVaccination {
    pub id: String,
    pub animal_id: String,
    pub age: f64,
    pub sex: String,
    pub is_pregnant: Option<bool>,
    pub owner_phone: String,
    pub vaccine_time: String,
    pub vaccine_type: String,
    pub species: String,
    pub notes: Option<String>,
    pub doses: Vec<FfiDose>,
}

impl From<Vaccination> for FfiVaccination {
    fn from(v: Vaccination) -> Self {
        Self {
            id: v.id,
            animal_id: v.animal_id,
            age: v.age,
            sex: v.sex.to_string(),
            is_pregnant: v.is_pregnant,
            owner_phone: v.owner_phone,
            vaccine_time: v.vaccine_time.to_rfc3339(),
            vaccine_type: v.vaccine_type,
            species: v.species.to_string(),
            notes: v.notes,
            doses: v.doses.into_iter().map(|d| d.into()).collect(),
        }
    }
}

/// FFI-safe vaccination form input.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiVaccinationInput {
    pub animal_id: String,
    pub age: String,
    pub sex: String,
    pub is_pregnant: bool,
    pub owner_phone: String,
    /// `YYYY-MM-DD`
    pub vaccine_date: String,
    /// `HH:MM`
    pub vaccine_time: String,
    pub vaccine_type: String,
    pub species: String,
    pub notes: String,
    pub total_doses: u32,
    pub days_interval: u32,
}

impl FfiVaccinationInput {
    fn into_form(self) -> Result<VaccinationForm, VetRecordsError> {
        Ok(VaccinationForm {
            animal_id: self.animal_id,
            age: self.age,
            sex: parse_enum(&self.sex)?,
            is_pregnant: self.is_pregnant,
            owner_phone: self.owner_phone,
            vaccine_date: self.vaccine_date,
            vaccine_time: self.vaccine_time,
            vaccine_type: self.vaccine_type,
            species: parse_enum(&self.species)?,
            notes: self.notes,
            total_doses: self.total_doses,
            days_interval: self.days_interval,
        })
    }
}

/// FFI-safe test procedure.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiTestProcedure {
    pub id: String,
    pub name: String,
    pub steps: Vec<String>,
    pub target_animals: Vec<String>,
    pub min_age: f64,
    pub max_age: f64,
}

impl From<TestProcedure> for FfiTestProcedure {
    fn from(t: TestProcedure) -> Self {
        Self {
            id: t.id,
            name: t.name,
            steps: t.steps,
            target_animals: t.target_animals.iter().map(|s| s.to_string()).collect(),
            min_age: t.age_range.min,
            max_age: t.age_range.max,
        }
    }
}

/// FFI-safe test form input.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiTestInput {
    pub name: String,
    /// One step per line
    pub steps: String,
    pub target_animals: Vec<String>,
    pub min_age: String,
    pub max_age: String,
}

impl FfiTestInput {
    fn into_form(self) -> Result<TestForm, VetRecordsError> {
        Ok(TestForm {
            name: self.name,
            steps: self.steps,
            target_animals: parse_species_list(&self.target_animals)?,
            min_age: self.min_age,
            max_age: self.max_age,
        })
    }
}

/// FFI-safe species dosage.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiSpeciesDosage {
    pub species: String,
    /// mg/kg
    pub dosage: f64,
}

/// FFI-safe drug.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiDrug {
    pub id: String,
    pub name: String,
    pub dosages: Vec<FfiSpeciesDosage>,
    pub routes: Vec<String>,
}

impl From<Drug> for FfiDrug {
    fn from(d: Drug) -> Self {
        Self {
            id: d.id,
            name: d.name,
            dosages: d
                .dosages
                .iter()
                .map(|s| FfiSpeciesDosage {
                    species: s.species.to_string(),
                    dosage: s.dosage,
                })
                .collect(),
            routes: d.routes.iter().map(|r| r.to_string()).collect(),
        }
    }
}

/// FFI-safe drug form input.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiDrugInput {
    pub name: String,
    pub dosages: Vec<FfiSpeciesDosage>,
    pub routes: Vec<String>,
}

impl FfiDrugInput {
    fn into_form(self) -> Result<DrugForm, VetRecordsError> {
        let dosages = self
            .dosages
            .iter()
            .map(|d| -> Result<SpeciesDosage, VetRecordsError> {
                Ok(SpeciesDosage {
                    species: parse_enum(&d.species)?,
                    dosage: d.dosage,
                })
            })
            .collect::<Result<Vec<_>, VetRecordsError>>()?;
        let routes = self
            .routes
            .iter()
            .map(|r| parse_enum(r))
            .collect::<Result<Vec<Route>, _>>()?;

        Ok(DrugForm {
            name: self.name,
            dosages,
            routes,
        })
    }
}

/// FFI-safe prescribed drug.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiPrescribedDrug {
    pub drug_id: String,
    pub route: String,
    pub calculated_dose: f64,
}

/// FFI-safe prescription.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiPrescription {
    pub id: String,
    pub animal_id: String,
    pub species: String,
    pub weight: f64,
    pub drugs: Vec<FfiPrescribedDrug>,
    pub date: String,
}

impl From<Prescription> for FfiPrescription {
    fn from(p: Prescription) -> Self {
        Self {
            id: p.id,
            animal_id: p.animal_id,
            species: p.species.to_string(),
            weight: p.weight,
            drugs: p
                .drugs
                .into_iter()
                .map(|d| FfiPrescribedDrug {
                    drug_id: d.drug_id,
                    route: d.route.to_string(),
                    calculated_dose: d.calculated_dose,
                })
                .collect(),
            date: p.date.to_rfc3339(),
        }
    }
}

/// FFI-safe drug line of a new prescription.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiPrescriptionDrugInput {
    pub drug_id: String,
    /// Defaults to oral, else the drug's first route
    pub route: Option<String>,
}

/// FFI-safe prescription input.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiPrescriptionInput {
    pub animal_id: String,
    pub species: String,
    pub weight: String,
    pub drugs: Vec<FfiPrescriptionDrugInput>,
}

/// FFI-safe vaccine type.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiVaccineType {
    pub id: String,
    pub name: String,
    pub total_doses: u32,
    pub days_interval: u32,
    pub target_animals: Vec<String>,
}

impl From<VaccineType> for FfiVaccineType {
    fn from(v: VaccineType) -> Self {
        Self {
            id: v.id,
            name: v.name,
            total_doses: v.total_doses,
            days_interval: v.days_interval,
            target_animals: v.target_animals.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// FFI-safe vaccine type input.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiVaccineTypeInput {
    pub name: String,
    pub total_doses: u32,
    pub days_interval: u32,
    pub target_animals: Vec<String>,
}

impl FfiVaccineTypeInput {
    fn into_form(self) -> Result<VaccineTypeForm, VetRecordsError> {
        Ok(VaccineTypeForm {
            name: self.name,
            total_doses: self.total_doses,
            days_interval: self.days_interval,
            target_animals: parse_species_list(&self.target_animals)?,
        })
    }
}

/// FFI-safe calendar day.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiCalendarDay {
    /// `YYYY-MM-DD`
    pub date: String,
    pub in_month: bool,
    pub is_today: bool,
    pub vaccination_count: u32,
}

impl From<controllers::CalendarDay> for FfiCalendarDay {
    fn from(day: controllers::CalendarDay) -> Self {
        Self {
            date: day.date.format("%Y-%m-%d").to_string(),
            in_month: day.in_month,
            is_today: day.is_today,
            vaccination_count: day.vaccination_count as u32,
        }
    }
}

fn parse_species_list(values: &[String]) -> Result<Vec<Species>, VetRecordsError> {
    values.iter().map(|s| parse_enum(s)).collect()
}
