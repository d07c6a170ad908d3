//! View controllers: list/search state, form submission and deletion.
//!
//! A [`RecordView`] owns the UI state of one record list (search term and
//! form mode). The `submit_*` functions turn a form into a saved record and
//! close the form on success.

mod calendar;
mod prescription;

pub use calendar::*;
pub use prescription::*;

use std::marker::PhantomData;

use chrono::{DateTime, TimeZone, Utc};
use thiserror::Error;
use tracing::{debug, info};

use crate::db::KeyValueStore;
use crate::forms::{DrugForm, FormErrors, FormMode, TestForm, VaccinationForm, VaccineTypeForm};
use crate::models::{Drug, TestProcedure, Vaccination, VaccineType};
use crate::reminders::{Reminder, ReminderScheduler};
use crate::search::Searchable;
use crate::store::{Record, RecordStore, StoreError};

/// Controller errors.
#[derive(Error, Debug)]
pub enum ControllerError {
    #[error("Invalid form: {0}")]
    Invalid(#[from] FormErrors),

    #[error("Record not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type ControllerResult<T> = Result<T, ControllerError>;

/// Result of a delete request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    /// The confirmation callback declined
    Cancelled,
    NotFound,
}

/// List and form state for one record collection.
#[derive(Debug, Clone)]
pub struct RecordView<R> {
    pub search: String,
    mode: FormMode,
    _record: PhantomData<R>,
}

impl<R> Default for RecordView<R> {
    fn default() -> Self {
        Self {
            search: String::new(),
            mode: FormMode::Closed,
            _record: PhantomData,
        }
    }
}

impl<R: Record + Searchable> RecordView<R> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> &FormMode {
        &self.mode
    }

    pub fn open_create(&mut self) {
        self.mode = FormMode::Create;
    }

    pub fn open_edit(&mut self, id: impl Into<String>) {
        self.mode = FormMode::Edit(id.into());
    }

    pub fn close(&mut self) {
        self.mode = FormMode::Closed;
    }

    /// Records matching the current search term.
    pub fn list<S: KeyValueStore>(&self, store: &RecordStore<S>) -> ControllerResult<Vec<R>> {
        Ok(store
            .get_all::<R>()?
            .into_iter()
            .filter(|r| r.matches(&self.search))
            .collect())
    }

    /// Record targeted by the open edit form.
    pub fn editing<S: KeyValueStore>(&self, store: &RecordStore<S>) -> ControllerResult<Option<R>> {
        match self.mode.editing_id() {
            Some(id) => store
                .get::<R>(id)?
                .map(Some)
                .ok_or_else(|| ControllerError::NotFound(id.to_string())),
            None => Ok(None),
        }
    }

    /// Delete a record once `confirm` agrees.
    ///
    /// An edit form open on the deleted record is closed.
    pub fn delete<S: KeyValueStore>(
        &mut self,
        store: &mut RecordStore<S>,
        id: &str,
        confirm: impl FnOnce(&R) -> bool,
    ) -> ControllerResult<DeleteOutcome> {
        let Some(record) = store.get::<R>(id)? else {
            return Ok(DeleteOutcome::NotFound);
        };
        if !confirm(&record) {
            debug!(collection = R::COLLECTION.key(), id, "delete cancelled");
            return Ok(DeleteOutcome::Cancelled);
        }

        store.delete::<R>(id)?;
        if self.mode.editing_id() == Some(id) {
            self.close();
        }
        Ok(DeleteOutcome::Deleted)
    }

    fn finish<S: KeyValueStore>(&mut self, store: &mut RecordStore<S>, record: R) -> ControllerResult<R> {
        let saved = store.save(record)?;
        self.close();
        Ok(saved)
    }
}

/// Save a vaccination form and arm reminders for its pending doses.
///
/// Returns the saved record and the reminders that were armed.
pub fn submit_vaccination<S: KeyValueStore, Tz: TimeZone>(
    store: &mut RecordStore<S>,
    view: &mut RecordView<Vaccination>,
    form: &VaccinationForm,
    reminders: Option<&ReminderScheduler>,
    now: DateTime<Utc>,
    tz: &Tz,
) -> ControllerResult<(Vaccination, Vec<Reminder>)> {
    let existing = view.editing(store)?;
    let vaccination = form.build(existing.as_ref(), tz)?;
    let saved = view.finish(store, vaccination)?;

    let armed = reminders
        .map(|scheduler| scheduler.schedule(&saved, now, tz))
        .unwrap_or_default();

    info!(
        animal_id = %saved.animal_id,
        doses = saved.doses.len(),
        reminders = armed.len(),
        "vaccination saved"
    );
    Ok((saved, armed))
}

/// Mark one dose of a saved vaccination as given.
///
/// Returns false when the vaccination has no dose with that number.
pub fn mark_dose_administered<S: KeyValueStore>(
    store: &mut RecordStore<S>,
    vaccination_id: &str,
    dose_number: u32,
) -> ControllerResult<bool> {
    let mut vaccination = store
        .get::<Vaccination>(vaccination_id)?
        .ok_or_else(|| ControllerError::NotFound(vaccination_id.to_string()))?;
    if !vaccination.mark_administered(dose_number) {
        return Ok(false);
    }
    store.save(vaccination)?;
    Ok(true)
}

pub fn submit_test<S: KeyValueStore>(
    store: &mut RecordStore<S>,
    view: &mut RecordView<TestProcedure>,
    form: &TestForm,
) -> ControllerResult<TestProcedure> {
    let existing = view.editing(store)?;
    let test = form.build(existing.as_ref())?;
    view.finish(store, test)
}

pub fn submit_drug<S: KeyValueStore>(
    store: &mut RecordStore<S>,
    view: &mut RecordView<Drug>,
    form: &DrugForm,
) -> ControllerResult<Drug> {
    let existing = view.editing(store)?;
    let drug = form.build(existing.as_ref())?;
    view.finish(store, drug)
}

pub fn submit_vaccine_type<S: KeyValueStore>(
    store: &mut RecordStore<S>,
    view: &mut RecordView<VaccineType>,
    form: &VaccineTypeForm,
) -> ControllerResult<VaccineType> {
    let existing = view.editing(store)?;
    let vaccine_type = form.build(existing.as_ref())?;
    view.finish(store, vaccine_type)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;
    use crate::models::{Prescription, Route, Species, SpeciesDosage};
    use crate::reminders::{Notifier, Timer, TimerTask};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    fn store() -> RecordStore<MemoryStore> {
        RecordStore::new(MemoryStore::new())
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 1, 9, 0, 0).unwrap()
    }

    fn drug_form(name: &str) -> DrugForm {
        DrugForm {
            name: name.into(),
            dosages: vec![SpeciesDosage {
                species: Species::Cow,
                dosage: 7.0,
            }],
            routes: vec![Route::Im],
        }
    }

    fn vaccination_form() -> VaccinationForm {
        let mut form = VaccinationForm::new(now(), &Utc);
        form.animal_id = "COW-001".into();
        form.age = "2".into();
        form.owner_phone = "555-1234".into();
        form.vaccine_type = "FMD Vaccine".into();
        form.total_doses = 2;
        form.days_interval = 7;
        form
    }

    struct AlwaysGranted;

    impl Notifier for AlwaysGranted {
        fn request_permission(&self) -> bool {
            true
        }
        fn has_permission(&self) -> bool {
            true
        }
        fn notify(&self, _reminder: &Reminder) {}
    }

    #[derive(Default)]
    struct CountingTimer {
        delays: Mutex<Vec<Duration>>,
    }

    impl Timer for CountingTimer {
        fn arm(&self, delay: Duration, _task: TimerTask) {
            self.delays.lock().unwrap().push(delay);
        }
    }

    #[test]
    fn test_create_then_edit_drug() {
        let mut store = store();
        let mut view = RecordView::<Drug>::new();

        view.open_create();
        let created = submit_drug(&mut store, &mut view, &drug_form("Amoxicillin")).unwrap();
        assert_eq!(view.mode(), &FormMode::Closed);

        view.open_edit(created.id.clone());
        let edited = submit_drug(&mut store, &mut view, &drug_form("Amoxicillin LA")).unwrap();

        assert_eq!(edited.id, created.id);
        let drugs: Vec<Drug> = store.get_all().unwrap();
        assert_eq!(drugs.len(), 1);
        assert_eq!(drugs[0].name, "Amoxicillin LA");
    }

    #[test]
    fn test_invalid_form_keeps_form_open() {
        let mut store = store();
        let mut view = RecordView::<Drug>::new();
        view.open_create();

        let result = submit_drug(&mut store, &mut view, &DrugForm::new());
        assert!(matches!(result, Err(ControllerError::Invalid(_))));
        assert_eq!(view.mode(), &FormMode::Create);
        assert!(store.get_all::<Drug>().unwrap().is_empty());
    }

    #[test]
    fn test_edit_of_missing_record() {
        let mut store = store();
        let mut view = RecordView::<Drug>::new();
        view.open_edit("gone");

        let result = submit_drug(&mut store, &mut view, &drug_form("X"));
        assert!(matches!(result, Err(ControllerError::NotFound(id)) if id == "gone"));
    }

    #[test]
    fn test_delete_requires_confirmation() {
        let mut store = store();
        let mut view = RecordView::<Drug>::new();
        view.open_create();
        let drug = submit_drug(&mut store, &mut view, &drug_form("Amoxicillin")).unwrap();

        let outcome = view.delete(&mut store, &drug.id, |_| false).unwrap();
        assert_eq!(outcome, DeleteOutcome::Cancelled);
        assert_eq!(store.get_all::<Drug>().unwrap().len(), 1);

        view.open_edit(drug.id.clone());
        let outcome = view
            .delete(&mut store, &drug.id, |d| d.name == "Amoxicillin")
            .unwrap();
        assert_eq!(outcome, DeleteOutcome::Deleted);
        assert!(!view.mode().is_open());

        let outcome = view.delete(&mut store, &drug.id, |_| true).unwrap();
        assert_eq!(outcome, DeleteOutcome::NotFound);
    }

    #[test]
    fn test_deleting_drug_keeps_prescriptions() {
        let mut store = store();
        let mut view = RecordView::<Drug>::new();
        view.open_create();
        let drug = submit_drug(&mut store, &mut view, &drug_form("Amoxicillin")).unwrap();

        let mut builder = PrescriptionBuilder::new();
        builder.animal_id = "COW-001".into();
        builder.set_weight("250");
        builder.add_drug(&drug).unwrap();
        let prescription = submit_prescription(&mut store, &mut builder, now()).unwrap();

        view.delete(&mut store, &drug.id, |_| true).unwrap();

        let kept: Vec<Prescription> = store.get_all().unwrap();
        assert_eq!(kept, vec![prescription]);
        assert!(kept[0].references_drug(&drug.id));
    }

    #[test]
    fn test_list_filters_by_search() {
        let mut store = store();
        let mut view = RecordView::<Drug>::new();
        for name in ["Amoxicillin", "Oxytetracycline", "Penicillin"] {
            view.open_create();
            submit_drug(&mut store, &mut view, &drug_form(name)).unwrap();
        }

        view.search = "CILLIN".into();
        let names: Vec<String> = view.list(&store).unwrap().into_iter().map(|d| d.name).collect();
        assert_eq!(names, vec!["Amoxicillin", "Penicillin"]);
    }

    #[test]
    fn test_submit_vaccination_arms_reminders() {
        let mut store = store();
        let mut view = RecordView::<Vaccination>::new();
        let timer = Arc::new(CountingTimer::default());
        let scheduler = ReminderScheduler::new(Arc::new(AlwaysGranted), timer.clone());

        view.open_create();
        let (saved, armed) = submit_vaccination(
            &mut store,
            &mut view,
            &vaccination_form(),
            Some(&scheduler),
            now(),
            &Utc,
        )
        .unwrap();

        assert_eq!(saved.doses.len(), 2);
        assert_eq!(armed.len(), 1);
        assert_eq!(armed[0].dose_number, 2);
        assert_eq!(timer.delays.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_edit_vaccination_preserves_administered() {
        let mut store = store();
        let mut view = RecordView::<Vaccination>::new();
        view.open_create();
        let (saved, _) =
            submit_vaccination(&mut store, &mut view, &vaccination_form(), None, now(), &Utc).unwrap();

        assert!(mark_dose_administered(&mut store, &saved.id, 2).unwrap());
        assert!(!mark_dose_administered(&mut store, &saved.id, 9).unwrap());

        let current: Vaccination = store.get(&saved.id).unwrap().unwrap();
        let mut form = VaccinationForm::from_existing(&current, &Utc);
        form.total_doses = 3;
        view.open_edit(saved.id.clone());
        let (edited, _) =
            submit_vaccination(&mut store, &mut view, &form, None, now(), &Utc).unwrap();

        let flags: Vec<bool> = edited.doses.iter().map(|d| d.administered).collect();
        assert_eq!(flags, vec![true, true, false]);
    }

    #[test]
    fn test_submit_test_and_vaccine_type() {
        let mut store = store();

        let mut tests = RecordView::<TestProcedure>::new();
        let form = TestForm {
            name: "Brucellosis".into(),
            steps: "Draw blood".into(),
            target_animals: vec![Species::Goat],
            min_age: "0.5".into(),
            max_age: "12".into(),
        };
        tests.open_create();
        submit_test(&mut store, &mut tests, &form).unwrap();

        let mut types = RecordView::<VaccineType>::new();
        let form = VaccineTypeForm {
            name: "PPR".into(),
            total_doses: 1,
            days_interval: 0,
            target_animals: vec![Species::Goat, Species::Sheep],
        };
        types.open_create();
        submit_vaccine_type(&mut store, &mut types, &form).unwrap();

        assert_eq!(store.get_all::<TestProcedure>().unwrap().len(), 1);
        assert_eq!(store.get_all::<VaccineType>().unwrap()[0].name, "PPR");
    }
}
