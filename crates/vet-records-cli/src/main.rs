//! Command-line front end for the local veterinary records store.
//!
//! # Environment Variables
//! - `VET_RECORDS_DB`: database file (default: `<data dir>/vet-records/records.db`)
//! - `VET_RECORDS_LEAD_DAYS`: days before a dose that its reminder fires (default: 3)
//! - `VET_RECORDS_NO_NOTIFICATIONS`: set to `true` to disable reminders
//! - `RUST_LOG`: log filter (default: `vet_records=info`)

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context};
use chrono::{Local, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use vet_records_core::calc::{calculate_dose, drugs_for_species, format_dose_mg};
use vet_records_core::controllers::{
    self, upcoming_doses, CalendarView, DeleteOutcome, PrescriptionBuilder, RecordView,
};
use vet_records_core::dates::{format_calendar_date, format_date_time};
use vet_records_core::export::{write_backup, PrescriptionSheet};
use vet_records_core::forms::{DrugForm, VaccinationForm};
use vet_records_core::search::{tests_for, vaccine_types_for, Searchable};
use vet_records_core::store::Record;
use vet_records_core::{
    AppConfig, Database, Drug, Notifier, Prescription, RecordStore, Reminder, ReminderScheduler,
    Route, Sex, Species, SpeciesDosage, TestProcedure, Theme, TokioTimer, Vaccination,
    VaccineType,
};

#[derive(Parser)]
#[command(name = "vet-records")]
#[command(about = "Veterinary vaccination, test and drug records")]
struct Cli {
    /// Database file
    #[arg(long, env = "VET_RECORDS_DB", global = true)]
    db: Option<PathBuf>,

    /// Days before a dose that its reminder fires
    #[arg(long, env = "VET_RECORDS_LEAD_DAYS", default_value_t = 3, global = true)]
    lead_days: u32,

    /// Disable dose reminders
    #[arg(long, env = "VET_RECORDS_NO_NOTIFICATIONS", global = true)]
    no_notifications: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List records, optionally filtered by a search term
    List {
        kind: Kind,
        /// Case-insensitive search term
        search: Option<String>,
    },
    /// Delete a record after confirmation
    Delete {
        kind: Kind,
        id: String,
        /// Skip the confirmation prompt
        #[arg(long, short)]
        yes: bool,
    },
    /// Record a vaccination and its dose schedule
    AddVaccination {
        animal_id: String,
        /// Age in years
        #[arg(long)]
        age: String,
        #[arg(long)]
        sex: Sex,
        #[arg(long)]
        species: Species,
        #[arg(long)]
        owner_phone: String,
        #[arg(long)]
        vaccine: String,
        /// First dose date (YYYY-MM-DD, default today)
        #[arg(long)]
        date: Option<String>,
        /// First dose time (HH:MM, default now)
        #[arg(long)]
        time: Option<String>,
        /// Number of doses (default: from the vaccine catalog, else 1)
        #[arg(long)]
        doses: Option<u32>,
        /// Days between doses (default: from the vaccine catalog, else 0)
        #[arg(long)]
        interval: Option<u32>,
        #[arg(long)]
        pregnant: bool,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Vaccine types, tests and drugs that apply to an animal
    Applicable {
        species: Species,
        /// Age in years
        age: f64,
    },
    /// Mark a dose of a vaccination as administered
    MarkDose { id: String, dose: u32 },
    /// Add a drug to the formulary
    AddDrug {
        name: String,
        /// Species dosage in mg/kg, e.g. `cow=7` (repeatable)
        #[arg(long = "dosage", required = true)]
        dosages: Vec<String>,
        /// Administration route (repeatable)
        #[arg(long = "route", required = true)]
        routes: Vec<Route>,
    },
    /// Calculate the total dose of a drug
    Dose {
        drug_id: String,
        species: Species,
        /// Body weight in kg
        weight: f64,
    },
    /// Create a prescription
    Prescribe {
        animal_id: String,
        #[arg(long)]
        species: Species,
        /// Body weight in kg
        #[arg(long)]
        weight: String,
        /// Drug id, optionally with a route as `id:route` (repeatable)
        #[arg(long = "drug", required = true)]
        drugs: Vec<String>,
    },
    /// Render a saved prescription for printing
    PrintPrescription {
        id: String,
        #[arg(long, value_enum, default_value_t = SheetFormat::Html)]
        format: SheetFormat,
        /// Output file (default: stdout)
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Show the vaccination calendar for a month
    Calendar {
        #[arg(long)]
        year: Option<i32>,
        /// 1-12
        #[arg(long)]
        month: Option<u32>,
    },
    /// Pending doses due in the next three days
    Upcoming,
    /// Arm reminders for all pending doses and wait for them
    Reminders,
    /// Export all records as JSON
    Export {
        /// Output file (default: stdout)
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Write a dated backup file
    Backup {
        /// Target directory (default: current directory)
        #[arg(long)]
        dir: Option<PathBuf>,
    },
    /// Replace collections with those in an exported file
    Import { file: PathBuf },
    /// Fill empty collections with sample records
    SeedDemo,
    /// Show or change the display theme
    Theme {
        #[command(subcommand)]
        action: Option<ThemeAction>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Kind {
    Vaccinations,
    Tests,
    Drugs,
    Prescriptions,
    VaccineTypes,
}

#[derive(Clone, Copy, ValueEnum)]
enum SheetFormat {
    Html,
    Csv,
    Json,
}

#[derive(Subcommand)]
enum ThemeAction {
    /// Switch between light and dark
    Toggle,
    /// Set the theme
    Set { theme: ThemeArg },
}

#[derive(Clone, Copy, ValueEnum)]
enum ThemeArg {
    Light,
    Dark,
}

impl From<ThemeArg> for Theme {
    fn from(arg: ThemeArg) -> Self {
        match arg {
            ThemeArg::Light => Theme::Light,
            ThemeArg::Dark => Theme::Dark,
        }
    }
}

/// Prints reminders to the terminal.
struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn request_permission(&self) -> bool {
        true
    }

    fn has_permission(&self) -> bool {
        true
    }

    fn notify(&self, reminder: &Reminder) {
        println!("{}: {}", reminder.title(), reminder.body());
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("vet_records_core=info".parse()?)
                .add_directive("vet_records=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();
    let config = AppConfig::new(
        resolve_db_path(cli.db)?,
        cli.lead_days,
        !cli.no_notifications,
    )?;

    let db = Database::open(config.database_path())
        .with_context(|| format!("opening {}", config.database_path().display()))?;
    let mut store = RecordStore::new(db);
    tracing::debug!(path = %config.database_path().display(), "database opened");

    let now = Utc::now();

    match cli.command {
        Commands::List { kind, search } => {
            let search = search.unwrap_or_default();
            match kind {
                Kind::Vaccinations => {
                    for v in list::<Vaccination>(&store, &search)? {
                        let given = v.administered_count();
                        println!(
                            "{}  {}  {}  {}  doses {}/{}  first {}",
                            v.id,
                            v.animal_id,
                            v.species,
                            v.vaccine_type,
                            given,
                            v.doses.len(),
                            format_date_time(v.vaccine_time, &Local)
                        );
                    }
                }
                Kind::Tests => {
                    for t in list::<TestProcedure>(&store, &search)? {
                        println!(
                            "{}  {}  ages {}-{}  {} step(s)",
                            t.id,
                            t.name,
                            t.age_range.min,
                            t.age_range.max,
                            t.steps.len()
                        );
                    }
                }
                Kind::Drugs => {
                    for d in list::<Drug>(&store, &search)? {
                        let dosages: Vec<String> = d
                            .dosages
                            .iter()
                            .map(|s| format!("{} {} mg/kg", s.species, s.dosage))
                            .collect();
                        let routes: Vec<&str> = d.routes.iter().map(|r| r.as_str()).collect();
                        println!(
                            "{}  {}  [{}]  routes: {}",
                            d.id,
                            d.name,
                            dosages.join(", "),
                            routes.join(", ")
                        );
                    }
                }
                Kind::Prescriptions => {
                    for p in list::<Prescription>(&store, &search)? {
                        println!(
                            "{}  {}  {}  {} kg  {} drug(s)  {}",
                            p.id,
                            p.animal_id,
                            p.species,
                            p.weight,
                            p.drugs.len(),
                            format_calendar_date(p.date, &Local)
                        );
                    }
                }
                Kind::VaccineTypes => {
                    for v in list::<VaccineType>(&store, &search)? {
                        println!(
                            "{}  {}  {} dose(s) every {} days",
                            v.id, v.name, v.total_doses, v.days_interval
                        );
                    }
                }
            }
        }
        Commands::Delete { kind, id, yes } => {
            let outcome = match kind {
                Kind::Vaccinations => delete::<Vaccination>(&mut store, &id, "vaccination", yes)?,
                Kind::Tests => delete::<TestProcedure>(&mut store, &id, "test", yes)?,
                Kind::Drugs => delete::<Drug>(&mut store, &id, "drug", yes)?,
                Kind::Prescriptions => {
                    delete::<Prescription>(&mut store, &id, "prescription", yes)?
                }
                Kind::VaccineTypes => {
                    delete::<VaccineType>(&mut store, &id, "vaccine type", yes)?
                }
            };
            match outcome {
                DeleteOutcome::Deleted => println!("Deleted {}", id),
                DeleteOutcome::Cancelled => println!("Cancelled"),
                DeleteOutcome::NotFound => bail!("no record with id {}", id),
            }
        }
        Commands::AddVaccination {
            animal_id,
            age,
            sex,
            species,
            owner_phone,
            vaccine,
            date,
            time,
            doses,
            interval,
            pregnant,
            notes,
        } => {
            let mut form = VaccinationForm::new(now, &Local);
            form.animal_id = animal_id;
            form.age = age;
            form.sex = sex;
            form.species = species;
            form.owner_phone = owner_phone;
            form.vaccine_type = vaccine;
            if let Some(date) = date {
                form.vaccine_date = date;
            }
            if let Some(time) = time {
                form.vaccine_time = time;
            }
            let catalog: Vec<VaccineType> = store.get_all()?;
            if form.apply_catalog_entry(&catalog) {
                println!(
                    "Using catalog plan for {}: {} dose(s), {} days apart",
                    form.vaccine_type, form.total_doses, form.days_interval
                );
            }
            if let Some(doses) = doses {
                form.total_doses = doses;
            }
            if let Some(interval) = interval {
                form.days_interval = interval;
            }
            form.is_pregnant = pregnant;
            form.notes = notes.unwrap_or_default();

            let scheduler = config
                .notifications_enabled()
                .then(|| console_scheduler(config.reminder_lead_days()));

            let mut view = RecordView::new();
            view.open_create();
            let (saved, armed) = controllers::submit_vaccination(
                &mut store,
                &mut view,
                &form,
                scheduler.as_ref(),
                now,
                &Local,
            )?;

            println!("Saved vaccination {}", saved.id);
            for dose in &saved.doses {
                println!(
                    "  Dose {}: {}",
                    dose.number,
                    format_date_time(dose.date, &Local)
                );
            }
            if !armed.is_empty() {
                println!(
                    "{} reminder(s) planned; run `vet-records reminders` to keep them armed",
                    armed.len()
                );
            }
        }
        Commands::Applicable { species, age } => {
            let vaccine_types: Vec<VaccineType> = store.get_all()?;
            let tests: Vec<TestProcedure> = store.get_all()?;
            let drugs: Vec<Drug> = store.get_all()?;

            println!("Vaccine types for {}:", species);
            for v in vaccine_types_for(&vaccine_types, species) {
                println!("  {}  {} dose(s) every {} days", v.name, v.total_doses, v.days_interval);
            }
            println!("Tests for {} aged {}:", species, age);
            for t in tests_for(&tests, species, age) {
                println!("  {}  {} step(s)", t.name, t.steps.len());
            }
            println!("Drugs for {}:", species);
            for d in drugs_for_species(&drugs, species) {
                if let Some(dosage) = d.dosage_for(species) {
                    println!("  {}  {} mg/kg", d.name, dosage);
                }
            }
        }
        Commands::MarkDose { id, dose } => {
            if controllers::mark_dose_administered(&mut store, &id, dose)? {
                println!("Dose {} of {} marked as administered", dose, id);
            } else {
                bail!("vaccination {} has no dose {}", id, dose);
            }
        }
        Commands::AddDrug {
            name,
            dosages,
            routes,
        } => {
            let form = DrugForm {
                name,
                dosages: dosages
                    .iter()
                    .map(|d| parse_dosage(d))
                    .collect::<anyhow::Result<_>>()?,
                routes,
            };
            let mut view = RecordView::new();
            view.open_create();
            let saved = controllers::submit_drug(&mut store, &mut view, &form)?;
            println!("Saved drug {} ({})", saved.name, saved.id);
        }
        Commands::Dose {
            drug_id,
            species,
            weight,
        } => {
            let drug: Drug = store
                .get(&drug_id)?
                .with_context(|| format!("no drug with id {}", drug_id))?;
            let dose = calculate_dose(&drug, species, weight)?;
            println!("{}: {}", drug.name, format_dose_mg(dose));
        }
        Commands::Prescribe {
            animal_id,
            species,
            weight,
            drugs,
        } => {
            let formulary: Vec<Drug> = store.get_all()?;
            let mut builder = PrescriptionBuilder::new();
            builder.animal_id = animal_id;
            builder.set_species(species);
            builder.set_weight(&weight);

            for entry in &drugs {
                let (drug_id, route) = match entry.split_once(':') {
                    Some((id, route)) => (id, Some(route)),
                    None => (entry.as_str(), None),
                };
                let drug = formulary
                    .iter()
                    .find(|d| d.id == drug_id)
                    .with_context(|| format!("no drug with id {}", drug_id))?;
                builder.add_drug(drug)?;
                if let Some(route) = route {
                    let route: Route = route.parse().map_err(anyhow::Error::msg)?;
                    builder.update_route(&drug.id, route)?;
                }
            }

            let saved = controllers::submit_prescription(&mut store, &mut builder, now)?;
            println!("Saved prescription {}", saved.id);
            let sheet = PrescriptionSheet::new(&saved, &formulary, &Local);
            for line in &sheet.lines {
                println!(
                    "  {} ({}): {}",
                    line.display_name(),
                    line.route,
                    format_dose_mg(line.total_dose)
                );
            }
        }
        Commands::PrintPrescription { id, format, out } => {
            let prescription: Prescription = store
                .get(&id)?
                .with_context(|| format!("no prescription with id {}", id))?;
            let drugs: Vec<Drug> = store.get_all()?;
            let sheet = PrescriptionSheet::new(&prescription, &drugs, &Local);
            let rendered = match format {
                SheetFormat::Html => sheet.to_html(),
                SheetFormat::Csv => sheet.to_csv(),
                SheetFormat::Json => sheet.to_json()?,
            };
            write_output(out.as_deref(), &rendered)?;
        }
        Commands::Calendar { year, month } => {
            let mut view = CalendarView::current(now, &Local);
            if let Some(year) = year {
                view.year = year;
            }
            if let Some(month) = month {
                view.month = month;
            }
            let vaccinations: Vec<Vaccination> = store.get_all()?;

            println!("{}", view.title()?);
            println!(" Sun  Mon  Tue  Wed  Thu  Fri  Sat");
            let days = view.days(&vaccinations, now, &Local)?;
            for week in days.chunks(7) {
                let row: Vec<String> = week
                    .iter()
                    .map(|day| {
                        if !day.in_month {
                            return "    ".to_string();
                        }
                        let mark = match (day.is_today, day.vaccination_count > 0) {
                            (true, _) => '*',
                            (false, true) => '+',
                            (false, false) => ' ',
                        };
                        format!("{:>3}{}", chrono::Datelike::day(&day.date), mark)
                    })
                    .collect();
                println!("{}", row.join(" "));
            }
            println!("* today  + vaccinations scheduled");
        }
        Commands::Upcoming => {
            let vaccinations: Vec<Vaccination> = store.get_all()?;
            let due = upcoming_doses(&vaccinations, now, &Local);
            if due.is_empty() {
                println!("No doses due in the next three days.");
            }
            for (vaccination, dose) in due {
                println!(
                    "{}  {}  Dose {}  {}",
                    vaccination.animal_id,
                    vaccination.vaccine_type,
                    dose.number,
                    format_date_time(dose.date, &Local)
                );
            }
        }
        Commands::Reminders => {
            if !config.notifications_enabled() {
                bail!("notifications are disabled");
            }
            let scheduler = console_scheduler(config.reminder_lead_days());
            let vaccinations: Vec<Vaccination> = store.get_all()?;
            let armed: usize = vaccinations
                .iter()
                .map(|v| scheduler.schedule(v, now, &Local).len())
                .sum();

            println!("{} reminder(s) armed; press Ctrl-C to stop", armed);
            tokio::signal::ctrl_c().await?;
        }
        Commands::Export { out } => {
            let json = store.export_all()?;
            write_output(out.as_deref(), &json)?;
        }
        Commands::Backup { dir } => {
            let dir = match dir {
                Some(dir) => dir,
                None => std::env::current_dir()?,
            };
            let path = write_backup(&store, &dir, now, &Local)?;
            println!("Backup written to {}", path.display());
        }
        Commands::Import { file } => {
            let json = std::fs::read_to_string(&file)
                .with_context(|| format!("reading {}", file.display()))?;
            let summary = store.import_all(&json)?;
            if summary.is_empty() {
                println!("Nothing to import");
            }
            for (collection, count) in &summary.replaced {
                println!("Replaced {} with {} record(s)", collection.key(), count);
            }
        }
        Commands::SeedDemo => {
            let report = store.seed_demo_data(now, &Local)?;
            println!(
                "Seeded vaccinations: {}, tests: {}, drugs: {}",
                report.vaccinations, report.tests, report.drugs
            );
        }
        Commands::Theme { action } => {
            let theme = match action {
                None => store.theme()?,
                Some(ThemeAction::Toggle) => {
                    let theme = store.theme()?.toggled();
                    store.set_theme(theme)?;
                    theme
                }
                Some(ThemeAction::Set { theme }) => {
                    let theme = Theme::from(theme);
                    store.set_theme(theme)?;
                    theme
                }
            };
            println!("{}", theme);
        }
    }

    Ok(())
}

fn resolve_db_path(flag: Option<PathBuf>) -> anyhow::Result<PathBuf> {
    if let Some(path) = flag {
        return Ok(path);
    }
    let data_dir = dirs::data_dir().context("no data directory for this platform")?;
    Ok(data_dir.join("vet-records").join("records.db"))
}

fn console_scheduler(lead_days: u32) -> ReminderScheduler {
    let timer = TokioTimer::new(tokio::runtime::Handle::current());
    ReminderScheduler::new(Arc::new(ConsoleNotifier), Arc::new(timer)).with_lead_days(lead_days)
}

fn list<R: Record + Searchable>(
    store: &RecordStore<Database>,
    search: &str,
) -> anyhow::Result<Vec<R>> {
    let mut view = RecordView::<R>::new();
    view.search = search.to_string();
    Ok(view.list(store)?)
}

fn delete<R: Record + Searchable>(
    store: &mut RecordStore<Database>,
    id: &str,
    noun: &str,
    skip_prompt: bool,
) -> anyhow::Result<DeleteOutcome> {
    let mut view = RecordView::<R>::new();
    Ok(view.delete(store, id, |_| skip_prompt || confirm(noun))?)
}

fn confirm(noun: &str) -> bool {
    print!("Are you sure you want to delete this {}? [y/N] ", noun);
    if io::stdout().flush().is_err() {
        return false;
    }
    let mut answer = String::new();
    match io::stdin().lock().read_line(&mut answer) {
        Ok(_) => matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"),
        Err(_) => false,
    }
}

/// Parse `species=mg_per_kg`.
fn parse_dosage(value: &str) -> anyhow::Result<SpeciesDosage> {
    let (species, dosage) = value
        .split_once('=')
        .with_context(|| format!("expected species=mg_per_kg, got {}", value))?;
    Ok(SpeciesDosage {
        species: species.parse().map_err(anyhow::Error::msg)?,
        dosage: dosage
            .trim()
            .parse()
            .with_context(|| format!("invalid dosage in {}", value))?,
    })
}

fn write_output(path: Option<&Path>, contents: &str) -> anyhow::Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, contents)
                .with_context(|| format!("writing {}", path.display()))?;
            println!("Wrote {}", path.display());
        }
        None => println!("{}", contents),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_dosage() {
        let dosage = parse_dosage("cow=7").unwrap();
        assert_eq!(dosage.species, Species::Cow);
        assert_eq!(dosage.dosage, 7.0);

        assert!(parse_dosage("cow").is_err());
        assert!(parse_dosage("dragon=2").is_err());
        assert!(parse_dosage("dog=lots").is_err());
    }

    #[test]
    fn test_cli_parses_commands() {
        let cli = Cli::try_parse_from([
            "vet-records",
            "--db",
            "/tmp/records.db",
            "prescribe",
            "COW-001",
            "--species",
            "cow",
            "--weight",
            "250",
            "--drug",
            "amox:im",
        ])
        .unwrap();

        assert_eq!(cli.db, Some(PathBuf::from("/tmp/records.db")));
        match cli.command {
            Commands::Prescribe { drugs, species, .. } => {
                assert_eq!(species, Species::Cow);
                assert_eq!(drugs, vec!["amox:im".to_string()]);
            }
            _ => panic!("expected prescribe"),
        }
    }

    #[test]
    fn test_dose_plan_defaults_to_catalog() {
        let cli = Cli::try_parse_from([
            "vet-records",
            "add-vaccination",
            "COW-001",
            "--age",
            "2",
            "--sex",
            "female",
            "--species",
            "cow",
            "--owner-phone",
            "555-1234",
            "--vaccine",
            "FMD Vaccine",
            "--interval",
            "14",
        ])
        .unwrap();

        match cli.command {
            Commands::AddVaccination {
                doses, interval, ..
            } => {
                assert_eq!(doses, None);
                assert_eq!(interval, Some(14));
            }
            _ => panic!("expected add-vaccination"),
        }
    }

    #[test]
    fn test_applicable_takes_species_and_age() {
        let cli = Cli::try_parse_from(["vet-records", "applicable", "buffalo", "3.5"]).unwrap();
        match cli.command {
            Commands::Applicable { species, age } => {
                assert_eq!(species, Species::Buffalo);
                assert_eq!(age, 3.5);
            }
            _ => panic!("expected applicable"),
        }
    }

    #[test]
    fn test_explicit_db_path_wins() {
        let path = resolve_db_path(Some(PathBuf::from("records.db"))).unwrap();
        assert_eq!(path, PathBuf::from("records.db"));
    }
}
