//! Printable prescription sheets.

use chrono::TimeZone;
use serde::{Deserialize, Serialize};

use crate::calc::format_dose_mg;
use crate::dates::format_calendar_date;
use crate::models::{Drug, Prescription, Species};

/// Marker shown for a drug id that no longer resolves.
pub const UNKNOWN_DRUG: &str = "unknown drug";

/// Prescription resolved against the current drug list, ready to print.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrescriptionSheet {
    pub prescription_id: String,
    pub animal_id: String,
    pub species: Species,
    /// kg
    pub weight: f64,
    /// Local display date
    pub date: String,
    pub lines: Vec<SheetLine>,
}

/// One drug row of the sheet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SheetLine {
    pub drug_id: String,
    /// None when the drug has been deleted
    pub drug_name: Option<String>,
    /// mg/kg for the prescribed species, if still on file
    pub rate: Option<f64>,
    pub route: String,
    /// Total dose in mg
    pub total_dose: f64,
}

impl SheetLine {
    /// Drug name, or the id with an unknown-drug marker.
    pub fn display_name(&self) -> String {
        match &self.drug_name {
            Some(name) => name.clone(),
            None => format!("{} ({})", self.drug_id, UNKNOWN_DRUG),
        }
    }

    fn display_rate(&self) -> String {
        match self.rate {
            Some(rate) => format!("{} mg/kg", rate),
            None => "-".to_string(),
        }
    }
}

impl PrescriptionSheet {
    /// Resolve drug ids against `drugs`. Missing drugs do not fail.
    pub fn new<Tz: TimeZone>(prescription: &Prescription, drugs: &[Drug], tz: &Tz) -> Self {
        let lines = prescription
            .drugs
            .iter()
            .map(|item| {
                let drug = drugs.iter().find(|d| d.id == item.drug_id);
                SheetLine {
                    drug_id: item.drug_id.clone(),
                    drug_name: drug.map(|d| d.name.clone()),
                    rate: drug.and_then(|d| d.dosage_for(prescription.species)),
                    route: item.route.to_string(),
                    total_dose: item.calculated_dose,
                }
            })
            .collect();

        Self {
            prescription_id: prescription.id.clone(),
            animal_id: prescription.animal_id.clone(),
            species: prescription.species,
            weight: prescription.weight,
            date: format_calendar_date(prescription.date, tz),
            lines,
        }
    }

    /// Export to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Export to CSV format, one row per drug.
    pub fn to_csv(&self) -> String {
        let mut csv = String::new();

        csv.push_str("prescription_id,animal_id,species,weight_kg,date,drug,dosage,route,total_dose\n");

        for line in &self.lines {
            csv.push_str(&format!(
                "{},{},{},{},{},{},{},{},{}\n",
                escape_csv(&self.prescription_id),
                escape_csv(&self.animal_id),
                self.species,
                self.weight,
                escape_csv(&self.date),
                escape_csv(&line.display_name()),
                escape_csv(&line.display_rate()),
                line.route,
                format_dose_mg(line.total_dose),
            ));
        }

        csv
    }

    /// Standalone HTML page for printing.
    pub fn to_html(&self) -> String {
        let rows: String = self
            .lines
            .iter()
            .map(|line| {
                format!(
                    "      <tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
                    escape_html(&line.display_name()),
                    escape_html(&line.display_rate()),
                    escape_html(&line.route),
                    format_dose_mg(line.total_dose),
                )
            })
            .collect();

        format!(
            r#"<!DOCTYPE html>
<html>
  <head>
    <meta charset="utf-8">
    <title>Prescription - {animal}</title>
    <style>
      body {{ font-family: Arial, sans-serif; max-width: 800px; margin: 0 auto; padding: 20px; }}
      table {{ width: 100%; border-collapse: collapse; }}
      th, td {{ text-align: left; padding: 10px; border: 1px solid #ddd; }}
    </style>
  </head>
  <body>
    <h1>Animal Prescription</h1>
    <p><strong>Animal ID:</strong> {animal}</p>
    <p><strong>Species:</strong> {species}</p>
    <p><strong>Weight:</strong> {weight} kg</p>
    <p><strong>Date:</strong> {date}</p>
    <table>
      <tr><th>Drug</th><th>Dosage</th><th>Route</th><th>Total Dose</th></tr>
{rows}    </table>
    <p>Prescribed by: ______________________________</p>
  </body>
</html>
"#,
            animal = escape_html(&self.animal_id),
            species = self.species,
            weight = self.weight,
            date = escape_html(&self.date),
            rows = rows,
        )
    }
}

/// Escape a string for CSV output.
fn escape_csv(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

/// Escape text for HTML element content and attribute values.
fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
