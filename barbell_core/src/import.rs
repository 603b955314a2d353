//! Plan document import pipeline.
//!
//! Text extracted from a plan document (the DOCX container is read
//! elsewhere) is split into lines, scanned, and turned into the rows the
//! athlete book stores.

use crate::records::PlanRecord;
use crate::scanner::{PlanScanner, ScanReport};
use crate::{ImportedAthleteData, Lift, Result, Vocabulary};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Split extracted text into trimmed, non-empty lines
pub fn extract_lines(text: &str) -> Vec<String> {
    text.split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Scan a whole plan document
pub fn import_plan_text(text: &str, vocab: &Vocabulary, today: NaiveDate) -> Result<ScanReport> {
    let scanner = PlanScanner::new(vocab)?;
    let lines = extract_lines(text);
    tracing::debug!("Importing plan text with {} lines", lines.len());
    scanner.scan(lines, today)
}

/// Exercise catalog entry created for an imported lift
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct CatalogExercise {
    pub name: String,
    pub lift: Lift,
    pub category: String,
}

impl CatalogExercise {
    pub fn for_lift(lift: Lift, vocab: &Vocabulary) -> Self {
        Self {
            name: vocab.lift_name(lift).to_string(),
            lift,
            category: vocab.category(lift).to_string(),
        }
    }
}

/// Everything an import writes besides the athlete itself
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ImportBatch {
    /// Catalog entries for the lifts used, in order of first use
    pub exercises: Vec<CatalogExercise>,
    pub plans: Vec<PlanRecord>,
}

impl ImportBatch {
    pub fn from_imported(data: &ImportedAthleteData, vocab: &Vocabulary) -> Self {
        let mut exercises: Vec<CatalogExercise> = Vec::new();
        for exercise in data.plans.iter().flat_map(|plan| &plan.exercises) {
            if !exercises.iter().any(|e| e.lift == exercise.lift) {
                exercises.push(CatalogExercise::for_lift(exercise.lift, vocab));
            }
        }

        Self {
            exercises,
            plans: data.plans.iter().map(PlanRecord::from_parsed).collect(),
        }
    }
}
