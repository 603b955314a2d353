//! Plan document line scanner.
//!
//! Turns the plain-text lines of a plan document into [`ImportedAthleteData`]
//! in a single forward pass. The document layout is:
//!
//! ```text
//! Имя: Иван
//! ПМ (01.01.2024):
//! Присед: 100 кг
//! Неделя 1
//! Тренировка 1
//! Присед: 50кг×6, 60кг×5×3
//! Тренировка 2 - ПРОХОДКА
//! Жим: 80кг×1
//! ```
//!
//! Workouts are collected in an accumulator that is flushed into the result
//! whenever a new week or workout starts, and once more at end of input.
//! A workout is only kept when its week and number are known and it has at
//! least one exercise.

use crate::series::{validate_series, SeriesCodec, SkippedFragment};
use crate::vocabulary;
use crate::{
    Error, ImportedAthleteData, Lift, ParsedExercise, ParsedPlan, PlanKind, Result, Vocabulary,
};
use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Non-fatal problem found while scanning; `line` is 1-based
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScanWarning {
    /// Exercise line whose series text produced no sets; the exercise is dropped
    UnparsedSeries { line: usize, lift: Lift, text: String },
    /// Exercise kept, but some fragments of its series were dropped
    SkippedFragments {
        line: usize,
        lift: Lift,
        fragments: Vec<SkippedFragment>,
    },
    /// Exercise kept, but a set has a negative weight or a non-positive count
    InvalidSeries { line: usize, lift: Lift },
    /// Exercise line before a week and workout were both known
    ExerciseOutsidePlan { line: usize, lift: Lift },
    /// Notes line before a week and workout were both known
    NotesOutsidePlan { line: usize },
    /// PM date missing or impossible; today's date was used
    PmDateDefaulted { line: usize, text: String },
    /// Line that matches nothing in the document layout
    UnrecognizedLine { line: usize, text: String },
}

impl ScanWarning {
    /// Human-readable message with lift names taken from `vocab`
    pub fn describe(&self, vocab: &Vocabulary) -> String {
        match self {
            ScanWarning::UnparsedSeries { line, lift, text } => format!(
                "line {}: no sets in {} series '{}', exercise dropped",
                line,
                vocab.lift_name(*lift),
                text
            ),
            ScanWarning::SkippedFragments {
                line,
                lift,
                fragments,
            } => {
                let list = fragments
                    .iter()
                    .map(|skipped| skipped.fragment.as_str())
                    .collect::<Vec<_>>()
                    .join("; ");
                format!(
                    "line {}: skipped {} fragments: {}",
                    line,
                    vocab.lift_name(*lift),
                    list
                )
            }
            ScanWarning::InvalidSeries { line, lift } => format!(
                "line {}: {} series has invalid sets",
                line,
                vocab.lift_name(*lift)
            ),
            ScanWarning::ExerciseOutsidePlan { line, lift } => format!(
                "line {}: {} exercise outside a week/workout, ignored",
                line,
                vocab.lift_name(*lift)
            ),
            ScanWarning::NotesOutsidePlan { line } => {
                format!("line {}: notes outside a week/workout, ignored", line)
            }
            ScanWarning::PmDateDefaulted { line, text } => {
                format!("line {}: PM date '{}' not understood, using today", line, text)
            }
            ScanWarning::UnrecognizedLine { line, text } => {
                format!("line {}: unrecognized '{}'", line, text)
            }
        }
    }
}

impl fmt::Display for ScanWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe(vocabulary::standard()))
    }
}

/// Scanned document plus everything that was skipped on the way
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ScanReport {
    pub data: ImportedAthleteData,
    pub warnings: Vec<ScanWarning>,
}

/// Workout being assembled
#[derive(Debug, Default)]
struct PlanAccumulator {
    week: Option<u32>,
    workout: Option<u32>,
    kind: PlanKind,
    exercises: Vec<ParsedExercise>,
    notes: Option<String>,
}

impl PlanAccumulator {
    fn is_open(&self) -> bool {
        self.week.is_some() && self.workout.is_some()
    }

    /// Move a complete workout into `plans` and clear the exercises
    fn flush_into(&mut self, plans: &mut Vec<ParsedPlan>) {
        let exercises = std::mem::take(&mut self.exercises);
        let notes = self.notes.take();

        if let (Some(week), Some(workout_number)) = (self.week, self.workout) {
            if !exercises.is_empty() {
                tracing::debug!(
                    "Flushing week {} workout {} with {} exercises",
                    week,
                    workout_number,
                    exercises.len()
                );
                plans.push(ParsedPlan {
                    week,
                    workout_number,
                    kind: self.kind,
                    exercises,
                    notes,
                });
            }
        }
    }
}

/// Line grammar of plan documents, compiled from a vocabulary
#[derive(Clone, Debug)]
pub struct PlanScanner {
    vocab: Vocabulary,
    codec: SeriesCodec,
    name: Regex,
    pm_date: Regex,
    date: Regex,
    pm_value: Regex,
    week: Regex,
    workout: Regex,
    exercise: Regex,
    notes: Regex,
}

impl PlanScanner {
    pub fn new(vocab: &Vocabulary) -> Result<Self> {
        let lifts = Lift::ALL
            .iter()
            .map(|lift| regex::escape(vocab.lift_name(*lift)))
            .collect::<Vec<_>>()
            .join("|");
        let name = regex::escape(&vocab.name_marker);
        let pm = regex::escape(&vocab.pm_marker);
        let unit = regex::escape(&vocab.unit);
        let week = regex::escape(&vocab.week_marker);
        let workout = regex::escape(&vocab.workout_marker);
        let test = regex::escape(&vocab.test_marker);
        let notes = regex::escape(&vocab.notes_marker);

        Ok(Self {
            vocab: vocab.clone(),
            codec: SeriesCodec::new(vocab)?,
            name: Regex::new(&format!(r"(?i)^{name}\s*(.+)$"))?,
            pm_date: Regex::new(&format!(r"(?i)^{pm}\s*\((.+)\):?$"))?,
            date: Regex::new(r"([0-9]{1,2})\.([0-9]{1,2})\.([0-9]{4})")?,
            pm_value: Regex::new(&format!(
                r"(?i)^({lifts}):\s*([0-9]+(?:\.[0-9]+)?)\s*{unit}$"
            ))?,
            week: Regex::new(&format!(r"(?i)^{week}\s+([0-9]+)$"))?,
            workout: Regex::new(&format!(r"(?i)^{workout}\s+([0-9]+)(?:\s*-\s*{test})?$"))?,
            exercise: Regex::new(&format!(r"(?i)^({lifts}):\s*(.+)$"))?,
            notes: Regex::new(&format!(r"(?i)^{notes}\s*(.*)$"))?,
        })
    }

    /// Scan document lines into athlete data
    ///
    /// `today` is used when the PM date is missing or unreadable.
    /// Fails only when no athlete name line is present.
    pub fn scan<I, S>(&self, lines: I, today: NaiveDate) -> Result<ScanReport>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut data = ImportedAthleteData::default();
        let mut warnings = Vec::new();
        let mut current = PlanAccumulator::default();

        for (index, raw) in lines.into_iter().enumerate() {
            let line_no = index + 1;
            let line = raw.as_ref().trim();
            if line.is_empty() {
                continue;
            }

            if let Some(caps) = self.name.captures(line) {
                data.athlete_name = caps[1].trim().to_uppercase();
                continue;
            }

            if let Some(caps) = self.pm_date.captures(line) {
                let text = caps[1].trim();
                data.pm_date = Some(match self.parse_date(text) {
                    Some(date) => date,
                    None => {
                        warnings.push(ScanWarning::PmDateDefaulted {
                            line: line_no,
                            text: text.to_string(),
                        });
                        today
                    }
                });
                continue;
            }

            if let Some(caps) = self.pm_value.captures(line) {
                if let (Some(lift), Ok(value)) =
                    (self.vocab.lift_from_name(&caps[1]), caps[2].parse::<f64>())
                {
                    match lift {
                        Lift::Squat => data.squat_pm = Some(value),
                        Lift::Bench => data.bench_pm = Some(value),
                        Lift::Deadlift => data.deadlift_pm = Some(value),
                    }
                    continue;
                }
            }

            if let Some(number) = self.week.captures(line).and_then(|c| c[1].parse::<u32>().ok()) {
                current.flush_into(&mut data.plans);
                current.week = Some(number);
                current.workout = None;
                current.kind = PlanKind::Regular;
                continue;
            }

            if let Some(number) = self
                .workout
                .captures(line)
                .and_then(|c| c[1].parse::<u32>().ok())
            {
                current.flush_into(&mut data.plans);
                current.workout = Some(number);
                current.kind = if line.contains(&self.vocab.test_marker) {
                    PlanKind::Test
                } else {
                    PlanKind::Regular
                };
                continue;
            }

            if let Some(caps) = self.exercise.captures(line) {
                if let Some(lift) = self.vocab.lift_from_name(&caps[1]) {
                    self.scan_exercise(lift, caps[2].trim(), line_no, &mut current, &mut warnings);
                    continue;
                }
            }

            if let Some(caps) = self.notes.captures(line) {
                if current.is_open() {
                    let text = caps[1].trim();
                    if !text.is_empty() {
                        current.notes = Some(text.to_string());
                    }
                } else {
                    warnings.push(ScanWarning::NotesOutsidePlan { line: line_no });
                }
                continue;
            }

            warnings.push(ScanWarning::UnrecognizedLine {
                line: line_no,
                text: line.to_string(),
            });
        }

        current.flush_into(&mut data.plans);

        if data.athlete_name.is_empty() {
            tracing::warn!("Plan text has no athlete name line");
            return Err(Error::AthleteNameMissing);
        }

        for warning in &warnings {
            tracing::warn!("{}", warning.describe(&self.vocab));
        }
        tracing::info!(
            "Scanned plan for {}: {} plans, {} warnings",
            data.athlete_name,
            data.plans.len(),
            warnings.len()
        );

        Ok(ScanReport { data, warnings })
    }

    fn scan_exercise(
        &self,
        lift: Lift,
        text: &str,
        line: usize,
        current: &mut PlanAccumulator,
        warnings: &mut Vec<ScanWarning>,
    ) {
        if !current.is_open() {
            warnings.push(ScanWarning::ExerciseOutsidePlan { line, lift });
            return;
        }

        let parsed = self.codec.parse(text);
        if parsed.sets.is_empty() {
            warnings.push(ScanWarning::UnparsedSeries {
                line,
                lift,
                text: text.to_string(),
            });
            return;
        }

        if !parsed.skipped.is_empty() {
            warnings.push(ScanWarning::SkippedFragments {
                line,
                lift,
                fragments: parsed.skipped,
            });
        }
        if !validate_series(&parsed.sets) {
            warnings.push(ScanWarning::InvalidSeries { line, lift });
        }

        current.exercises.push(ParsedExercise {
            lift,
            series: parsed.sets,
        });
    }

    /// `dd.mm.yyyy` anywhere in the text
    fn parse_date(&self, text: &str) -> Option<NaiveDate> {
        let caps = self.date.captures(text)?;
        let day = caps[1].parse().ok()?;
        let month = caps[2].parse().ok()?;
        let year = caps[3].parse().ok()?;
        NaiveDate::from_ymd_opt(year, month, day)
    }
}
