//! Plan document export.
//!
//! Builds the paragraph sequence of a plan document: athlete header, PM
//! block, then weeks and workouts in order. Paragraphs carry emphasis and
//! spacing hints for a DOCX writer; [`render_text`] flattens them to the
//! plain-text layout the scanner reads, so an exported plan can be
//! imported again.

use crate::records::AthleteRecord;
use crate::series::format_series;
use crate::{Lift, PlanKind, SeriesSet, Vocabulary};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Font size of the athlete name, in half-points
const TITLE_SIZE: u32 = 28;
const WEEK_SIZE: u32 = 24;
const NOTES_SIZE: u32 = 20;

/// A run of text with uniform emphasis
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct TextRun {
    pub text: String,
    pub bold: bool,
    pub italics: bool,
    /// Font size in half-points; `None` keeps the document default
    pub size: Option<u32>,
}

impl TextRun {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn bold(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: true,
            ..Self::default()
        }
    }

    fn sized(mut self, size: u32) -> Self {
        self.size = Some(size);
        self
    }
}

/// Space around a paragraph, in twentieths of a point
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Spacing {
    pub before: Option<u32>,
    pub after: Option<u32>,
}

impl Spacing {
    fn after(after: u32) -> Self {
        Self {
            before: None,
            after: Some(after),
        }
    }

    fn around(before: u32, after: u32) -> Self {
        Self {
            before: Some(before),
            after: Some(after),
        }
    }
}

/// One paragraph of the exported document
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Paragraph {
    pub runs: Vec<TextRun>,
    pub spacing: Spacing,
}

impl Paragraph {
    fn new(runs: Vec<TextRun>, spacing: Spacing) -> Self {
        Self { runs, spacing }
    }

    fn blank(spacing: Spacing) -> Self {
        Self {
            runs: Vec::new(),
            spacing,
        }
    }

    /// Concatenated text of all runs
    pub fn text(&self) -> String {
        self.runs.iter().map(|run| run.text.as_str()).collect()
    }
}

/// An exercise line to export
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ExportExercise {
    pub name: String,
    pub series: Vec<SeriesSet>,
}

/// A workout to export
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ExportPlan {
    pub week: u32,
    pub workout_number: u32,
    pub kind: PlanKind,
    pub exercises: Vec<ExportExercise>,
    pub notes: Option<String>,
}

/// Input of the exporter
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ExportDocument {
    pub athlete_name: String,
    pub pm_date: Option<NaiveDate>,
    pub squat_pm: Option<f64>,
    pub bench_pm: Option<f64>,
    pub deadlift_pm: Option<f64>,
    pub plans: Vec<ExportPlan>,
}

impl ExportDocument {
    /// Export view of a stored athlete
    pub fn from_record(athlete: &AthleteRecord, vocab: &Vocabulary) -> Self {
        let plans = athlete
            .sorted_plans()
            .into_iter()
            .map(|plan| {
                let mut exercises: Vec<_> = plan.exercises.iter().collect();
                exercises.sort_by_key(|e| e.order_index);

                ExportPlan {
                    week: plan.week,
                    workout_number: plan.workout_number,
                    kind: plan.kind,
                    notes: plan.notes.clone(),
                    exercises: exercises
                        .into_iter()
                        .map(|e| ExportExercise {
                            name: vocab.lift_name(e.lift).to_string(),
                            series: e.series.clone(),
                        })
                        .collect(),
                }
            })
            .collect();

        Self {
            athlete_name: athlete.name.clone(),
            pm_date: athlete.pm_date,
            squat_pm: athlete.squat_pm,
            bench_pm: athlete.bench_pm,
            deadlift_pm: athlete.deadlift_pm,
            plans,
        }
    }

    fn pm(&self, lift: Lift) -> Option<f64> {
        match lift {
            Lift::Squat => self.squat_pm,
            Lift::Bench => self.bench_pm,
            Lift::Deadlift => self.deadlift_pm,
        }
    }
}

/// Build the paragraphs of a plan document
///
/// `today` stands in for a missing PM date.
pub fn build_paragraphs(
    doc: &ExportDocument,
    vocab: &Vocabulary,
    today: NaiveDate,
) -> Vec<Paragraph> {
    let mut paragraphs = Vec::new();

    paragraphs.push(Paragraph::new(
        vec![TextRun::bold(format!("{} {}", vocab.name_marker, doc.athlete_name.to_uppercase()))
            .sized(TITLE_SIZE)],
        Spacing::after(200),
    ));

    let pm_date = doc.pm_date.unwrap_or(today).format("%d.%m.%Y");
    paragraphs.push(Paragraph::new(
        vec![TextRun::bold(format!("{} ({}):", vocab.pm_marker, pm_date))],
        Spacing::after(100),
    ));

    for lift in Lift::ALL {
        if let Some(pm) = doc.pm(lift).filter(|pm| *pm != 0.0) {
            paragraphs.push(Paragraph::new(
                vec![TextRun::plain(format!(
                    "{}: {} {}",
                    vocab.lift_name(lift),
                    pm,
                    vocab.unit
                ))],
                Spacing::default(),
            ));
        }
    }

    paragraphs.push(Paragraph::blank(Spacing::after(200)));

    let mut weeks: BTreeMap<u32, Vec<&ExportPlan>> = BTreeMap::new();
    for plan in &doc.plans {
        weeks.entry(plan.week).or_default().push(plan);
    }

    for (week, mut plans) in weeks {
        plans.sort_by_key(|plan| plan.workout_number);

        paragraphs.push(Paragraph::new(
            vec![TextRun::bold(format!("{} {}", vocab.week_marker, week)).sized(WEEK_SIZE)],
            Spacing::around(300, 200),
        ));

        for plan in plans {
            let title = match plan.kind {
                PlanKind::Test => format!(
                    "{} {} - {}",
                    vocab.workout_marker, plan.workout_number, vocab.test_marker
                ),
                PlanKind::Regular => format!("{} {}", vocab.workout_marker, plan.workout_number),
            };
            paragraphs.push(Paragraph::new(
                vec![TextRun::bold(title)],
                Spacing::around(200, 100),
            ));

            for exercise in &plan.exercises {
                paragraphs.push(Paragraph::new(
                    vec![
                        TextRun::plain(format!("{}: ", exercise.name)),
                        TextRun::plain(format_series(&exercise.series, vocab)),
                    ],
                    Spacing::default(),
                ));
            }

            if let Some(notes) = plan.notes.as_deref().filter(|n| !n.is_empty()) {
                paragraphs.push(Paragraph::new(
                    vec![TextRun {
                        text: format!("{} {}", vocab.notes_marker, notes),
                        italics: true,
                        size: Some(NOTES_SIZE),
                        ..TextRun::default()
                    }],
                    Spacing {
                        before: Some(50),
                        after: None,
                    },
                ));
            }

            paragraphs.push(Paragraph::blank(Spacing::default()));
        }
    }

    tracing::debug!(
        "Built {} paragraphs for {} plans",
        paragraphs.len(),
        doc.plans.len()
    );
    paragraphs
}

/// Plain text of a paragraph sequence, one line per paragraph
pub fn render_text(paragraphs: &[Paragraph]) -> String {
    let mut text = String::new();
    for paragraph in paragraphs {
        text.push_str(&paragraph.text());
        text.push('\n');
    }
    text
}
