//! Stored athlete and plan records.
//!
//! Records are what the athlete book keeps between runs. They are built
//! from scanned plan documents and turned back into export documents.
//! PM merge rules follow the coaching workflow: a re-imported document
//! updates the lifts it mentions, keeps the others, and appends a PM history
//! entry so progress can be charted.

use crate::weights::{generate_weight_table, RoundingStep};
use crate::{ImportedAthleteData, Lift, ParsedPlan, PercentRow, PlanKind, SeriesSet};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// PMs recorded on one date
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct PmHistoryEntry {
    pub date: NaiveDate,
    pub squat: Option<f64>,
    pub bench: Option<f64>,
    pub deadlift: Option<f64>,
}

/// Single-set target of a plan exercise, as shown in plan tables
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct PlanTarget {
    pub weight: f64,
    pub reps: i32,
    pub sets: i32,
}

/// An exercise inside a stored plan
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct PlanExerciseRecord {
    pub lift: Lift,
    pub order_index: u32,
    pub series: Vec<SeriesSet>,
}

impl PlanExerciseRecord {
    /// Target taken from the first set; a missing set count means one
    pub fn target(&self) -> Option<PlanTarget> {
        self.series.first().map(|first| PlanTarget {
            weight: first.weight,
            reps: first.reps,
            sets: first.sets.unwrap_or(1),
        })
    }
}

/// A stored workout
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct PlanRecord {
    pub id: Uuid,
    pub week: u32,
    pub workout_number: u32,
    pub kind: PlanKind,
    #[serde(default)]
    pub notes: Option<String>,
    pub exercises: Vec<PlanExerciseRecord>,
}

impl PlanRecord {
    pub fn from_parsed(plan: &ParsedPlan) -> Self {
        Self {
            id: Uuid::new_v4(),
            week: plan.week,
            workout_number: plan.workout_number,
            kind: plan.kind,
            notes: plan.notes.clone(),
            exercises: plan
                .exercises
                .iter()
                .zip(0u32..)
                .map(|(exercise, order_index)| PlanExerciseRecord {
                    lift: exercise.lift,
                    order_index,
                    series: exercise.series.clone(),
                })
                .collect(),
        }
    }
}

/// Weight table for one lift
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct LiftTable {
    pub lift: Lift,
    pub one_rep_max: f64,
    pub rows: Vec<PercentRow>,
}

/// A stored athlete
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct AthleteRecord {
    pub id: Uuid,
    pub name: String,
    pub squat_pm: Option<f64>,
    pub bench_pm: Option<f64>,
    pub deadlift_pm: Option<f64>,
    pub pm_date: Option<NaiveDate>,
    #[serde(default)]
    pub pm_history: Vec<PmHistoryEntry>,
    #[serde(default)]
    pub rounding_step: RoundingStep,
    #[serde(default)]
    pub plans: Vec<PlanRecord>,
}

/// Treat a zero PM as "not recorded"
fn recorded(pm: Option<f64>) -> Option<f64> {
    pm.filter(|value| *value != 0.0)
}

impl AthleteRecord {
    /// New athlete from a scanned document
    ///
    /// A PM history entry is only created when the document has both a PM
    /// date and at least one PM.
    pub fn from_import(data: &ImportedAthleteData, rounding_step: RoundingStep) -> Self {
        let mut pm_history = Vec::new();
        if let Some(date) = data.pm_date {
            if data.has_any_pm() {
                pm_history.push(PmHistoryEntry {
                    date,
                    squat: recorded(data.squat_pm),
                    bench: recorded(data.bench_pm),
                    deadlift: recorded(data.deadlift_pm),
                });
            }
        }

        Self {
            id: Uuid::new_v4(),
            name: data.athlete_name.clone(),
            squat_pm: data.squat_pm,
            bench_pm: data.bench_pm,
            deadlift_pm: data.deadlift_pm,
            pm_date: data.pm_date,
            pm_history,
            rounding_step,
            plans: data.plans.iter().map(PlanRecord::from_parsed).collect(),
        }
    }

    /// Merge a re-imported document into this athlete
    ///
    /// PMs present in the document replace the stored ones, the others are
    /// kept. The history entry is dated with the document's PM date, or
    /// `today` when it has none. Imported plans are appended.
    pub fn apply_import(&mut self, data: &ImportedAthleteData, today: NaiveDate) {
        if data.has_any_pm() {
            let squat = recorded(data.squat_pm).or(self.squat_pm);
            let bench = recorded(data.bench_pm).or(self.bench_pm);
            let deadlift = recorded(data.deadlift_pm).or(self.deadlift_pm);

            self.pm_history.push(PmHistoryEntry {
                date: data.pm_date.unwrap_or(today),
                squat,
                bench,
                deadlift,
            });
            self.squat_pm = squat;
            self.bench_pm = bench;
            self.deadlift_pm = deadlift;
            self.pm_date = data.pm_date.or(self.pm_date);

            tracing::info!("Updated PMs for {}", self.name);
        }

        self.plans
            .extend(data.plans.iter().map(PlanRecord::from_parsed));
    }

    pub fn pm(&self, lift: Lift) -> Option<f64> {
        match lift {
            Lift::Squat => self.squat_pm,
            Lift::Bench => self.bench_pm,
            Lift::Deadlift => self.deadlift_pm,
        }
    }

    /// One weight table per lift with a positive PM
    pub fn weight_tables(&self, percents: &[f64]) -> Vec<LiftTable> {
        Lift::ALL
            .into_iter()
            .filter_map(|lift| {
                let one_rep_max = self.pm(lift).filter(|pm| *pm > 0.0)?;
                Some(LiftTable {
                    lift,
                    one_rep_max,
                    rows: generate_weight_table(one_rep_max, percents, self.rounding_step),
                })
            })
            .collect()
    }

    /// Plans ordered by week, then workout number
    pub fn sorted_plans(&self) -> Vec<&PlanRecord> {
        let mut plans: Vec<&PlanRecord> = self.plans.iter().collect();
        plans.sort_by_key(|plan| (plan.week, plan.workout_number));
        plans
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::weights::STANDARD_PERCENTS;
    use crate::ParsedExercise;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn imported() -> ImportedAthleteData {
        ImportedAthleteData {
            athlete_name: "ИВАН".into(),
            pm_date: Some(date(2024, 1, 1)),
            squat_pm: Some(100.0),
            bench_pm: None,
            deadlift_pm: Some(0.0),
            plans: vec![ParsedPlan {
                week: 1,
                workout_number: 1,
                kind: PlanKind::Regular,
                exercises: vec![
                    ParsedExercise {
                        lift: Lift::Squat,
                        series: vec![SeriesSet::new(50.0, 6), SeriesSet::with_sets(60.0, 5, 3)],
                    },
                    ParsedExercise {
                        lift: Lift::Bench,
                        series: vec![SeriesSet::with_sets(40.0, 8, 4)],
                    },
                ],
                notes: None,
            }],
        }
    }

    #[test]
    fn test_new_athlete_from_import() {
        let athlete = AthleteRecord::from_import(&imported(), RoundingStep::default());
        assert_eq!(athlete.name, "ИВАН");
        assert_eq!(athlete.plans.len(), 1);
        assert_eq!(
            athlete.pm_history,
            vec![PmHistoryEntry {
                date: date(2024, 1, 1),
                squat: Some(100.0),
                bench: None,
                deadlift: None,
            }]
        );

        let exercises = &athlete.plans[0].exercises;
        assert_eq!(exercises[0].order_index, 0);
        assert_eq!(exercises[1].order_index, 1);
        assert_eq!(
            exercises[0].target(),
            Some(PlanTarget {
                weight: 50.0,
                reps: 6,
                sets: 1,
            })
        );
        assert_eq!(exercises[1].target().map(|t| t.sets), Some(4));
    }

    #[test]
    fn test_no_history_without_pm_date() {
        let mut data = imported();
        data.pm_date = None;
        let athlete = AthleteRecord::from_import(&data, RoundingStep::default());
        assert!(athlete.pm_history.is_empty());
    }

    #[test]
    fn test_reimport_merges_pms() {
        let mut athlete = AthleteRecord::from_import(&imported(), RoundingStep::default());
        athlete.bench_pm = Some(70.0);

        let update = ImportedAthleteData {
            athlete_name: "ИВАН".into(),
            pm_date: None,
            squat_pm: Some(110.0),
            bench_pm: None,
            deadlift_pm: Some(150.0),
            plans: vec![],
        };
        athlete.apply_import(&update, date(2024, 2, 1));

        assert_eq!(athlete.squat_pm, Some(110.0));
        assert_eq!(athlete.bench_pm, Some(70.0));
        assert_eq!(athlete.deadlift_pm, Some(150.0));
        assert_eq!(athlete.pm_date, Some(date(2024, 1, 1)));
        assert_eq!(athlete.pm_history.len(), 2);

        let last = athlete.pm_history.last().unwrap();
        assert_eq!(last.date, date(2024, 2, 1));
        assert_eq!(last.bench, Some(70.0));
    }

    #[test]
    fn test_reimport_without_pms_only_appends_plans() {
        let mut athlete = AthleteRecord::from_import(&imported(), RoundingStep::default());
        let mut update = imported();
        update.squat_pm = None;
        update.deadlift_pm = None;

        athlete.apply_import(&update, date(2024, 2, 1));
        assert_eq!(athlete.pm_history.len(), 1);
        assert_eq!(athlete.plans.len(), 2);
    }

    #[test]
    fn test_weight_tables_skip_missing_pms() {
        let athlete = AthleteRecord::from_import(&imported(), RoundingStep::default());
        let tables = athlete.weight_tables(&STANDARD_PERCENTS);
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].lift, Lift::Squat);
        assert_eq!(tables[0].rows.len(), STANDARD_PERCENTS.len());
    }

    #[test]
    fn test_sorted_plans() {
        let mut athlete = AthleteRecord::from_import(&imported(), RoundingStep::default());
        let mut later = athlete.plans[0].clone();
        later.week = 2;
        let mut second = athlete.plans[0].clone();
        second.workout_number = 2;
        athlete.plans = vec![later, second, athlete.plans[0].clone()];

        let order: Vec<(u32, u32)> = athlete
            .sorted_plans()
            .iter()
            .map(|p| (p.week, p.workout_number))
            .collect();
        assert_eq!(order, vec![(1, 1), (1, 2), (2, 1)]);
    }
}
