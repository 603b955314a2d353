//! Core domain types for the Barbell system.
//!
//! This module defines the value types shared between the components:
//! - Lifts and plan kinds
//! - Series sets (weight × reps × sets)
//! - Weight table rows
//! - Scanned plan structures produced by the import pipeline

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ============================================================================
// Lift Types
// ============================================================================

/// One of the three competition lifts a plan document can prescribe
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Lift {
    Squat,
    Bench,
    Deadlift,
}

impl Lift {
    /// All lifts in document order
    pub const ALL: [Lift; 3] = [Lift::Squat, Lift::Bench, Lift::Deadlift];
}

/// Kind of scheduled workout
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum PlanKind {
    #[default]
    Regular,
    /// Max-attempt test session
    Test,
}

// ============================================================================
// Series Types
// ============================================================================

/// One planned or logged group of repetitions at a given load
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SeriesSet {
    pub weight: f64,
    pub reps: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sets: Option<i32>,
}

impl SeriesSet {
    pub fn new(weight: f64, reps: i32) -> Self {
        Self {
            weight,
            reps,
            sets: None,
        }
    }

    pub fn with_sets(weight: f64, reps: i32, sets: i32) -> Self {
        Self {
            weight,
            reps,
            sets: Some(sets),
        }
    }
}

/// A row of a percentage-of-max weight table
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct PercentRow {
    pub percent: f64,
    pub weight: f64,
}

// ============================================================================
// Scanned Plan Types
// ============================================================================

/// An exercise line read from a plan document
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ParsedExercise {
    pub lift: Lift,
    pub series: Vec<SeriesSet>,
}

/// One workout read from a plan document
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ParsedPlan {
    pub week: u32,
    pub workout_number: u32,
    pub kind: PlanKind,
    pub exercises: Vec<ParsedExercise>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl ParsedPlan {
    pub fn is_test(&self) -> bool {
        self.kind == PlanKind::Test
    }
}

/// Everything recovered from one plan document
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Default)]
pub struct ImportedAthleteData {
    pub athlete_name: String,
    pub pm_date: Option<NaiveDate>,
    pub squat_pm: Option<f64>,
    pub bench_pm: Option<f64>,
    pub deadlift_pm: Option<f64>,
    pub plans: Vec<ParsedPlan>,
}

impl ImportedAthleteData {
    /// PM recorded for a lift, if any
    pub fn pm(&self, lift: Lift) -> Option<f64> {
        match lift {
            Lift::Squat => self.squat_pm,
            Lift::Bench => self.bench_pm,
            Lift::Deadlift => self.deadlift_pm,
        }
    }

    /// True if at least one lift has a non-zero PM
    pub fn has_any_pm(&self) -> bool {
        Lift::ALL
            .iter()
            .any(|lift| self.pm(*lift).is_some_and(|pm| pm != 0.0))
    }
}
