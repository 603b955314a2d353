//! Percentage-of-max weight tables.
//!
//! Training weights are computed as a percentage of a one-rep max and then
//! snapped to the nearest multiple of a rounding step (plates available in
//! the gym: 0.5, 1 or 2.5 kg). Tables are computed on demand and never stored.

use crate::{Error, PercentRow, Result};
use serde::{Deserialize, Serialize};
use std::io::Write;

/// Percentages of the one-rep max used by the standard coaching table
pub const STANDARD_PERCENTS: [f64; 14] = [
    0.30, 0.36, 0.42, 0.48, 0.54, 0.60, 0.66, 0.72, 0.78, 0.84, 0.90, 0.96, 1.00, 1.05,
];

/// Default rounding step in kilograms
pub const DEFAULT_ROUNDING_STEP: f64 = 2.5;

/// A validated rounding step (finite and strictly positive)
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct RoundingStep(f64);

impl RoundingStep {
    pub fn new(step: f64) -> Result<Self> {
        if step.is_finite() && step > 0.0 {
            Ok(Self(step))
        } else {
            Err(Error::InvalidRoundingStep(step))
        }
    }

    pub fn get(self) -> f64 {
        self.0
    }
}

impl Default for RoundingStep {
    fn default() -> Self {
        Self(DEFAULT_ROUNDING_STEP)
    }
}

impl TryFrom<f64> for RoundingStep {
    type Error = Error;

    fn try_from(step: f64) -> Result<Self> {
        Self::new(step)
    }
}

impl From<RoundingStep> for f64 {
    fn from(step: RoundingStep) -> f64 {
        step.0
    }
}

impl std::fmt::Display for RoundingStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Round a weight to the nearest multiple of `step`
///
/// Halves round away from zero.
pub fn round_weight(weight: f64, step: RoundingStep) -> f64 {
    (weight / step.0).round() * step.0
}

/// Weight for a percentage of the one-rep max, rounded to `step`
///
/// `percent` is not range-checked: values above 1.05 or below zero simply
/// produce weights outside the usual training range.
pub fn calculate_weight(one_rep_max: f64, percent: f64, step: RoundingStep) -> f64 {
    round_weight(one_rep_max * percent, step)
}

/// Build a weight table, one row per percentage, in input order
pub fn generate_weight_table(
    one_rep_max: f64,
    percents: &[f64],
    step: RoundingStep,
) -> Vec<PercentRow> {
    percents
        .iter()
        .map(|&percent| PercentRow {
            percent,
            weight: calculate_weight(one_rep_max, percent, step),
        })
        .collect()
}

/// Write a weight table as CSV (`percent,weight` header)
pub fn write_table_csv<W: Write>(rows: &[PercentRow], writer: W) -> Result<()> {
    let mut writer = csv::WriterBuilder::new().has_headers(true).from_writer(writer);
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}
