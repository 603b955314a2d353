#![forbid(unsafe_code)]

//! Core domain model and logic for Barbell, a strength coach's plan toolkit.
//!
//! This crate provides:
//! - Domain types (lifts, series sets, scanned plans)
//! - Series notation codec (decorated and spreadsheet-paste notations)
//! - Percentage-of-max weight tables
//! - Plan document scanning (import) and paragraph assembly (export)
//! - Athlete records and the file-backed athlete book

pub mod types;
pub mod error;
pub mod vocabulary;
pub mod config;
pub mod logging;
pub mod weights;
pub mod series;
pub mod scanner;
pub mod import;
pub mod export;
pub mod records;
pub mod book;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use vocabulary::Vocabulary;
pub use config::Config;
pub use weights::{generate_weight_table, round_weight, RoundingStep, STANDARD_PERCENTS};
pub use series::{format_series, validate_series, ParsedSeries, SeriesCodec};
pub use scanner::{PlanScanner, ScanReport, ScanWarning};
pub use import::import_plan_text;
pub use export::{build_paragraphs, render_text, ExportDocument, Paragraph};
pub use records::AthleteRecord;
pub use book::AthleteBook;
