//! Error types for the barbell_core library.

use std::io;
use std::path::PathBuf;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for barbell_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Rounding step must be a positive, finite number of kilograms
    #[error("Invalid rounding step {0}: must be greater than zero")]
    InvalidRoundingStep(f64),

    /// Imported plan text has no athlete name line
    #[error("Athlete name not found in plan text")]
    AthleteNameMissing,

    /// A vocabulary token produced a grammar that failed to compile
    #[error("Grammar error: {0}")]
    Grammar(#[from] regex::Error),

    /// The athlete book exists but is not valid JSON
    #[error("Athlete book {path:?} is corrupted, fix or move it aside: {source}")]
    CorruptedBook {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// No athlete with this name in the athlete book
    #[error("Athlete not found: {0}")]
    AthleteNotFound(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}
