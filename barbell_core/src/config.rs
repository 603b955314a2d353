//! Configuration file support for Barbell.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/barbell/config.toml`.

use crate::weights::{RoundingStep, STANDARD_PERCENTS};
use crate::{Error, Result, Vocabulary};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub weights: WeightsConfig,

    #[serde(default)]
    pub vocabulary: Vocabulary,
}

/// Data storage configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

/// Weight table configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WeightsConfig {
    /// Rounding step for new athletes and ad-hoc tables
    #[serde(default)]
    pub rounding_step: RoundingStep,

    #[serde(default = "default_percents")]
    pub percents: Vec<f64>,
}

impl Default for WeightsConfig {
    fn default() -> Self {
        Self {
            rounding_step: RoundingStep::default(),
            percents: default_percents(),
        }
    }
}

// Default value functions
fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| home_dir().join(".local/share"))
        .join("barbell")
}

fn default_percents() -> Vec<f64> {
    STANDARD_PERCENTS.to_vec()
}

fn home_dir() -> PathBuf {
    dirs::home_dir().unwrap_or_else(|| PathBuf::from("."))
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::info!(
                "No config file found at {:?}, using defaults",
                config_path
            );
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| home_dir().join(".config"))
            .join("barbell")
            .join("config.toml")
    }

    /// Check settings that serde cannot
    pub fn validate(&self) -> Result<()> {
        if let Some(bad) = self.weights.percents.iter().find(|p| !p.is_finite()) {
            return Err(Error::Config(format!("Percent {} is not a number", bad)));
        }

        let errors = self.vocabulary.validate();
        if !errors.is_empty() {
            return Err(Error::Config(errors.join("; ")));
        }

        Ok(())
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }
}
