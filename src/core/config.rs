//! Runtime configuration loaded from `gurume.toml`.
//!
//! A missing file is not an error; every section falls back to its defaults.
//! Values are checked once in [`GurumeConfig::validate`] so the pipeline
//! never sees an out-of-range threshold.

use crate::core::db::DEFAULT_BUSY_TIMEOUT_SECS;
use crate::core::error::GurumeError;
use crate::core::schemas;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "gurume.toml";

/// Names whose similarity ratio is strictly above this are the same establishment.
pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.8;
pub const DEFAULT_RATING_BINS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MergeStrategy {
    /// Group records by name similarity and merge every group field by field.
    #[default]
    Cluster,
    /// Drop similar names first, then merge records sharing an exact name.
    Legacy,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DedupConfig {
    pub threshold: f64,
    pub strategy: MergeStrategy,
}

impl Default for DedupConfig {
    fn default() -> Self {
        DedupConfig {
            threshold: DEFAULT_SIMILARITY_THRESHOLD,
            strategy: MergeStrategy::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub path: PathBuf,
    pub busy_timeout_secs: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig {
            path: PathBuf::from(schemas::RESTAURANTS_DB_NAME),
            busy_timeout_secs: DEFAULT_BUSY_TIMEOUT_SECS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub rating_bins: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        ReportConfig {
            rating_bins: DEFAULT_RATING_BINS,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GurumeConfig {
    pub dedup: DedupConfig,
    pub store: StoreConfig,
    pub report: ReportConfig,
}

impl GurumeConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, GurumeError> {
        let config: GurumeConfig =
            toml::from_str(content).map_err(|e| GurumeError::ConfigError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load config from an explicit path, or from `gurume.toml` in `dir` if present.
    pub fn load(explicit: Option<&Path>, dir: &Path) -> Result<Self, GurumeError> {
        let config_path = match explicit {
            Some(path) if !path.exists() => {
                return Err(GurumeError::NotFound(format!(
                    "config file {}",
                    path.display()
                )));
            }
            Some(path) => path.to_path_buf(),
            None => dir.join(CONFIG_FILE_NAME),
        };

        if !config_path.exists() {
            return Ok(GurumeConfig::default());
        }

        let content = fs::read_to_string(&config_path).map_err(GurumeError::IoError)?;
        tracing::debug!(path = %config_path.display(), "loaded config");
        Self::from_toml_str(&content)
    }

    pub fn validate(&self) -> Result<(), GurumeError> {
        validate_threshold(self.dedup.threshold)?;
        if self.report.rating_bins == 0 {
            return Err(GurumeError::ConfigError(
                "report.rating_bins must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

pub fn validate_threshold(threshold: f64) -> Result<f64, GurumeError> {
    if !(0.0..=1.0).contains(&threshold) {
        return Err(GurumeError::SimilarityConfigError(threshold));
    }
    Ok(threshold)
}
