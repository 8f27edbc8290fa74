use serde::Deserialize;
use std::{
    env, fs,
    path::{Path, PathBuf},
};
use tracing::debug;

use crate::error::{PipelineError, Result};

pub const DEFAULT_SOURCE_URL: &str =
    "https://data.montpellier3m.fr/sites/default/files/ressources/MMM_MMM_DAE.csv";

/// Runtime settings for a pipeline run.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub source_url: String,
    /// Cache directory for the downloaded CSV.
    pub data_dir: PathBuf,
    /// Where the clean CSV and Parquet files go.
    pub output_dir: PathBuf,
    pub force_download: bool,
    pub sanitize: SanitizeConfig,
}

/// Knobs of the cleaning rules.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct SanitizeConfig {
    /// Digit count of a national phone number (`0612345678`).
    pub phone_digits: usize,
    /// Label replacing floor `0`.
    pub ground_floor_label: String,
    /// Shorthand for an availability listing every weekday.
    pub all_days_label: String,
    /// Last-maintenance values whose rows are dropped.
    pub maintenance_sentinels: Vec<String>,
    /// Reproduce the historical export where longitude was a copy of latitude.
    pub longitude_from_latitude: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source_url: DEFAULT_SOURCE_URL.to_string(),
            data_dir: PathBuf::from("data"),
            output_dir: PathBuf::from("output"),
            force_download: false,
            sanitize: SanitizeConfig::default(),
        }
    }
}

impl Default for SanitizeConfig {
    fn default() -> Self {
        Self {
            phone_digits: 10,
            ground_floor_label: "RDC".to_string(),
            all_days_label: "7j/7".to_string(),
            maintenance_sentinels: vec!["tous les ans".to_string(), "every year".to_string()],
            longitude_from_latitude: false,
        }
    }
}

impl Config {
    /// Load settings from an optional YAML file, then apply `DAE_*` environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(p) => {
                let content = fs::read_to_string(p).map_err(|e| {
                    PipelineError::Config(format!("reading {}: {}", p.display(), e))
                })?;
                Self::from_yaml(&content)?
            }
            None => Self::default(),
        };
        config.apply_env(|key| env::var(key).ok())?;
        debug!(?config, "configuration loaded");
        Ok(config)
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).map_err(|e| PipelineError::Config(e.to_string()))
    }

    fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(url) = lookup("DAE_SOURCE_URL") {
            self.source_url = url;
        }
        if let Some(dir) = lookup("DAE_DATA_DIR") {
            self.data_dir = PathBuf::from(dir);
        }
        if let Some(dir) = lookup("DAE_OUTPUT_DIR") {
            self.output_dir = PathBuf::from(dir);
        }
        if let Some(flag) = lookup("DAE_FORCE_DOWNLOAD") {
            self.force_download = match flag.trim().to_lowercase().as_str() {
                "1" | "true" | "yes" => true,
                "0" | "false" | "no" | "" => false,
                other => {
                    return Err(PipelineError::Config(format!(
                        "DAE_FORCE_DOWNLOAD: expected a boolean, got {:?}",
                        other
                    )))
                }
            };
        }
        Ok(())
    }
}
