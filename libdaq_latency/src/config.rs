use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::constants::*;
use super::error::ConfigError;

/// The measurement to make from the input file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Analysis {
    /// TP insertion -> TD send-out from the MLT
    #[default]
    TpToTd,
    /// TA buffer insertion -> data request, plus TA clock drift and tardy TPSets
    TaToDr,
    /// Channel vs. time display of a TP dump
    TpDisplay,
}

/// Structure representing the application configuration. Contains pathing and plotting information
/// Configs are seralizable and deserializable to YAML using serde and serde_yaml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub log_path: PathBuf,
    pub plot_path: PathBuf,
    pub analysis: Analysis,
    pub histogram_bins: usize,
    pub tardy_bins: usize,
    pub tardy_skip: usize,
    pub tp_display_rows: usize,
}

impl Default for Config {
    /// Generate a new Config object. The log path will be empty/invalid
    fn default() -> Self {
        Self {
            log_path: PathBuf::from("None"),
            plot_path: PathBuf::from(DEFAULT_PLOT_DIRECTORY),
            analysis: Analysis::default(),
            histogram_bins: DEFAULT_HISTOGRAM_BINS,
            tardy_bins: DEFAULT_TARDY_BINS,
            tardy_skip: DEFAULT_TARDY_SKIP,
            tp_display_rows: DEFAULT_TP_DISPLAY_ROWS,
        }
    }
}

impl Config {
    /// Make a config for a single input file, using defaults for everything else
    pub fn new(log_path: &Path, plot_path: Option<&Path>, analysis: Analysis) -> Self {
        let mut config = Self {
            log_path: log_path.to_path_buf(),
            analysis,
            ..Default::default()
        };
        if let Some(path) = plot_path {
            config.plot_path = path.to_path_buf();
        }
        config
    }

    /// Read the configuration in a YAML file
    /// Returns a Config if successful
    pub fn read_config_file(config_path: &Path) -> Result<Self, ConfigError> {
        if !config_path.exists() {
            return Err(ConfigError::BadFilePath(config_path.to_path_buf()));
        }

        let yaml_str = std::fs::read_to_string(config_path)?;

        Ok(serde_yaml::from_str::<Self>(&yaml_str)?)
    }

    /// Write the configuration to a YAML file
    pub fn write_config_file(&self, config_path: &Path) -> Result<(), ConfigError> {
        let yaml_str = serde_yaml::to_string(self)?;
        std::fs::write(config_path, yaml_str)?;
        Ok(())
    }
}
