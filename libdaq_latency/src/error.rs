use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LineError {
    #[error("Log line is missing expected field label '{0}'")]
    MissingLabel(String),
    #[error("Log line has bad value '{value}' following field label '{label}'")]
    BadValue { label: String, value: String },
}

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("Could not open log file because file {0:?} does not exist")]
    BadFilePath(PathBuf),
    #[error("Log scan failed due to IO error: {0}")]
    IOError(#[from] std::io::Error),
    #[error("Log scan failed on malformed line {line}: {source}")]
    MalformedLine {
        line: usize,
        #[source]
        source: LineError,
    },
}

#[derive(Debug, Error)]
pub enum PlotError {
    #[error("Plot directory {0:?} does not exist")]
    MissingDirectory(PathBuf),
    #[error("PlotWriter failed due to IO error: {0}")]
    IOError(#[from] std::io::Error),
    #[error("PlotWriter failed to encode image: {0}")]
    ImageError(#[from] image::ImageError),
    #[error("PlotWriter failed to convert to yaml: {0}")]
    ParsingError(#[from] serde_yaml::Error),
}

#[derive(Debug, Error)]
pub enum TpDisplayError {
    #[error("Could not open TP dump because file {0:?} does not exist")]
    BadFilePath(PathBuf),
    #[error("TP dump read failed due to IO error: {0}")]
    IOError(#[from] std::io::Error),
    #[error("TP dump failed to parse a number: {0}")]
    ParsingError(#[from] std::num::ParseFloatError),
    #[error("TP dump row {0} has too few columns")]
    BadFileFormat(usize),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration as file {0:?} does not exist")]
    BadFilePath(PathBuf),
    #[error("Config failed due to IO error: {0}")]
    IOError(#[from] std::io::Error),
    #[error("Config failed to parse YAML: {0}")]
    ParsingError(#[from] serde_yaml::Error),
}

#[derive(Debug, Error)]
pub enum ProcessorError {
    #[error("Processor failed due to log scan error: {0}")]
    ScanError(#[from] ScanError),
    #[error("Processor failed due to plot error: {0}")]
    PlotError(#[from] PlotError),
    #[error("Processor failed due to TP display error: {0}")]
    TpDisplayError(#[from] TpDisplayError),
    #[error("Processor failed due to Config error: {0}")]
    ConfigError(#[from] ConfigError),
}
