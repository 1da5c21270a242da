use std::path::PathBuf;

use fontsmith_core::AtlasError;
use thiserror::Error;

/// Errors reported by the command line tool.
#[derive(Error, Debug)]
pub enum CliError {
    /// The configuration file could not be read.
    #[error("failed to read config {path}")]
    ReadConfig {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML for generation parameters.
    #[error("invalid config {path}")]
    ParseConfig {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// No output path was given and none can be derived from the font path.
    #[error("cannot derive an output name from {0}, pass --output")]
    NoOutputName(PathBuf),

    #[error(transparent)]
    Atlas(#[from] AtlasError),
}

pub type CliResult<T> = Result<T, CliError>;
