//! Error types for configuration loading.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading or validating configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config file could not be read.
    #[error("failed to read config file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid YAML for the expected shape.
    #[error("failed to parse config YAML: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// Parsed values violate a configuration invariant.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}
