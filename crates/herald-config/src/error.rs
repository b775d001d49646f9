use std::path::PathBuf;

use thiserror::Error;

/// Errors from configuration loading
#[derive(Error, Debug)]
pub enum ConfigError {
    /// An explicitly requested config file does not exist
    #[error("config file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// IO error reading the config file
    #[error("failed to read config file {}: {source}", .path.display())]
    Io {
        /// File that failed to read
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// TOML parse error
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    /// The changed-files list is not a JSON array of paths
    #[error("changed files must be a JSON array of paths: {0}")]
    ChangedFiles(#[from] serde_json::Error),

    /// A value could not be interpreted
    #[error("invalid value for {key}: {reason}")]
    InvalidValue {
        /// Option name
        key: String,
        /// What was wrong with it
        reason: String,
    },

    /// A required credential is not configured
    #[error("missing credential: {0}")]
    MissingCredential(&'static str),
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;
