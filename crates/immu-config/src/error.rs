//! Configuration error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading server options.
///
/// The environment overlay itself never fails; only the file-backed layers of
/// [`OptionsLoader`](crate::OptionsLoader) produce these.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Dotenv file not found.
    #[error("dotenv file not found: {path}")]
    FileNotFound {
        /// Path to the missing file.
        path: PathBuf,
    },

    /// Dotenv file could not be read or parsed.
    #[error("failed to load dotenv file {path}: {source}")]
    Dotenv {
        /// Path to the file.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: dotenvy::Error,
    },
}

impl ConfigError {
    /// Create a new file not found error.
    pub fn file_not_found(path: impl Into<PathBuf>) -> Self {
        Self::FileNotFound { path: path.into() }
    }

    /// Create a new dotenv error.
    pub fn dotenv(path: impl Into<PathBuf>, source: dotenvy::Error) -> Self {
        Self::Dotenv {
            path: path.into(),
            source,
        }
    }
}

/// Result type for option loading.
pub type ConfigResult<T> = Result<T, ConfigError>;
