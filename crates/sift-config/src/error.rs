//! Error types for sift configuration.

use std::{io, path::PathBuf};

use thiserror::Error;
use toml::{de, ser};

/// Errors that can occur when loading or processing configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read a configuration file.
    #[error("failed to read config file {path}: {source}")]
    ReadFile {
        /// Path to the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Failed to parse TOML configuration.
    #[error("failed to parse config file {path}: {source}")]
    ParseToml {
        /// Path to the file that could not be parsed.
        path: PathBuf,
        /// Underlying TOML parse error.
        source: de::Error,
    },

    /// A key definition cannot be turned into a filter rule.
    #[error("invalid definition for key '{key}' in {path}: {message}")]
    InvalidKey {
        /// Config file containing the definition.
        path: PathBuf,
        /// The key being defined.
        key: String,
        /// What is wrong with it.
        message: String,
    },

    /// A `[settings]` value is out of range.
    #[error("invalid setting '{setting}' in {path}: {message}")]
    InvalidSetting {
        /// Config file containing the setting.
        path: PathBuf,
        /// Name of the setting.
        setting: &'static str,
        /// What is wrong with it.
        message: String,
    },

    /// Failed to serialize settings back to TOML.
    #[error("failed to serialize settings: {0}")]
    Serialize(#[from] ser::Error),
}
