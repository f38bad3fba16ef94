//! Configuration system for sift.
//!
//! sift uses TOML configuration files named `.sift.toml`. Configuration is resolved by
//! walking up the directory tree from the current working directory, collecting any
//! `.sift.toml` files found, then loading `~/.sift.toml` as the global config with lowest
//! precedence.
//!
//! Besides general settings, configuration defines additional query keys: each
//! `[keys.<name>]` table describes the filter a `<name>:<value>` term compiles to.

#![warn(missing_docs)]

mod discovery;
mod error;
mod keys;
mod merge;
mod parse;
mod templates;
#[cfg(test)]
mod test_support;
mod validate;

use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

pub use discovery::{CONFIG_FILENAME, discover_config_files, global_config_path, is_global_config};
pub use error::ConfigError;
pub use keys::{BoundSide, KeyDefinition, RuleKind, ValueFormat};
pub use merge::{ParsedConfig, merge_configs};
pub use parse::{RawConfig, RawKey, RawSettings, parse_config_file, parse_config_str};
use serde::{Deserialize, Serialize};
use sift_query::DEFAULT_MAX_DEPTH;
pub use templates::{global_template, local_template};
pub use validate::ConfigWarning;
use validate::validate_config;

/// Top-level merged configuration for sift.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// General settings.
    pub settings: Settings,
    /// Configured keys by name, in addition to (or overriding) the built-in keys.
    pub keys: BTreeMap<String, KeyDefinition>,
    /// Directory containing the most specific config file.
    pub config_root: Option<PathBuf>,
    /// Config files that contributed, highest precedence first.
    pub files: Vec<PathBuf>,
}

impl Config {
    /// Loads configuration by discovering and merging all relevant `.sift.toml` files.
    ///
    /// Returns `Ok(Config::default())` if no configuration files are found.
    pub fn load(cwd: &Path) -> Result<Self, ConfigError> {
        let config_files = discover_config_files(cwd);
        Self::load_from_files(&config_files)
    }

    /// Loads configuration from a specific list of config file paths.
    ///
    /// Files should be provided in precedence order: highest precedence first.
    pub fn load_from_files(files: &[PathBuf]) -> Result<Self, ConfigError> {
        if files.is_empty() {
            return Ok(Self::default());
        }

        let parsed: Vec<ParsedConfig> = files
            .iter()
            .map(|path| {
                let config = parse_config_file(path)?;
                Ok(ParsedConfig {
                    path: path.clone(),
                    config,
                })
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;

        merge_configs(&parsed)
    }

    /// Validates the configuration and returns any warnings.
    pub fn validate(&self) -> Vec<ConfigWarning> {
        validate_config(self)
    }

    /// Serializes the effective settings and keys to TOML format.
    ///
    /// The output has the same shape as a `.sift.toml` file.
    pub fn settings_to_toml(&self) -> Result<String, ConfigError> {
        let serializable = SerializableConfig {
            settings: &self.settings,
            keys: &self.keys,
        };
        Ok(toml::to_string_pretty(&serializable)?)
    }
}

/// General settings for sift.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    /// Maximum parenthesis nesting accepted in a query, between 1 and
    /// [`MAX_DEPTH_LIMIT`](sift_query::MAX_DEPTH_LIMIT).
    pub max_depth: usize,
    /// Whether the built-in `since`/`until` keys are available.
    pub builtin_keys: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            builtin_keys: true,
        }
    }
}

/// Serializable view of the effective configuration.
#[derive(Serialize)]
struct SerializableConfig<'a> {
    /// General settings.
    settings: &'a Settings,
    /// Key definitions.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    keys: &'a BTreeMap<String, KeyDefinition>,
}
