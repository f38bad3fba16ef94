//! Configuration merging.
//!
//! Merges multiple `RawConfig` files into a single resolved `Config`, applying precedence
//! rules and filling in key-definition defaults.

use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use sift_query::MAX_DEPTH_LIMIT;

use crate::{
    Config, ConfigError, Settings,
    keys::{KeyDefinition, RuleKind, ValueFormat},
    parse::{RawConfig, RawKey, RawSettings},
};

/// A parsed config file with its source path.
pub struct ParsedConfig {
    /// Path to the config file.
    pub path: PathBuf,
    /// Parsed raw configuration.
    pub config: RawConfig,
}

/// Merges multiple configuration files into a single resolved `Config`.
///
/// Configs should be provided in precedence order: highest precedence first (closest to CWD),
/// lowest precedence last (global config).
///
/// Merge rules:
/// - Scalar settings: first defined value wins (highest precedence)
/// - Keys: merged by name, first definition wins completely
pub fn merge_configs(configs: &[ParsedConfig]) -> Result<Config, ConfigError> {
    if configs.is_empty() {
        return Ok(Config::default());
    }

    let settings = merge_settings(configs)?;
    let keys = merge_keys(configs)?;
    let config_root = configs
        .first()
        .and_then(|c| c.path.parent())
        .map(|p| p.to_path_buf());
    let files = configs.iter().map(|c| c.path.clone()).collect();

    Ok(Config {
        settings,
        keys,
        config_root,
        files,
    })
}

/// Merges general settings, taking first defined value for each field.
fn merge_settings(configs: &[ParsedConfig]) -> Result<Settings, ConfigError> {
    let mut result = Settings::default();

    // Lowest precedence first so higher precedence overwrites
    for parsed in configs.iter().rev() {
        if let Some(ref settings) = parsed.config.settings {
            apply_raw_settings(&mut result, settings, &parsed.path)?;
        }
    }

    Ok(result)
}

/// Applies raw settings to result, overwriting any present values.
fn apply_raw_settings(
    result: &mut Settings,
    raw: &RawSettings,
    path: &Path,
) -> Result<(), ConfigError> {
    if let Some(v) = raw.max_depth {
        if !(1..=MAX_DEPTH_LIMIT).contains(&v) {
            return Err(ConfigError::InvalidSetting {
                path: path.to_path_buf(),
                setting: "max_depth",
                message: format!("must be between 1 and {MAX_DEPTH_LIMIT}, got {v}"),
            });
        }
        result.max_depth = v;
    }
    if let Some(v) = raw.builtin_keys {
        result.builtin_keys = v;
    }
    Ok(())
}

/// Merges key definitions by name; the highest-precedence definition wins.
fn merge_keys(configs: &[ParsedConfig]) -> Result<BTreeMap<String, KeyDefinition>, ConfigError> {
    let mut result = BTreeMap::new();

    for parsed in configs {
        let Some(ref keys) = parsed.config.keys else {
            continue;
        };
        for (name, raw) in keys {
            if result.contains_key(name) {
                continue;
            }
            let definition = resolve_key(name, raw, &parsed.path)?;
            result.insert(name.clone(), definition);
        }
    }

    Ok(result)
}

/// Resolves a raw key definition, applying defaults.
fn resolve_key(name: &str, raw: &RawKey, path: &Path) -> Result<KeyDefinition, ConfigError> {
    if raw.rule == RuleKind::Range && raw.bound.is_none() {
        return Err(ConfigError::InvalidKey {
            path: path.to_path_buf(),
            key: name.to_string(),
            message: "range rules need `bound = \"lower\"` or `bound = \"upper\"`".into(),
        });
    }

    let default_format = match raw.rule {
        RuleKind::Range => ValueFormat::Date,
        RuleKind::Term => ValueFormat::Keyword,
    };

    Ok(KeyDefinition {
        rule: raw.rule,
        field: raw.field.clone(),
        bound: raw.bound,
        inclusive: raw.inclusive.unwrap_or(true),
        value: raw.value.unwrap_or(default_format),
        source: path.to_path_buf(),
    })
}
