//! Configuration validation.
//!
//! Validates a loaded configuration and reports warnings for potential issues.

use std::fmt;

use sift_query::is_key_shaped;

use crate::{Config, keys::RuleKind};

/// A non-fatal warning about the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigWarning {
    /// A key name that the lexer can never produce as a key, so it is unreachable.
    KeyNotQueryable {
        /// The key name.
        key: String,
    },
    /// A key whose field name is empty.
    EmptyField {
        /// The key name.
        key: String,
    },
    /// A term rule with a `bound`, which term rules ignore.
    BoundIgnored {
        /// The key name.
        key: String,
    },
    /// Built-in keys are disabled and no keys are configured, so every query fails.
    NoKeysDefined,
}

impl fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::KeyNotQueryable { key } => {
                write!(
                    f,
                    "key '{key}' can never appear in a query (keys are letters and '_', \
                     and may not be AND or OR)"
                )
            }
            Self::EmptyField { key } => write!(f, "key '{key}' has an empty field name"),
            Self::BoundIgnored { key } => {
                write!(f, "key '{key}' is a term rule; its bound is ignored")
            }
            Self::NoKeysDefined => {
                write!(f, "built-in keys are disabled and no keys are defined")
            }
        }
    }
}

/// Validates the configuration and returns any warnings.
pub fn validate_config(config: &Config) -> Vec<ConfigWarning> {
    let mut warnings = Vec::new();

    if !config.settings.builtin_keys && config.keys.is_empty() {
        warnings.push(ConfigWarning::NoKeysDefined);
        return warnings;
    }

    for (name, definition) in &config.keys {
        if !is_key_shaped(name) {
            warnings.push(ConfigWarning::KeyNotQueryable { key: name.clone() });
        }
        if definition.field.trim().is_empty() {
            warnings.push(ConfigWarning::EmptyField { key: name.clone() });
        }
        if definition.rule == RuleKind::Term && definition.bound.is_some() {
            warnings.push(ConfigWarning::BoundIgnored { key: name.clone() });
        }
    }

    warnings
}
