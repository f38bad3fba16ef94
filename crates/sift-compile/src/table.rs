//! The key table: which keys a query may use, and what each compiles to.

use std::{collections::BTreeMap, path::PathBuf, sync::Arc};

use log::{debug, info};
use serde::Serialize;
use sift_config::{Config, ConfigError, KeyDefinition, RuleKind, ValueFormat};

use crate::rules::{KeyRule, RangeRule, TermRule};

/// Field the built-in keys filter on.
pub const CREATED_AT: &str = "createdAt";

/// Where a key's rule came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeySource {
    /// Provided by sift itself.
    Builtin,
    /// Defined in a configuration file.
    Config(PathBuf),
    /// Added programmatically.
    Custom,
}

/// A key table entry.
#[derive(Debug, Clone)]
struct KeyEntry {
    /// Rule the key compiles with.
    rule: Arc<dyn KeyRule>,
    /// Origin of the rule.
    source: KeySource,
}

/// Serializable description of one key, for listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeySummary {
    /// Key name as written in queries.
    pub name: String,
    /// Filter kind.
    pub rule: RuleKind,
    /// Backend field.
    pub field: String,
    /// Accepted value format.
    pub value: ValueFormat,
    /// What the filter does, e.g. `createdAt >= value`.
    pub filter: String,
    /// `builtin`, `custom`, or the path of the defining config file.
    pub source: String,
}

/// Mapping from key name to leaf rule.
///
/// The table is plain data: adding a key never requires touching the compiler.
#[derive(Debug, Clone)]
pub struct KeyTable {
    /// Entries by key name.
    entries: BTreeMap<String, KeyEntry>,
}

impl KeyTable {
    /// Creates a table with no keys.
    pub fn empty() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Creates a table holding the built-in keys.
    ///
    /// - `since`: inclusive lower bound on `createdAt`
    /// - `until`: inclusive upper bound on `createdAt`
    pub fn builtin() -> Self {
        let mut table = Self::empty();
        table.insert_entry(
            "since",
            Arc::new(RangeRule::date_from(CREATED_AT)),
            KeySource::Builtin,
        );
        table.insert_entry(
            "until",
            Arc::new(RangeRule::date_until(CREATED_AT)),
            KeySource::Builtin,
        );
        table
    }

    /// Builds the table described by a loaded configuration.
    ///
    /// Starts from the built-in keys unless `builtin_keys` is off. Configured keys replace
    /// built-in keys of the same name.
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let mut table = if config.settings.builtin_keys {
            Self::builtin()
        } else {
            Self::empty()
        };

        for (name, definition) in &config.keys {
            let rule = rule_from_definition(name, definition)?;
            let source = KeySource::Config(definition.source.clone());
            if table.insert_entry(name, rule, source) == Some(KeySource::Builtin) {
                info!(
                    "key '{name}' from {} replaces the built-in key",
                    definition.source.display()
                );
            }
        }

        debug!("key table has {} keys: {}", table.len(), table.names().join(", "));
        Ok(table)
    }

    /// Adds or replaces a key, returning true if a key of that name existed.
    pub fn insert(&mut self, name: impl Into<String>, rule: impl KeyRule + 'static) -> bool {
        self.insert_entry(name, Arc::new(rule), KeySource::Custom).is_some()
    }

    /// Inserts an entry and returns the source of any entry it replaced.
    fn insert_entry(
        &mut self,
        name: impl Into<String>,
        rule: Arc<dyn KeyRule>,
        source: KeySource,
    ) -> Option<KeySource> {
        self.entries
            .insert(name.into(), KeyEntry { rule, source })
            .map(|previous| previous.source)
    }

    /// Removes a key, returning true if it existed.
    pub fn remove(&mut self, name: &str) -> bool {
        self.entries.remove(name).is_some()
    }

    /// Looks up the rule for a key.
    pub fn get(&self, name: &str) -> Option<&dyn KeyRule> {
        self.entries.get(name).map(|entry| entry.rule.as_ref())
    }

    /// Returns where a key's rule came from.
    pub fn source(&self, name: &str) -> Option<&KeySource> {
        self.entries.get(name).map(|entry| &entry.source)
    }

    /// Returns true if the table has a rule for `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Key names in sorted order.
    pub fn names(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    /// Number of keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the table has no keys.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Describes every key, sorted by name.
    pub fn summaries(&self) -> Vec<KeySummary> {
        self.entries
            .iter()
            .map(|(name, entry)| KeySummary {
                name: name.clone(),
                rule: entry.rule.kind(),
                field: entry.rule.field().to_string(),
                value: entry.rule.format(),
                filter: entry.rule.describe(),
                source: match &entry.source {
                    KeySource::Builtin => "builtin".to_string(),
                    KeySource::Custom => "custom".to_string(),
                    KeySource::Config(path) => path.display().to_string(),
                },
            })
            .collect()
    }
}

impl Default for KeyTable {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Turns a configured key definition into a rule.
fn rule_from_definition(
    name: &str,
    definition: &KeyDefinition,
) -> Result<Arc<dyn KeyRule>, ConfigError> {
    match definition.rule {
        RuleKind::Term => Ok(Arc::new(TermRule::new(&definition.field, definition.value))),
        RuleKind::Range => {
            let side = definition.bound.ok_or_else(|| ConfigError::InvalidKey {
                path: definition.source.clone(),
                key: name.to_string(),
                message: "range rules need `bound = \"lower\"` or `bound = \"upper\"`".into(),
            })?;
            Ok(Arc::new(RangeRule::new(
                &definition.field,
                side,
                definition.inclusive,
                definition.value,
            )))
        }
    }
}
