//! Key definitions: how a configured query key becomes a filter.

use std::{fmt, path::PathBuf};

use serde::{Deserialize, Serialize};

/// The kind of filter a key compiles to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleKind {
    /// A half-open range on a field.
    Range,
    /// An exact-value match on a field.
    Term,
}

/// Which end of a range the query value sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BoundSide {
    /// The value is the lower bound; there is no upper bound.
    Lower,
    /// The value is the upper bound; there is no lower bound.
    Upper,
}

/// The format a key's value must have.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueFormat {
    /// A calendar date: `YYYY`, `YYYY-MM` or `YYYY-MM-DD`.
    Date,
    /// A base-10 integer with an optional leading `-`.
    Integer,
    /// Any value token, passed through unchanged.
    Keyword,
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Range => write!(f, "range"),
            Self::Term => write!(f, "term"),
        }
    }
}

impl fmt::Display for BoundSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lower => write!(f, "lower"),
            Self::Upper => write!(f, "upper"),
        }
    }
}

impl fmt::Display for ValueFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Date => write!(f, "date"),
            Self::Integer => write!(f, "integer"),
            Self::Keyword => write!(f, "keyword"),
        }
    }
}

/// A fully resolved key definition from configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeyDefinition {
    /// Filter kind.
    pub rule: RuleKind,
    /// Backend field the filter applies to.
    pub field: String,
    /// Range side. Always set for range rules; ignored by term rules.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bound: Option<BoundSide>,
    /// Whether a range bound includes the value itself.
    pub inclusive: bool,
    /// Format check applied to query values.
    pub value: ValueFormat,
    /// Config file the definition came from.
    #[serde(skip)]
    pub source: PathBuf,
}
