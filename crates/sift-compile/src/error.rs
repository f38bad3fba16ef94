//! Compilation errors.

use sift_query::QueryError;
use thiserror::Error;

/// Error during query compilation.
///
/// Compilation only fails on leaf semantics: the structure of the tree was already
/// checked by the parser.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    /// A leaf used a key that is not in the key table.
    #[error("unknown key: {key}")]
    UnknownKey {
        /// The unrecognized key.
        key: String,
        /// Keys the table does know, sorted.
        known: Vec<String>,
    },

    /// A known key's rule rejected the value.
    #[error("invalid value {value:?} for key '{key}': {reason}")]
    InvalidValue {
        /// The key whose rule rejected the value.
        key: String,
        /// The rejected value.
        value: String,
        /// Why the value was rejected.
        reason: String,
    },
}

impl CompileError {
    /// Creates an invalid-value error.
    pub fn invalid_value(
        key: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidValue {
            key: key.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }
}

impl From<CompileError> for QueryError {
    fn from(err: CompileError) -> Self {
        match err {
            CompileError::UnknownKey { key, known } => Self::unknown_key(key, known),
            CompileError::InvalidValue { key, value, reason } => {
                Self::invalid_value(key, value, reason)
            }
        }
    }
}
