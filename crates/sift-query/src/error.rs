//! Error types for lexing, parsing, and compiling filter queries.
//!
//! Each stage has its own error type. [`QueryError`] unifies them into the single tagged
//! result handed back to callers, and knows how to point at the offending byte of the query.

use std::{error::Error, fmt};

use thiserror::Error;

/// Lexer error: a character that starts no recognized token.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unexpected character {found:?} at offset {offset}")]
pub struct LexError {
    /// Byte offset of the unexpected character.
    pub offset: usize,
    /// The character that could not be tokenized.
    pub found: char,
}

impl LexError {
    /// Creates a new lexer error.
    pub fn new(offset: usize, found: char) -> Self {
        Self { offset, found }
    }
}

/// Parser error: the token sequence violates the grammar or nests too deeply.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// A grammar violation.
    #[error("expected {expected}, found {found} at offset {offset}")]
    Syntax {
        /// Byte offset of the offending token (or of the end of input).
        offset: usize,
        /// Description of what the grammar allows here.
        expected: String,
        /// Description of what was actually found.
        found: String,
    },

    /// Parenthesized groups nested deeper than the configured limit.
    #[error("groups nested deeper than {limit} levels at offset {offset}")]
    DepthExceeded {
        /// Byte offset of the `(` that crossed the limit.
        offset: usize,
        /// The nesting limit in effect.
        limit: usize,
    },
}

impl ParseError {
    /// Creates a syntax error.
    pub fn syntax(offset: usize, expected: impl Into<String>, found: impl Into<String>) -> Self {
        Self::Syntax {
            offset,
            expected: expected.into(),
            found: found.into(),
        }
    }

    /// Returns the byte offset the error refers to.
    pub fn offset(&self) -> usize {
        match self {
            Self::Syntax { offset, .. } | Self::DepthExceeded { offset, .. } => *offset,
        }
    }
}

/// A unified error type for the whole parse-and-compile pipeline.
///
/// Carries the kind of failure and, when available, the original query so that
/// [`Display`](fmt::Display) can render a caret under the offending position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryError {
    /// The kind of error that occurred.
    pub kind: QueryErrorKind,
    /// The original query string (if available).
    pub query: Option<String>,
}

/// The specific kind of query error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryErrorKind {
    /// A character matched none of the token patterns.
    Lex {
        /// Byte offset in the input.
        offset: usize,
        /// The unexpected character.
        found: char,
    },
    /// The token sequence violates the grammar.
    Syntax {
        /// Byte offset in the input.
        offset: usize,
        /// What the grammar expected.
        expected: String,
        /// What was found instead.
        found: String,
    },
    /// Groups nested beyond the depth limit.
    DepthExceeded {
        /// Byte offset of the `(` that crossed the limit.
        offset: usize,
        /// The nesting limit in effect.
        limit: usize,
    },
    /// A leaf used a key that has no compilation rule.
    UnknownKey {
        /// The unrecognized key.
        key: String,
        /// Keys that would have been accepted, in sorted order.
        known: Vec<String>,
    },
    /// A recognized key was given a value its rule rejects.
    InvalidValue {
        /// The key whose rule rejected the value.
        key: String,
        /// The rejected value.
        value: String,
        /// Why the value was rejected.
        reason: String,
    },
}

impl QueryError {
    /// Creates an error of the given kind without query context.
    pub fn new(kind: QueryErrorKind) -> Self {
        Self { kind, query: None }
    }

    /// Creates an unknown-key error.
    pub fn unknown_key(key: impl Into<String>, known: Vec<String>) -> Self {
        Self::new(QueryErrorKind::UnknownKey {
            key: key.into(),
            known,
        })
    }

    /// Creates an invalid-value error.
    pub fn invalid_value(
        key: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::new(QueryErrorKind::InvalidValue {
            key: key.into(),
            value: value.into(),
            reason: reason.into(),
        })
    }

    /// Sets the query string for this error.
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    /// Returns the byte offset the error points at, if it has one.
    pub fn offset(&self) -> Option<usize> {
        match &self.kind {
            QueryErrorKind::Lex { offset, .. }
            | QueryErrorKind::Syntax { offset, .. }
            | QueryErrorKind::DepthExceeded { offset, .. } => Some(*offset),
            QueryErrorKind::UnknownKey { .. } | QueryErrorKind::InvalidValue { .. } => None,
        }
    }

    /// Returns the error message without context.
    pub fn message(&self) -> String {
        match &self.kind {
            QueryErrorKind::Lex { found, .. } => format!("unexpected character {found:?}"),
            QueryErrorKind::Syntax {
                expected, found, ..
            } => format!("expected {expected}, found {found}"),
            QueryErrorKind::DepthExceeded { limit, .. } => {
                format!("groups nested deeper than {limit} levels")
            }
            QueryErrorKind::UnknownKey { key, .. } => format!("unknown key: {key}"),
            QueryErrorKind::InvalidValue { key, value, reason } => {
                format!("invalid value {value:?} for key '{key}': {reason}")
            }
        }
    }

    /// Returns a suggestion for common errors.
    pub fn suggestion(&self) -> Option<String> {
        match &self.kind {
            QueryErrorKind::Lex { .. } => Some(
                "Keys use letters and '_'; values use letters, digits, '_' and '-'".to_string(),
            ),
            QueryErrorKind::Syntax { expected, .. } if expected.contains("`)`") => {
                Some("Add a closing parenthesis ) to match the opening one".to_string())
            }
            QueryErrorKind::Syntax { found, .. }
                if found.contains("`AND`") || found.contains("`OR`") =>
            {
                Some(
                    "AND and OR need a term on both sides, e.g., 'since:2021 OR until:2019'"
                        .to_string(),
                )
            }
            QueryErrorKind::Syntax { found, .. } if found.contains("`)`") => {
                Some("Remove the unmatched closing parenthesis".to_string())
            }
            QueryErrorKind::DepthExceeded { .. } => {
                Some("Remove redundant parentheses to flatten the query".to_string())
            }
            QueryErrorKind::UnknownKey { known, .. } if !known.is_empty() => {
                Some(format!("Valid keys are: {}", known.join(", ")))
            }
            QueryErrorKind::InvalidValue { reason, .. } if reason.contains("date") => {
                Some("Dates are written as YYYY, YYYY-MM or YYYY-MM-DD".to_string())
            }
            _ => None,
        }
    }
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix = match &self.kind {
            QueryErrorKind::Lex { .. }
            | QueryErrorKind::Syntax { .. }
            | QueryErrorKind::DepthExceeded { .. } => "query syntax error",
            QueryErrorKind::UnknownKey { .. } | QueryErrorKind::InvalidValue { .. } => {
                "query error"
            }
        };

        writeln!(f, "{}: {}", prefix, self.message())?;

        if let Some(query) = &self.query {
            writeln!(f, "  {query}")?;
            if let Some(pos) = self.offset() {
                let clamped = pos.min(query.len());
                let column = query
                    .get(..clamped)
                    .map_or(clamped, |prefix| prefix.chars().count());
                writeln!(f, "  {}^", " ".repeat(column))?;
            }
        }

        if let Some(suggestion) = self.suggestion() {
            write!(f, "hint: {suggestion}")?;
        }

        Ok(())
    }
}

impl Error for QueryError {}

impl From<LexError> for QueryError {
    fn from(err: LexError) -> Self {
        Self::new(QueryErrorKind::Lex {
            offset: err.offset,
            found: err.found,
        })
    }
}

impl From<ParseError> for QueryError {
    fn from(err: ParseError) -> Self {
        let kind = match err {
            ParseError::Syntax {
                offset,
                expected,
                found,
            } => QueryErrorKind::Syntax {
                offset,
                expected,
                found,
            },
            ParseError::DepthExceeded { offset, limit } => {
                QueryErrorKind::DepthExceeded { offset, limit }
            }
        };
        Self::new(kind)
    }
}
