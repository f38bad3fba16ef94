//! Leaf rules: how a `key:value` term becomes a filter.
//!
//! Each key in a [`KeyTable`](crate::KeyTable) maps to a [`KeyRule`]. Rules check the
//! value's format before building the filter, so malformed values fail at compile time
//! instead of reaching the backend.

use std::fmt;

use chrono::NaiveDate;
use sift_config::{BoundSide, RuleKind, ValueFormat};

use crate::{
    error::CompileError,
    query::{Bound, Filter},
};

/// Compiles the value of a single key into a filter.
pub trait KeyRule: Send + Sync + fmt::Debug {
    /// Builds the filter for `key:value`, or rejects the value.
    fn compile(&self, key: &str, value: &str) -> Result<Filter, CompileError>;

    /// The kind of filter this rule produces.
    fn kind(&self) -> RuleKind;

    /// The backend field the filter applies to.
    fn field(&self) -> &str;

    /// The format values must have.
    fn format(&self) -> ValueFormat;

    /// One-line description of the filter, for listings.
    fn describe(&self) -> String;
}

/// A one-sided range on a field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeRule {
    /// Field the range applies to.
    field: String,
    /// Which end of the range the value sets.
    side: BoundSide,
    /// Whether the bound includes the value.
    inclusive: bool,
    /// Accepted value format.
    format: ValueFormat,
}

impl RangeRule {
    /// Creates a range rule.
    pub fn new(
        field: impl Into<String>,
        side: BoundSide,
        inclusive: bool,
        format: ValueFormat,
    ) -> Self {
        Self {
            field: field.into(),
            side,
            inclusive,
            format,
        }
    }

    /// Inclusive lower bound on a date field.
    pub fn date_from(field: impl Into<String>) -> Self {
        Self::new(field, BoundSide::Lower, true, ValueFormat::Date)
    }

    /// Inclusive upper bound on a date field.
    pub fn date_until(field: impl Into<String>) -> Self {
        Self::new(field, BoundSide::Upper, true, ValueFormat::Date)
    }
}

impl KeyRule for RangeRule {
    fn compile(&self, key: &str, value: &str) -> Result<Filter, CompileError> {
        check_value(self.format, value)
            .map_err(|reason| CompileError::invalid_value(key, value, reason))?;
        let bound = Bound {
            value: value.to_string(),
            inclusive: self.inclusive,
        };
        Ok(match self.side {
            BoundSide::Lower => Filter::lower(&self.field, bound),
            BoundSide::Upper => Filter::upper(&self.field, bound),
        })
    }

    fn kind(&self) -> RuleKind {
        RuleKind::Range
    }

    fn field(&self) -> &str {
        &self.field
    }

    fn format(&self) -> ValueFormat {
        self.format
    }

    fn describe(&self) -> String {
        let op = match (self.side, self.inclusive) {
            (BoundSide::Lower, true) => ">=",
            (BoundSide::Lower, false) => ">",
            (BoundSide::Upper, true) => "<=",
            (BoundSide::Upper, false) => "<",
        };
        format!("{} {op} value", self.field)
    }
}

/// An exact-match term on a field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermRule {
    /// Field to match.
    field: String,
    /// Accepted value format.
    format: ValueFormat,
}

impl TermRule {
    /// Creates a term rule.
    pub fn new(field: impl Into<String>, format: ValueFormat) -> Self {
        Self {
            field: field.into(),
            format,
        }
    }
}

impl KeyRule for TermRule {
    fn compile(&self, key: &str, value: &str) -> Result<Filter, CompileError> {
        check_value(self.format, value)
            .map_err(|reason| CompileError::invalid_value(key, value, reason))?;
        Ok(Filter::term(&self.field, value))
    }

    fn kind(&self) -> RuleKind {
        RuleKind::Term
    }

    fn field(&self) -> &str {
        &self.field
    }

    fn format(&self) -> ValueFormat {
        self.format
    }

    fn describe(&self) -> String {
        format!("{} = value", self.field)
    }
}

/// Checks a value against a format, returning the reason it was rejected.
pub fn check_value(format: ValueFormat, value: &str) -> Result<(), String> {
    match format {
        ValueFormat::Date => check_date(value),
        ValueFormat::Integer => value
            .parse::<i64>()
            .map(|_| ())
            .map_err(|_| "expected an integer".to_string()),
        ValueFormat::Keyword => Ok(()),
    }
}

/// Accepts `YYYY`, `YYYY-MM` and `YYYY-MM-DD` naming a real calendar day.
fn check_date(value: &str) -> Result<(), String> {
    let shape_error = || "expected a date as YYYY, YYYY-MM or YYYY-MM-DD".to_string();

    let parts: Vec<&str> = value.split('-').collect();
    let widths: Vec<usize> = parts.iter().map(|p| p.len()).collect();
    if !matches!(widths.as_slice(), [4] | [4, 2] | [4, 2, 2])
        || !parts.iter().all(|p| p.bytes().all(|b| b.is_ascii_digit()))
    {
        return Err(shape_error());
    }

    let number = |index: usize| -> Option<u32> { parts.get(index).and_then(|p| p.parse().ok()) };
    let year = number(0).and_then(|y| i32::try_from(y).ok()).ok_or_else(shape_error)?;
    let month = number(1).unwrap_or(1);
    let day = number(2).unwrap_or(1);

    NaiveDate::from_ymd_opt(year, month, day)
        .map(|_| ())
        .ok_or_else(|| format!("{value} is not a valid calendar date"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dates() {
        for ok in ["2021", "2021-02", "2021-02-28", "2024-02-29", "1921-12-31"] {
            assert_eq!(check_value(ValueFormat::Date, ok), Ok(()), "{ok}");
        }
        for bad in [
            "21", "2021-2", "2021-02-1", "2021-13", "2021-02-30", "2023-02-29", "2021-00-10",
            "abcd", "2021-02-28-01", "yesterday", "-2021",
        ] {
            assert!(check_value(ValueFormat::Date, bad).is_err(), "{bad}");
        }
    }

    #[test]
    fn date_errors_mention_dates() {
        let shape = check_value(ValueFormat::Date, "soon").unwrap_err();
        assert!(shape.contains("date"));
        let calendar = check_value(ValueFormat::Date, "2021-02-30").unwrap_err();
        assert!(calendar.contains("date"));
    }

    #[test]
    fn integers() {
        assert!(check_value(ValueFormat::Integer, "42").is_ok());
        assert!(check_value(ValueFormat::Integer, "-7").is_ok());
        assert!(check_value(ValueFormat::Integer, "-").is_err());
        assert!(check_value(ValueFormat::Integer, "4a").is_err());
    }

    #[test]
    fn keywords_accept_anything() {
        assert!(check_value(ValueFormat::Keyword, "any_thing-1").is_ok());
    }

    #[test]
    fn range_rule_builds_bound() {
        let rule = RangeRule::date_from("createdAt");
        assert_eq!(
            rule.compile("since", "2021").unwrap(),
            Filter::lower("createdAt", Bound::inclusive("2021"))
        );

        let rule = RangeRule::new("stars", BoundSide::Upper, false, ValueFormat::Integer);
        assert_eq!(
            rule.compile("max_stars", "100").unwrap(),
            Filter::upper("stars", Bound::exclusive("100"))
        );
        assert_eq!(rule.describe(), "stars < value");
    }

    #[test]
    fn rule_rejects_bad_value() {
        let err = RangeRule::date_until("createdAt")
            .compile("until", "tomorrow")
            .unwrap_err();
        assert!(matches!(
            err,
            CompileError::InvalidValue { ref key, ref value, .. }
                if key == "until" && value == "tomorrow"
        ));
    }

    #[test]
    fn term_rule() {
        let rule = TermRule::new("author.login", ValueFormat::Keyword);
        assert_eq!(
            rule.compile("author", "octocat").unwrap(),
            Filter::term("author.login", "octocat")
        );
        assert_eq!(rule.kind(), RuleKind::Term);
        assert_eq!(rule.describe(), "author.login = value");
    }
}
