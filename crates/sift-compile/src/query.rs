//! Compiled query trees.
//!
//! A [`CompiledQuery`] is the boolean tree a backend executes: leaf filters combined with
//! "must match all" and "should match any" nodes. It renders to the backend's JSON query
//! DSL with [`CompiledQuery::to_json`].

use std::fmt;

use serde_json::{Map, Value, json};

/// One end of a range filter.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Bound {
    /// The bound value, exactly as written in the query.
    pub value: String,
    /// Whether the value itself is inside the range.
    pub inclusive: bool,
}

impl Bound {
    /// Creates an inclusive bound.
    pub fn inclusive(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            inclusive: true,
        }
    }

    /// Creates an exclusive bound.
    pub fn exclusive(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            inclusive: false,
        }
    }
}

/// A range filter on a single field. Either bound may be absent.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RangeFilter {
    /// Field the range applies to.
    pub field: String,
    /// Lower bound, if any.
    pub lower: Option<Bound>,
    /// Upper bound, if any.
    pub upper: Option<Bound>,
}

/// A leaf predicate.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Filter {
    /// Field value within a range.
    Range(RangeFilter),
    /// Field value equal to a term.
    Term {
        /// Field to match.
        field: String,
        /// Exact value.
        value: String,
    },
}

impl Filter {
    /// Creates a range filter with only a lower bound.
    pub fn lower(field: impl Into<String>, bound: Bound) -> Self {
        Self::Range(RangeFilter {
            field: field.into(),
            lower: Some(bound),
            upper: None,
        })
    }

    /// Creates a range filter with only an upper bound.
    pub fn upper(field: impl Into<String>, bound: Bound) -> Self {
        Self::Range(RangeFilter {
            field: field.into(),
            lower: None,
            upper: Some(bound),
        })
    }

    /// Creates a term filter.
    pub fn term(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Term {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Returns the field the filter applies to.
    pub fn field(&self) -> &str {
        match self {
            Self::Range(range) => &range.field,
            Self::Term { field, .. } => field,
        }
    }

    /// Renders the filter as a backend JSON query.
    ///
    /// An absent range bound renders as `null` and counts as inclusive, which the backend
    /// reads as "unbounded".
    pub fn to_json(&self) -> Value {
        match self {
            Self::Range(range) => {
                let (from, include_lower) = bound_json(range.lower.as_ref());
                let (to, include_upper) = bound_json(range.upper.as_ref());
                let mut body = Map::new();
                body.insert(
                    range.field.clone(),
                    json!({
                        "from": from,
                        "to": to,
                        "include_lower": include_lower,
                        "include_upper": include_upper,
                    }),
                );
                json!({ "range": body })
            }
            Self::Term { field, value } => {
                let mut body = Map::new();
                body.insert(field.clone(), Value::String(value.clone()));
                json!({ "term": body })
            }
        }
    }
}

/// Splits an optional bound into its JSON value and inclusivity flag.
fn bound_json(bound: Option<&Bound>) -> (Value, bool) {
    match bound {
        Some(b) => (Value::String(b.value.clone()), b.inclusive),
        None => (Value::Null, true),
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Range(range) => {
                write!(f, "{}", range.field)?;
                if let Some(lower) = &range.lower {
                    let op = if lower.inclusive { ">=" } else { ">" };
                    write!(f, " {op} {}", lower.value)?;
                }
                if let Some(upper) = &range.upper {
                    let op = if upper.inclusive { "<=" } else { "<" };
                    write!(f, " {op} {}", upper.value)?;
                }
                Ok(())
            }
            Self::Term { field, value } => write!(f, "{field} = {value}"),
        }
    }
}

/// A compiled boolean query tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CompiledQuery {
    /// A single leaf predicate.
    Filter(Filter),
    /// Every clause must match (AND).
    MustAll(Vec<Self>),
    /// At least `minimum_should_match` clauses must match (OR).
    ShouldAny {
        /// The alternatives.
        clauses: Vec<Self>,
        /// How many clauses must match. Always 1 for compiled queries.
        minimum_should_match: usize,
    },
}

impl CompiledQuery {
    /// Creates a `ShouldAny` node requiring one matching clause.
    pub fn should_any(clauses: Vec<Self>) -> Self {
        Self::ShouldAny {
            clauses,
            minimum_should_match: 1,
        }
    }

    /// Returns the number of leaf filters in the tree.
    pub fn filter_count(&self) -> usize {
        match self {
            Self::Filter(_) => 1,
            Self::MustAll(clauses) | Self::ShouldAny { clauses, .. } => {
                clauses.iter().map(Self::filter_count).sum()
            }
        }
    }

    /// Renders the tree as a backend JSON query.
    ///
    /// `MustAll` becomes a `bool` query with `filter` clauses, `ShouldAny` a `bool`
    /// query with `should` clauses and `minimum_should_match`.
    pub fn to_json(&self) -> Value {
        match self {
            Self::Filter(filter) => filter.to_json(),
            Self::MustAll(clauses) => {
                let filter: Vec<Value> = clauses.iter().map(Self::to_json).collect();
                json!({ "bool": { "filter": filter } })
            }
            Self::ShouldAny {
                clauses,
                minimum_should_match,
            } => {
                let should: Vec<Value> = clauses.iter().map(Self::to_json).collect();
                json!({
                    "bool": {
                        "should": should,
                        "minimum_should_match": minimum_should_match,
                    }
                })
            }
        }
    }

    /// Writes this node and its children, indented by `level`.
    fn fmt_indented(&self, f: &mut fmt::Formatter<'_>, level: usize) -> fmt::Result {
        let indent = "  ".repeat(level);
        match self {
            Self::Filter(filter) => writeln!(f, "{indent}Filter({filter})"),
            Self::MustAll(clauses) => {
                writeln!(f, "{indent}MustAll")?;
                for clause in clauses {
                    clause.fmt_indented(f, level + 1)?;
                }
                Ok(())
            }
            Self::ShouldAny {
                clauses,
                minimum_should_match,
            } => {
                writeln!(f, "{indent}ShouldAny(min {minimum_should_match})")?;
                for clause in clauses {
                    clause.fmt_indented(f, level + 1)?;
                }
                Ok(())
            }
        }
    }
}

impl From<Filter> for CompiledQuery {
    fn from(filter: Filter) -> Self {
        Self::Filter(filter)
    }
}

impl fmt::Display for CompiledQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_indented(f, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_json_with_absent_lower() {
        let filter = Filter::upper("createdAt", Bound::inclusive("2021-12-31"));
        assert_eq!(
            filter.to_json(),
            json!({
                "range": {
                    "createdAt": {
                        "from": null,
                        "include_lower": true,
                        "include_upper": true,
                        "to": "2021-12-31"
                    }
                }
            })
        );
    }

    #[test]
    fn exclusive_bound_json() {
        let filter = Filter::lower("stars", Bound::exclusive("10"));
        let json = filter.to_json();
        assert_eq!(json["range"]["stars"]["from"], "10");
        assert_eq!(json["range"]["stars"]["include_lower"], false);
        assert_eq!(json["range"]["stars"]["to"], Value::Null);
    }

    #[test]
    fn term_json() {
        assert_eq!(
            Filter::term("author.login", "octocat").to_json(),
            json!({ "term": { "author.login": "octocat" } })
        );
    }

    #[test]
    fn bool_json() {
        let query = CompiledQuery::should_any(vec![
            CompiledQuery::MustAll(vec![Filter::term("a", "1").into()]),
            Filter::term("b", "2").into(),
        ]);
        assert_eq!(
            query.to_json(),
            json!({
                "bool": {
                    "should": [
                        { "bool": { "filter": [ { "term": { "a": "1" } } ] } },
                        { "term": { "b": "2" } }
                    ],
                    "minimum_should_match": 1
                }
            })
        );
    }

    #[test]
    fn display_tree() {
        let query = CompiledQuery::MustAll(vec![
            Filter::lower("createdAt", Bound::inclusive("2021")).into(),
            CompiledQuery::should_any(vec![
                Filter::lower("createdAt", Bound::exclusive("2023")).into(),
                Filter::term("author", "x").into(),
            ]),
        ]);
        assert_eq!(
            query.to_string(),
            "MustAll\n  Filter(createdAt >= 2021)\n  ShouldAny(min 1)\n    \
             Filter(createdAt > 2023)\n    Filter(author = x)\n"
        );
        assert_eq!(query.filter_count(), 3);
    }
}
