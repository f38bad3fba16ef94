//! Query compiler.
//!
//! Compiles a query AST into a [`CompiledQuery`], resolving each leaf through a
//! [`KeyTable`].

use log::debug;
use sift_config::{Config, ConfigError};
use sift_query::{AndNode, OrNode, ParseOptions, QueryError, TermNode, parse_with};

use crate::{error::CompileError, query::CompiledQuery, table::KeyTable};

/// Compiles query ASTs against a key table.
///
/// `OrNode` becomes `ShouldAny`, `AndNode` becomes `MustAll`, a group compiles to
/// whatever its inner expression compiles to, and a leaf goes through its key's rule.
/// Nodes with a single operand compile to that operand, so `(a:1)` and `a:1` produce the
/// same tree.
#[derive(Debug, Clone, Default)]
pub struct QueryCompiler {
    /// Key name to rule mapping.
    keys: KeyTable,
    /// Options for parsing query strings.
    options: ParseOptions,
}

impl QueryCompiler {
    /// Creates a compiler for the given key table.
    pub fn new(keys: KeyTable) -> Self {
        Self {
            keys,
            options: ParseOptions::default(),
        }
    }

    /// Creates a compiler from loaded configuration: its key table and nesting limit.
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let keys = KeyTable::from_config(config)?;
        Ok(Self::new(keys).with_max_depth(config.settings.max_depth))
    }

    /// Sets the parenthesis nesting limit used by [`compile_str`](Self::compile_str).
    ///
    /// The parser never nests deeper than [`MAX_DEPTH_LIMIT`](sift_query::MAX_DEPTH_LIMIT),
    /// whatever the value.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.options.max_depth = max_depth;
        self
    }

    /// Returns the key table.
    pub fn keys(&self) -> &KeyTable {
        &self.keys
    }

    /// Returns the parse options used by [`compile_str`](Self::compile_str).
    pub fn parse_options(&self) -> &ParseOptions {
        &self.options
    }

    /// Compiles a query AST.
    ///
    /// Fails on the first leaf whose key is unknown or whose value its rule rejects.
    pub fn compile(&self, tree: &OrNode) -> Result<CompiledQuery, CompileError> {
        debug!("compiling query with {} leaves", tree.leaves().len());
        self.compile_or(tree)
    }

    /// Parses and compiles a query string.
    ///
    /// Errors from every stage carry the input so they render with context.
    pub fn compile_str(&self, input: &str) -> Result<CompiledQuery, QueryError> {
        let tree = parse_with(input, &self.options)?;
        self.compile(&tree)
            .map_err(|e| QueryError::from(e).with_query(input))
    }

    /// Compiles an OR node.
    fn compile_or(&self, node: &OrNode) -> Result<CompiledQuery, CompileError> {
        let mut clauses = node
            .operands()
            .iter()
            .map(|operand| self.compile_and(operand))
            .collect::<Result<Vec<_>, _>>()?;

        if clauses.len() == 1 {
            return Ok(clauses.remove(0));
        }
        Ok(CompiledQuery::should_any(clauses))
    }

    /// Compiles an AND node.
    fn compile_and(&self, node: &AndNode) -> Result<CompiledQuery, CompileError> {
        let mut clauses = node
            .operands()
            .iter()
            .map(|operand| self.compile_term(operand))
            .collect::<Result<Vec<_>, _>>()?;

        if clauses.len() == 1 {
            return Ok(clauses.remove(0));
        }
        Ok(CompiledQuery::MustAll(clauses))
    }

    /// Compiles a leaf or group.
    fn compile_term(&self, node: &TermNode) -> Result<CompiledQuery, CompileError> {
        match node {
            TermNode::Leaf { key, value } => self.compile_leaf(key, value),
            TermNode::Group { inner } => self.compile_or(inner),
        }
    }

    /// Compiles a `key:value` leaf through the key table.
    fn compile_leaf(&self, key: &str, value: &str) -> Result<CompiledQuery, CompileError> {
        let rule = self.keys.get(key).ok_or_else(|| CompileError::UnknownKey {
            key: key.to_string(),
            known: self.keys.names(),
        })?;
        Ok(CompiledQuery::Filter(rule.compile(key, value)?))
    }
}

#[cfg(test)]
mod tests {
    use sift_config::{BoundSide, ValueFormat};
    use sift_query::{MAX_DEPTH_LIMIT, QueryErrorKind, parse};

    use super::*;
    use crate::{
        query::{Bound, Filter},
        rules::{RangeRule, TermRule},
    };

    fn compiler() -> QueryCompiler {
        QueryCompiler::default()
    }

    fn compile(input: &str) -> Result<CompiledQuery, CompileError> {
        compiler().compile(&parse(input).unwrap())
    }

    fn since(value: &str) -> CompiledQuery {
        Filter::lower("createdAt", Bound::inclusive(value)).into()
    }

    fn until(value: &str) -> CompiledQuery {
        Filter::upper("createdAt", Bound::inclusive(value)).into()
    }

    #[test]
    fn single_leaf_is_bare_filter() {
        assert_eq!(compile("since:2021").unwrap(), since("2021"));
    }

    #[test]
    fn and_compiles_to_must_all_in_order() {
        assert_eq!(
            compile("since:2021 AND until:2022").unwrap(),
            CompiledQuery::MustAll(vec![since("2021"), until("2022")])
        );
    }

    #[test]
    fn or_compiles_to_should_any() {
        let compiled = compile("since:2021 OR until:2019").unwrap();
        assert_eq!(
            compiled,
            CompiledQuery::ShouldAny {
                clauses: vec![since("2021"), until("2019")],
                minimum_should_match: 1,
            }
        );
    }

    #[test]
    fn group_adds_no_wrapping() {
        assert_eq!(compile("(since:2021)").unwrap(), compile("since:2021").unwrap());
        assert_eq!(
            compile("((since:2021 AND until:2022))").unwrap(),
            compile("since:2021 AND until:2022").unwrap()
        );
    }

    #[test]
    fn nested_group_scenario() {
        let tree = parse("since:2021 AND (since:2023 OR until:2024) AND since:2025").unwrap();
        assert_eq!(tree.operands().len(), 1);
        assert_eq!(tree.operands()[0].operands().len(), 3);

        assert_eq!(
            compiler().compile(&tree).unwrap(),
            CompiledQuery::MustAll(vec![
                since("2021"),
                CompiledQuery::should_any(vec![since("2023"), until("2024")]),
                since("2025"),
            ])
        );
    }

    #[test]
    fn precedence_shapes_tree() {
        assert_eq!(
            compile("since:2021-01-01 AND until:2021-12-31 OR since:1921-01-01 AND until:1921-12-31")
                .unwrap(),
            CompiledQuery::should_any(vec![
                CompiledQuery::MustAll(vec![since("2021-01-01"), until("2021-12-31")]),
                CompiledQuery::MustAll(vec![since("1921-01-01"), until("1921-12-31")]),
            ])
        );
    }

    #[test]
    fn unknown_key() {
        let err = compile("foo:1").unwrap_err();
        assert_eq!(
            err,
            CompileError::UnknownKey {
                key: "foo".into(),
                known: vec!["since".into(), "until".into()],
            }
        );
    }

    #[test]
    fn first_error_wins() {
        let err = compile("since:2021 AND foo:1 AND until:nope").unwrap_err();
        assert!(matches!(err, CompileError::UnknownKey { ref key, .. } if key == "foo"));
    }

    #[test]
    fn invalid_value() {
        let err = compile("since:2021-02-30").unwrap_err();
        assert!(matches!(
            err,
            CompileError::InvalidValue { ref key, ref value, .. }
                if key == "since" && value == "2021-02-30"
        ));
    }

    #[test]
    fn compiling_twice_is_equal() {
        let tree = parse("(since:2021 OR until:2020) AND since:2019").unwrap();
        let compiler = compiler();
        assert_eq!(compiler.compile(&tree).unwrap(), compiler.compile(&tree).unwrap());
    }

    #[test]
    fn custom_keys() {
        let mut keys = KeyTable::empty();
        keys.insert("author", TermRule::new("author.login", ValueFormat::Keyword));
        keys.insert(
            "min_stars",
            RangeRule::new("stars", BoundSide::Lower, false, ValueFormat::Integer),
        );
        let compiler = QueryCompiler::new(keys);

        let compiled = compiler.compile_str("author:octocat AND min_stars:10").unwrap();
        assert_eq!(
            compiled,
            CompiledQuery::MustAll(vec![
                Filter::term("author.login", "octocat").into(),
                Filter::lower("stars", Bound::exclusive("10")).into(),
            ])
        );

        let err = compiler.compile_str("since:2021").unwrap_err();
        assert!(matches!(err.kind, QueryErrorKind::UnknownKey { .. }));
    }

    #[test]
    fn huge_depth_limit_still_fails_cleanly() {
        let compiler = compiler().with_max_depth(usize::MAX);
        let depth = 200_000;
        let input = format!("{}since:2021{}", "(".repeat(depth), ")".repeat(depth));

        let err = compiler.compile_str(&input).unwrap_err();
        assert!(matches!(
            err.kind,
            QueryErrorKind::DepthExceeded {
                limit: MAX_DEPTH_LIMIT,
                ..
            }
        ));
    }

    #[test]
    fn compile_str_reports_every_stage() {
        let compiler = compiler().with_max_depth(1);

        let lex = compiler.compile_str("since$:1").unwrap_err();
        assert!(matches!(lex.kind, QueryErrorKind::Lex { offset: 5, .. }));

        let syntax = compiler.compile_str("since:2021 AND").unwrap_err();
        assert!(matches!(syntax.kind, QueryErrorKind::Syntax { .. }));

        let depth = compiler.compile_str("((since:2021))").unwrap_err();
        assert!(matches!(depth.kind, QueryErrorKind::DepthExceeded { limit: 1, .. }));

        let value = compiler.compile_str("until:later").unwrap_err();
        assert!(matches!(value.kind, QueryErrorKind::InvalidValue { .. }));
        assert_eq!(value.query.as_deref(), Some("until:later"));
    }
}
