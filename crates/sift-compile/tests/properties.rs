//! Property tests for the compiler.

// Integration tests live outside cfg(test) by design
#![allow(clippy::tests_outside_test_module)]

use proptest::prelude::*;
use sift_compile::{CompileError, CompiledQuery, Filter, KeyTable, QueryCompiler, TermRule};
use sift_config::ValueFormat;
use sift_query::{AndNode, OrNode, TermNode, parse};

/// Keys: lowercase so they never collide with connectives.
fn key() -> impl Strategy<Value = String> {
    "[a-z][a-z_]{0,5}"
}

/// Values: digits and dashes, never a connective.
fn value() -> impl Strategy<Value = String> {
    "[0-9][0-9a-z-]{0,6}"
}

/// Builds an `OrNode` from nested operand lists.
fn build(ands: Vec<Vec<TermNode>>) -> OrNode {
    OrNode::from_operands(
        ands.into_iter()
            .map(|terms| AndNode::from_operands(terms).unwrap())
            .collect(),
    )
    .unwrap()
}

/// Arbitrary well-formed trees with some grouping.
fn tree() -> impl Strategy<Value = OrNode> {
    let leaf = (key(), value()).prop_map(|(k, v)| TermNode::leaf(k, v));
    let term = leaf.prop_recursive(3, 24, 3, |inner| {
        prop::collection::vec(prop::collection::vec(inner, 1..3), 1..3)
            .prop_map(|ands| TermNode::group(build(ands)))
    });
    prop::collection::vec(prop::collection::vec(term, 1..4), 1..4).prop_map(build)
}

/// A compiler that knows every key used in `tree`, each as a term on a same-named field.
fn compiler_for(tree: &OrNode) -> QueryCompiler {
    let mut keys = KeyTable::empty();
    for (key, _) in tree.leaves() {
        keys.insert(key, TermRule::new(key, ValueFormat::Keyword));
    }
    QueryCompiler::new(keys)
}

/// Asserts that no compiled node has a single clause.
fn assert_no_single_clause(query: &CompiledQuery) -> Result<(), TestCaseError> {
    match query {
        CompiledQuery::Filter(_) => Ok(()),
        CompiledQuery::MustAll(clauses) | CompiledQuery::ShouldAny { clauses, .. } => {
            prop_assert!(clauses.len() >= 2);
            clauses.iter().try_for_each(assert_no_single_clause)
        }
    }
}

proptest! {
    #[test]
    fn and_of_two_is_must_all_in_order(
        (k1, v1) in (key(), value()),
        (k2, v2) in (key(), value()),
    ) {
        let tree = parse(&format!("{k1}:{v1} AND {k2}:{v2}")).unwrap();
        let compiled = compiler_for(&tree).compile(&tree).unwrap();
        prop_assert_eq!(
            compiled,
            CompiledQuery::MustAll(vec![
                Filter::term(&k1, &v1).into(),
                Filter::term(&k2, &v2).into(),
            ])
        );
    }

    #[test]
    fn or_of_two_is_should_any(
        (k1, v1) in (key(), value()),
        (k2, v2) in (key(), value()),
    ) {
        let tree = parse(&format!("{k1}:{v1} OR {k2}:{v2}")).unwrap();
        let compiled = compiler_for(&tree).compile(&tree).unwrap();
        prop_assert_eq!(
            compiled,
            CompiledQuery::ShouldAny {
                clauses: vec![Filter::term(&k1, &v1).into(), Filter::term(&k2, &v2).into()],
                minimum_should_match: 1,
            }
        );
    }

    #[test]
    fn parentheses_are_transparent(tree in tree()) {
        let compiler = compiler_for(&tree);
        let grouped = parse(&format!("({})", tree.to_query_string())).unwrap();
        prop_assert_eq!(compiler.compile(&grouped).unwrap(), compiler.compile(&tree).unwrap());
    }

    #[test]
    fn compiling_twice_is_equal(tree in tree()) {
        let compiler = compiler_for(&tree);
        prop_assert_eq!(compiler.compile(&tree).unwrap(), compiler.compile(&tree).unwrap());
    }

    #[test]
    fn every_leaf_becomes_one_filter(tree in tree()) {
        let compiled = compiler_for(&tree).compile(&tree).unwrap();
        prop_assert_eq!(compiled.filter_count(), tree.leaves().len());
        assert_no_single_clause(&compiled)?;
    }

    #[test]
    fn unknown_key_is_reported(tree in tree()) {
        let leaves = tree.leaves();
        let missing = leaves[leaves.len() / 2].0.to_string();

        let mut compiler_keys = compiler_for(&tree).keys().clone();
        compiler_keys.remove(&missing);
        let err = QueryCompiler::new(compiler_keys).compile(&tree).unwrap_err();

        let is_missing = matches!(err, CompileError::UnknownKey { ref key, .. } if *key == missing);
        prop_assert!(is_missing);
    }
}
