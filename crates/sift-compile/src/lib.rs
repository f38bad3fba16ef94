//! Compilation of sift filter queries into boolean backend query trees.
//!
//! Each `key:value` leaf is resolved through a [`KeyTable`] to a [`Filter`]; `AND` and
//! `OR` become [`CompiledQuery::MustAll`] and [`CompiledQuery::ShouldAny`]. The resulting
//! tree renders to the backend's JSON query DSL.
//!
//! # Example
//!
//! ```
//! use sift_compile::{CompiledQuery, QueryCompiler};
//!
//! let compiler = QueryCompiler::default();
//! let query = compiler.compile_str("since:2021 AND until:2022").unwrap();
//! assert!(matches!(query, CompiledQuery::MustAll(ref clauses) if clauses.len() == 2));
//! assert_eq!(query.to_json()["bool"]["filter"][0]["range"]["createdAt"]["from"], "2021");
//! ```

#![warn(missing_docs)]

mod compile;
mod error;
mod query;
mod rules;
mod table;

pub use compile::QueryCompiler;
pub use error::CompileError;
pub use query::{Bound, CompiledQuery, Filter, RangeFilter};
pub use rules::{KeyRule, RangeRule, TermRule, check_value};
use sift_query::QueryError;
pub use table::{CREATED_AT, KeySource, KeySummary, KeyTable};

/// Parses and compiles a query string against the built-in keys.
pub fn compile_query(input: &str) -> Result<CompiledQuery, QueryError> {
    QueryCompiler::default().compile_str(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_types_are_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<QueryCompiler>();
        assert_send_sync::<KeyTable>();
        assert_send_sync::<CompiledQuery>();
        assert_send_sync::<CompileError>();
        assert_send_sync::<QueryError>();
    }

    #[test]
    fn compile_query_uses_builtins() {
        assert_eq!(
            compile_query("until:2021-12-31").unwrap(),
            CompiledQuery::Filter(Filter::upper(CREATED_AT, Bound::inclusive("2021-12-31")))
        );
        assert!(compile_query("author:x").is_err());
    }
}
