//! Lexer, parser and AST for the sift filter query language.
//!
//! Queries are boolean combinations of `key:value` filter terms:
//!
//! - **Leaves**: `since:2021-01-01` - a key and the value to filter on
//! - **AND**: `since:2021 AND until:2022` - both must hold
//! - **OR**: `since:2021 OR until:2019` - at least one must hold
//! - **Grouping**: `(a:1 OR b:2) AND c:3` - precedence control
//!
//! `AND` binds tighter than `OR`. Connectives are case-sensitive.
//!
//! # Example
//!
//! ```
//! use sift_query::parse;
//!
//! let tree = parse("since:2021 AND (since:2023 OR until:2024)").unwrap();
//! assert_eq!(tree.operands().len(), 1);
//! assert_eq!(tree.operands()[0].operands().len(), 2);
//! ```

#![warn(missing_docs)]

mod ast;
mod error;
mod lexer;
mod parser;

pub use ast::{AndNode, OrNode, TermNode};
pub use error::{LexError, ParseError, QueryError, QueryErrorKind};
pub use lexer::{Connective, Punct, Token, TokenKind, is_key_shaped, tokenize};
pub use parser::{
    DEFAULT_MAX_DEPTH, MAX_DEPTH_LIMIT, ParseOptions, parse, parse_tokens, parse_with,
};
