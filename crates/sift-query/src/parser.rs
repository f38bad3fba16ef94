//! Query parser.
//!
//! Parses a token sequence into a query AST using recursive descent.
//!
//! # Grammar
//!
//! ```text
//! or_expr  → and_expr ("OR" and_expr)*
//! and_expr → term ("AND" term)*
//! term     → leaf | "(" or_expr ")"
//! leaf     → KEY ":" (VALUE | KEY)
//! ```
//!
//! # Precedence (highest to lowest)
//!
//! 1. Grouping: `(...)`
//! 2. AND
//! 3. OR
//!
//! The whole token sequence must be consumed; anything left over after a complete
//! expression is a syntax error.

use log::trace;

use crate::{
    ast::{AndNode, OrNode, TermNode},
    error::{ParseError, QueryError},
    lexer::{Connective, Punct, Token, TokenKind, tokenize},
};

/// Default limit on parenthesis nesting.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Hard ceiling on parenthesis nesting.
///
/// A larger `max_depth` is lowered to this value, keeping the recursion well
/// inside the stack of any thread.
pub const MAX_DEPTH_LIMIT: usize = 128;

/// Options controlling a parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Maximum parenthesis nesting before the parse fails with a depth error.
    ///
    /// Values above [`MAX_DEPTH_LIMIT`] behave as [`MAX_DEPTH_LIMIT`].
    pub max_depth: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Recursive descent parser for query expressions.
struct Parser {
    /// Token sequence to parse.
    tokens: Vec<Token>,
    /// Current position in the token sequence.
    position: usize,
    /// Current parenthesis nesting.
    depth: usize,
    /// Nesting limit.
    max_depth: usize,
    /// Byte offset reported for errors at end of input.
    end_offset: usize,
}

impl Parser {
    /// Creates a new parser from a token sequence.
    fn new(tokens: Vec<Token>, options: &ParseOptions) -> Self {
        let end_offset = tokens.last().map_or(0, Token::end);
        Self {
            tokens,
            position: 0,
            depth: 0,
            max_depth: options.max_depth.min(MAX_DEPTH_LIMIT),
            end_offset,
        }
    }

    /// Overrides the offset used for end-of-input errors.
    fn with_end_offset(mut self, end_offset: usize) -> Self {
        self.end_offset = end_offset;
        self
    }

    /// Parses the token sequence into a tree, requiring every token to be consumed.
    fn parse(mut self) -> Result<OrNode, ParseError> {
        let tree = self.parse_or_expr()?;

        if self.peek().is_some() {
            return Err(self.unexpected("`AND`, `OR` or end of input"));
        }

        Ok(tree)
    }

    /// Parses: or_expr → and_expr ("OR" and_expr)*
    fn parse_or_expr(&mut self) -> Result<OrNode, ParseError> {
        let mut node = OrNode::new(self.parse_and_expr()?);

        while self.check_connective(Connective::Or) {
            trace!("OR at token {}", self.position);
            self.advance();
            node.push(self.parse_and_expr()?);
        }

        Ok(node)
    }

    /// Parses: and_expr → term ("AND" term)*
    fn parse_and_expr(&mut self) -> Result<AndNode, ParseError> {
        let mut node = AndNode::new(self.parse_term()?);

        while self.check_connective(Connective::And) {
            trace!("AND at token {}", self.position);
            self.advance();
            node.push(self.parse_term()?);
        }

        Ok(node)
    }

    /// Parses: term → leaf | "(" or_expr ")"
    fn parse_term(&mut self) -> Result<TermNode, ParseError> {
        match self.peek().map(|t| t.kind) {
            Some(TokenKind::Punct(Punct::LParen)) => self.parse_group(),
            Some(TokenKind::Key) => self.parse_leaf(),
            _ => Err(self.unexpected("key or `(`")),
        }
    }

    /// Parses a parenthesized group, consuming the surrounding parentheses.
    fn parse_group(&mut self) -> Result<TermNode, ParseError> {
        let open_offset = self.current_offset();
        self.advance(); // consume (

        self.depth += 1;
        if self.depth > self.max_depth {
            return Err(ParseError::DepthExceeded {
                offset: open_offset,
                limit: self.max_depth,
            });
        }
        trace!("enter group at offset {open_offset} (depth {})", self.depth);

        let inner = self.parse_or_expr()?;

        if !self.check_punct(Punct::RParen) {
            return Err(self.unexpected(format!(
                "`AND`, `OR` or `)` closing the group at offset {open_offset}"
            )));
        }
        self.advance(); // consume )
        self.depth -= 1;

        Ok(TermNode::group(inner))
    }

    /// Parses: leaf → KEY ":" (VALUE | KEY)
    fn parse_leaf(&mut self) -> Result<TermNode, ParseError> {
        let key = self.take_text();

        if !self.check_punct(Punct::Colon) {
            return Err(self.unexpected(format!("`:` after key `{key}`")));
        }
        self.advance(); // consume :

        match self.peek().map(|t| t.kind) {
            Some(TokenKind::Value | TokenKind::Key) => {
                let value = self.take_text();
                trace!("leaf {key}:{value}");
                Ok(TermNode::leaf(key, value))
            }
            _ => Err(self.unexpected(format!("value after `{key}:`"))),
        }
    }

    /// Builds a syntax error describing the current token.
    fn unexpected(&self, expected: impl Into<String>) -> ParseError {
        let found = self
            .peek()
            .map_or_else(|| "end of input".to_string(), Token::describe);
        ParseError::syntax(self.current_offset(), expected, found)
    }

    /// Byte offset of the current token, or the end offset when exhausted.
    fn current_offset(&self) -> usize {
        self.peek().map_or(self.end_offset, |t| t.offset)
    }

    /// Consumes the current token and returns its text.
    fn take_text(&mut self) -> String {
        let text = self
            .peek()
            .map(|t| t.text.clone())
            .unwrap_or_default();
        self.advance();
        text
    }

    /// Returns the current token without consuming it.
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.position)
    }

    /// Checks if the current token is the given punctuation.
    fn check_punct(&self, punct: Punct) -> bool {
        self.peek().is_some_and(|t| t.is_punct(punct))
    }

    /// Checks if the current token is the given connective.
    fn check_connective(&self, connective: Connective) -> bool {
        self.peek().is_some_and(|t| t.is_connective(connective))
    }

    /// Advances to the next token.
    fn advance(&mut self) {
        if self.position < self.tokens.len() {
            self.position += 1;
        }
    }
}

/// Parses a token sequence into an AST.
pub fn parse_tokens(tokens: Vec<Token>, options: &ParseOptions) -> Result<OrNode, ParseError> {
    Parser::new(tokens, options).parse()
}

/// Parses a query string into an AST with default options.
pub fn parse(input: &str) -> Result<OrNode, QueryError> {
    parse_with(input, &ParseOptions::default())
}

/// Parses a query string into an AST.
///
/// Errors carry the input so they render with a position indicator.
pub fn parse_with(input: &str, options: &ParseOptions) -> Result<OrNode, QueryError> {
    let tokens = tokenize(input).map_err(|e| QueryError::from(e).with_query(input))?;
    Parser::new(tokens, options)
        .with_end_offset(input.len())
        .parse()
        .map_err(|e| QueryError::from(e).with_query(input))
}
