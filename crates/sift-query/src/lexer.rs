//! Query lexer (tokenizer).
//!
//! Converts a query string into a sequence of tokens for the parser. Words are read
//! greedily over `[a-zA-Z0-9_-]` and classified afterwards, so `ANDROID` is a single key
//! rather than `AND` followed by `ROID`.

use std::{fmt, iter::Peekable, str::Chars};

use crate::error::LexError;

/// Punctuation characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Punct {
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `:`
    Colon,
}

impl Punct {
    /// Returns the source character for this punctuation.
    pub fn as_char(self) -> char {
        match self {
            Self::LParen => '(',
            Self::RParen => ')',
            Self::Colon => ':',
        }
    }
}

/// Boolean connective keywords.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Connective {
    /// `AND`
    And,
    /// `OR`
    Or,
}

impl Connective {
    /// Returns the keyword as written in queries.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::And => "AND",
            Self::Or => "OR",
        }
    }
}

/// The category of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// An identifier made of letters and underscores. May serve as a key or a value.
    Key,
    /// A word containing digits or `-`. Only valid in value position.
    Value,
    /// One of `(`, `)`, `:`.
    Punct(Punct),
    /// `AND` or `OR`.
    Connective(Connective),
}

/// A token in the query language.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Token {
    /// Token category.
    pub kind: TokenKind,
    /// The matched source text.
    pub text: String,
    /// Byte offset of the first character in the input.
    pub offset: usize,
}

impl Token {
    /// Creates a token.
    pub fn new(kind: TokenKind, text: impl Into<String>, offset: usize) -> Self {
        Self {
            kind,
            text: text.into(),
            offset,
        }
    }

    /// Byte offset just past the end of the token.
    pub fn end(&self) -> usize {
        self.offset + self.text.len()
    }

    /// Returns true if the token is the given punctuation.
    pub fn is_punct(&self, punct: Punct) -> bool {
        self.kind == TokenKind::Punct(punct)
    }

    /// Returns true if the token is the given connective.
    pub fn is_connective(&self, connective: Connective) -> bool {
        self.kind == TokenKind::Connective(connective)
    }

    /// Short description used in error messages.
    pub fn describe(&self) -> String {
        match self.kind {
            TokenKind::Key => format!("key `{}`", self.text),
            TokenKind::Value => format!("value `{}`", self.text),
            TokenKind::Punct(_) | TokenKind::Connective(_) => format!("`{}`", self.text),
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Key => write!(f, "Key"),
            Self::Value => write!(f, "Value"),
            Self::Punct(_) => write!(f, "Punct"),
            Self::Connective(_) => write!(f, "Connective"),
        }
    }
}

/// Returns true for characters that may appear in a key or value word.
fn is_word_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_' || ch == '-'
}

/// Returns true for characters that may appear in a key.
fn is_key_char(ch: char) -> bool {
    ch.is_ascii_alphabetic() || ch == '_'
}

/// Returns true if `name` would lex as a single key token.
///
/// Connective keywords are excluded, since they never lex as keys.
pub fn is_key_shaped(name: &str) -> bool {
    !name.is_empty() && name.chars().all(is_key_char) && name != "AND" && name != "OR"
}

/// Tokenizes a query string.
struct Lexer<'a> {
    /// The original input string.
    input: &'a str,
    /// Character iterator with one-character lookahead.
    chars: Peekable<Chars<'a>>,
    /// Current byte position in input.
    position: usize,
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer for the given input.
    fn new(input: &'a str) -> Self {
        Self {
            input,
            chars: input.chars().peekable(),
            position: 0,
        }
    }

    /// Tokenizes the entire input, returning all tokens or the first error.
    fn tokenize(mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();

        while let Some(token) = self.next_token()? {
            tokens.push(token);
        }

        Ok(tokens)
    }

    /// Returns the next token, or None if at end of input.
    fn next_token(&mut self) -> Result<Option<Token>, LexError> {
        self.skip_whitespace();

        let Some(&ch) = self.chars.peek() else {
            return Ok(None);
        };

        let token = match ch {
            '(' => self.read_punct(Punct::LParen),
            ')' => self.read_punct(Punct::RParen),
            ':' => self.read_punct(Punct::Colon),
            c if is_word_char(c) => self.read_word(),
            other => return Err(LexError::new(self.position, other)),
        };

        Ok(Some(token))
    }

    /// Reads a single punctuation character.
    fn read_punct(&mut self, punct: Punct) -> Token {
        let start = self.position;
        self.advance();
        Token::new(
            TokenKind::Punct(punct),
            punct.as_char().to_string(),
            start,
        )
    }

    /// Reads the longest run of word characters and classifies it.
    fn read_word(&mut self) -> Token {
        let start = self.position;

        while let Some(&ch) = self.chars.peek() {
            if !is_word_char(ch) {
                break;
            }
            self.advance();
        }

        let text = &self.input[start..self.position];
        let kind = match text {
            "AND" => TokenKind::Connective(Connective::And),
            "OR" => TokenKind::Connective(Connective::Or),
            word if word.chars().all(is_key_char) => TokenKind::Key,
            _ => TokenKind::Value,
        };

        Token::new(kind, text, start)
    }

    /// Skips whitespace characters.
    fn skip_whitespace(&mut self) {
        while let Some(&ch) = self.chars.peek() {
            if ch.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    /// Advances to the next character.
    fn advance(&mut self) {
        if let Some(ch) = self.chars.next() {
            self.position += ch.len_utf8();
        }
    }
}

/// Tokenizes a query string.
pub fn tokenize(input: &str) -> Result<Vec<Token>, LexError> {
    Lexer::new(input).tokenize()
}
