//! Syntax highlighting and terminal colors for sift.
//!
//! Highlights the JSON and TOML that sift prints, colors query text by token kind, and
//! provides small helpers for styled headers and status messages.

#![warn(missing_docs)]

use sift_query::{TokenKind, tokenize};
use syntect::{
    easy::HighlightLines,
    highlighting::Style,
    parsing::SyntaxSet,
    util::{LinesWithEndings, as_24_bit_terminal_escaped},
};
use two_face::{
    syntax::extra_newlines as extra_syntaxes,
    theme::{EmbeddedLazyThemeSet, EmbeddedThemeName, extra as extra_themes},
};

/// A syntax highlighter for terminal output.
pub struct Highlighter {
    /// Language definitions, including JSON and TOML.
    syntax_set: SyntaxSet,
    /// Color themes.
    theme_set: EmbeddedLazyThemeSet,
    /// The theme in use.
    theme: EmbeddedThemeName,
}

impl Default for Highlighter {
    fn default() -> Self {
        Self::new()
    }
}

impl Highlighter {
    /// Creates a highlighter with the default theme (Dracula).
    pub fn new() -> Self {
        Self {
            syntax_set: extra_syntaxes(),
            theme_set: extra_themes(),
            theme: EmbeddedThemeName::Dracula,
        }
    }

    /// Highlights JSON, such as a compiled backend query.
    pub fn highlight_json(&self, content: &str) -> String {
        self.highlight(content, "json")
    }

    /// Highlights TOML configuration.
    pub fn highlight_toml(&self, content: &str) -> String {
        self.highlight(content, "toml")
    }

    /// Highlights content with the named syntax (an extension or a syntax name).
    ///
    /// Unknown syntaxes fall back to plain text.
    pub fn highlight(&self, content: &str, syntax_name: &str) -> String {
        let syntax = self
            .syntax_set
            .find_syntax_by_extension(syntax_name)
            .or_else(|| self.syntax_set.find_syntax_by_name(syntax_name))
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text());

        let theme = self.theme_set.get(self.theme);
        let mut highlighter = HighlightLines::new(syntax, theme);

        let mut output = String::new();
        for line in LinesWithEndings::from(content) {
            let ranges: Vec<(Style, &str)> = highlighter
                .highlight_line(line, &self.syntax_set)
                .unwrap_or_else(|_| vec![(Style::default(), line)]);
            output.push_str(&as_24_bit_terminal_escaped(&ranges[..], false));
        }
        output.push_str(colors::RESET);
        output
    }
}

/// ANSI color codes for terminal output.
pub mod colors {
    /// Bold text.
    pub const BOLD: &str = "\x1b[1m";
    /// Cyan text (headers, query keys).
    pub const CYAN: &str = "\x1b[36m";
    /// Green text (success, query values).
    pub const GREEN: &str = "\x1b[32m";
    /// Yellow text (warnings).
    pub const YELLOW: &str = "\x1b[33m";
    /// Magenta text (query connectives).
    pub const MAGENTA: &str = "\x1b[35m";
    /// Red text (errors).
    pub const RED: &str = "\x1b[31m";
    /// Dim text.
    pub const DIM: &str = "\x1b[2m";
    /// Reset all formatting.
    pub const RESET: &str = "\x1b[0m";
}

/// Wraps text in the given style codes.
fn paint(codes: &str, text: &str) -> String {
    format!("{codes}{text}{}", colors::RESET)
}

/// Formats a header in bold cyan.
pub fn header(text: &str) -> String {
    paint(&format!("{}{}", colors::BOLD, colors::CYAN), text)
}

/// Formats a subheader in bold.
pub fn subheader(text: &str) -> String {
    paint(colors::BOLD, text)
}

/// Formats less important text.
pub fn dim(text: &str) -> String {
    paint(colors::DIM, text)
}

/// Formats a success message in green.
pub fn success(text: &str) -> String {
    paint(colors::GREEN, text)
}

/// Formats a warning in yellow.
pub fn warning(text: &str) -> String {
    paint(colors::YELLOW, text)
}

/// Formats an error in red.
pub fn error(text: &str) -> String {
    paint(colors::RED, text)
}

/// Returns a dimmed horizontal rule.
pub fn rule(width: usize) -> String {
    dim(&"\u{2500}".repeat(width))
}

/// Colors a query by token kind: keys cyan, values green, connectives bold magenta,
/// punctuation dim.
///
/// Text between tokens is kept as written. A query that does not lex is returned
/// unchanged.
pub fn highlight_query(query: &str) -> String {
    let Ok(tokens) = tokenize(query) else {
        return query.to_string();
    };

    let mut output = String::with_capacity(query.len() * 2);
    let mut position = 0;
    for token in &tokens {
        output.push_str(&query[position..token.offset]);
        let styled = match token.kind {
            TokenKind::Key => paint(colors::CYAN, &token.text),
            TokenKind::Value => paint(colors::GREEN, &token.text),
            TokenKind::Connective(_) => {
                paint(&format!("{}{}", colors::BOLD, colors::MAGENTA), &token.text)
            }
            TokenKind::Punct(_) => dim(&token.text),
        };
        output.push_str(&styled);
        position = token.end();
    }
    output.push_str(&query[position..]);
    output
}

/// Removes ANSI escape sequences, leaving the plain text.
pub fn strip_ansi(text: &str) -> String {
    let mut output = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c == '\x1b' {
            for next in chars.by_ref() {
                if next.is_ascii_alphabetic() {
                    break;
                }
            }
        } else {
            output.push(c);
        }
    }
    output
}
