//! Rendering helpers shared by the commands.

use std::process::ExitCode;

use serde::Serialize;
use sift_highlight::{Highlighter, error, highlight_query};
use sift_query::QueryError;

/// Applies a style function only when color is enabled.
pub fn styled(color: bool, style: fn(&str) -> String, text: &str) -> String {
    if color { style(text) } else { text.to_string() }
}

/// Renders query text, colored by token kind when color is enabled.
pub fn query_text(color: bool, query: &str) -> String {
    if color {
        highlight_query(query)
    } else {
        query.to_string()
    }
}

/// Reports a query error on stderr, with the caret rendering and hint.
pub fn report_query_error(color: bool, err: &QueryError) -> ExitCode {
    eprintln!("{} {err}", styled(color, error, "error:"));
    ExitCode::FAILURE
}

/// Serializes a value as JSON to stdout.
///
/// Pretty output is syntax highlighted when color is enabled.
pub fn print_json<T: Serialize + ?Sized>(color: bool, value: &T, pretty: bool) -> ExitCode {
    let rendered = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };

    match rendered {
        Ok(json) if pretty && color => {
            println!("{}", Highlighter::new().highlight_json(&json));
            ExitCode::SUCCESS
        }
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: failed to serialize JSON: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Indents every line of `content` by two spaces.
pub fn indent(content: &str) -> String {
    content
        .lines()
        .map(|line| {
            if line.is_empty() {
                String::new()
            } else {
                format!("  {line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
