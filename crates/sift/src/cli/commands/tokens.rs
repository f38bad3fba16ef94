//! Implementation of `sift tokens`.

use std::process::ExitCode;

use comfy_table::{Table, presets::UTF8_FULL_CONDENSED};
use serde::Serialize;
use sift_query::{QueryError, Token, TokenKind, tokenize};

use crate::cli::{
    args::TokensCommand,
    context::CommandContext,
    output::{print_json, report_query_error},
};

/// JSON form of a token.
#[derive(Serialize)]
struct JsonToken<'a> {
    /// Token category: `key`, `value`, `punct` or `connective`.
    kind: &'static str,
    /// Matched text.
    text: &'a str,
    /// Byte offset of the first character.
    offset: usize,
}

/// Short name of a token's category.
fn kind_name(token: &Token) -> &'static str {
    match token.kind {
        TokenKind::Key => "key",
        TokenKind::Value => "value",
        TokenKind::Punct(_) => "punct",
        TokenKind::Connective(_) => "connective",
    }
}

/// Prints the tokens a query lexes into.
pub fn run(ctx: &CommandContext, cmd: &TokensCommand) -> ExitCode {
    let tokens = match tokenize(&cmd.query) {
        Ok(tokens) => tokens,
        Err(e) => {
            let err = QueryError::from(e).with_query(cmd.query.as_str());
            return report_query_error(ctx.color, &err);
        }
    };

    if cmd.json {
        let json: Vec<JsonToken<'_>> = tokens
            .iter()
            .map(|token| JsonToken {
                kind: kind_name(token),
                text: &token.text,
                offset: token.offset,
            })
            .collect();
        return print_json(ctx.color, &json, true);
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(vec!["Offset", "Kind", "Text"]);
    for token in &tokens {
        table.add_row(vec![
            token.offset.to_string(),
            kind_name(token).to_string(),
            token.text.clone(),
        ]);
    }
    println!("{table}");
    ExitCode::SUCCESS
}
