//! Implementation of `sift parse`.

use std::process::ExitCode;

use sift_query::{ParseOptions, parse_with};

use crate::cli::{
    args::ParseCommand,
    context::CommandContext,
    output::{query_text, report_query_error},
};

/// Prints the syntax tree of a query, or its canonical text.
pub fn run(ctx: &CommandContext, cmd: &ParseCommand) -> ExitCode {
    let options = ParseOptions {
        max_depth: ctx.config.settings.max_depth,
    };
    let tree = match parse_with(&cmd.query, &options) {
        Ok(tree) => tree,
        Err(e) => return report_query_error(ctx.color, &e),
    };

    if cmd.canonical {
        println!("{}", query_text(ctx.color, &tree.to_query_string()));
    } else {
        print!("{tree}");
    }
    ExitCode::SUCCESS
}
