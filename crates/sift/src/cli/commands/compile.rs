//! Implementation of `sift compile`.

use std::process::ExitCode;

use sift_highlight::{header, subheader};
use sift_query::{QueryError, parse_with};

use crate::cli::{
    args::CompileCommand,
    context::CommandContext,
    output::{indent, print_json, query_text, report_query_error, styled},
};

/// Compiles a query and prints the backend JSON.
pub fn run(ctx: &CommandContext, cmd: &CompileCommand) -> ExitCode {
    let compiler = match ctx.compiler() {
        Ok(compiler) => compiler,
        Err(code) => return code,
    };

    let tree = match parse_with(&cmd.query, compiler.parse_options()) {
        Ok(tree) => tree,
        Err(e) => return report_query_error(ctx.color, &e),
    };
    let compiled = match compiler.compile(&tree) {
        Ok(compiled) => compiled,
        Err(e) => {
            let err = QueryError::from(e).with_query(cmd.query.as_str());
            return report_query_error(ctx.color, &err);
        }
    };

    if cmd.explain {
        println!("{}", styled(ctx.color, header, "Query"));
        println!("  {}", query_text(ctx.color, &cmd.query));
        println!();
        println!("{}", styled(ctx.color, subheader, "Syntax tree:"));
        println!("{}", indent(&tree.to_string()));
        println!();
        println!("{}", styled(ctx.color, subheader, "Compiled:"));
        println!("{}", indent(&compiled.to_string()));
        println!();
        println!("{}", styled(ctx.color, subheader, "Backend query:"));
    }

    print_json(ctx.color, &compiled.to_json(), !cmd.compact)
}
