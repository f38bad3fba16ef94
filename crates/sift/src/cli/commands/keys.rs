//! Implementation of `sift keys`.

use std::process::ExitCode;

use comfy_table::{Cell, Table, presets::UTF8_FULL_CONDENSED};
use sift_highlight::dim;

use crate::cli::{
    args::KeysCommand,
    context::CommandContext,
    output::{print_json, styled},
};

/// Lists the effective key table.
pub fn run(ctx: &CommandContext, cmd: &KeysCommand) -> ExitCode {
    let compiler = match ctx.compiler() {
        Ok(compiler) => compiler,
        Err(code) => return code,
    };
    let summaries = compiler.keys().summaries();

    if cmd.json {
        return print_json(ctx.color, &summaries, true);
    }

    if summaries.is_empty() {
        println!("{}", styled(ctx.color, dim, "No keys defined."));
        return ExitCode::SUCCESS;
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(vec!["Key", "Rule", "Filter", "Value", "Source"]);
    for summary in &summaries {
        table.add_row(vec![
            Cell::new(&summary.name),
            Cell::new(summary.rule),
            Cell::new(&summary.filter),
            Cell::new(summary.value),
            Cell::new(&summary.source),
        ]);
    }
    println!("{table}");
    ExitCode::SUCCESS
}
