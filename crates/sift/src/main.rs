//! Command-line interface for the `sift` filter query language.

use std::process::ExitCode;

use clap::Parser;
use log::LevelFilter;
use sift::cli::{
    CommandContext,
    args::Cli,
    commands::{self, skips_config},
};

fn main() -> ExitCode {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    let ctx = if skips_config(&cli.command) {
        CommandContext::load_cwd_only(cli.color)
    } else {
        CommandContext::load(cli.color)
    };

    match ctx {
        Ok(ctx) => commands::run(cli.command, &ctx),
        Err(code) => code,
    }
}

/// Initializes logging at a level chosen by `-v` count; `RUST_LOG` takes precedence.
fn setup_logging(verbosity: u8) {
    let level = match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .init();
}
