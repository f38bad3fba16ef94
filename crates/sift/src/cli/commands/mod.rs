//! Command implementations and dispatch.

pub mod check;
pub mod compile;
pub mod config;
pub mod init;
pub mod keys;
pub mod parse;
pub mod tokens;

use std::process::ExitCode;

use super::{args::Commands, context::CommandContext};

/// Dispatches to the selected subcommand.
pub fn run(command: Commands, ctx: &CommandContext) -> ExitCode {
    match command {
        Commands::Tokens(cmd) => tokens::run(ctx, &cmd),
        Commands::Parse(cmd) => parse::run(ctx, &cmd),
        Commands::Compile(cmd) => compile::run(ctx, &cmd),
        Commands::Keys(cmd) => keys::run(ctx, &cmd),
        Commands::Init(cmd) => init::run(ctx, &cmd),
        Commands::Check => check::run(ctx),
        Commands::Config => config::run(ctx),
    }
}

/// Returns true for commands that must run even when configuration fails to load.
pub fn skips_config(command: &Commands) -> bool {
    matches!(
        command,
        Commands::Tokens(_) | Commands::Init(_) | Commands::Check
    )
}
