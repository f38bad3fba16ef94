//! Clap argument definitions for the `sift` CLI.

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};

/// Top-level CLI options.
#[derive(Parser)]
#[command(name = "sift", version)]
#[command(about = "Boolean filter queries compiled to search backend queries")]
pub struct Cli {
    /// Log verbosity (-v info, -vv debug, -vvv trace); RUST_LOG overrides
    #[arg(short = 'v', long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// When to use colors
    #[arg(long, value_enum, default_value_t = ColorMode::Auto, global = true)]
    pub color: ColorMode,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// When terminal colors are used.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorMode {
    /// Color when stdout is a terminal and NO_COLOR is unset.
    Auto,
    /// Always color.
    Always,
    /// Never color.
    Never,
}

/// Supported `sift` subcommands.
#[derive(Subcommand)]
pub enum Commands {
    /// Show the tokens a query lexes into
    Tokens(TokensCommand),

    /// Show the syntax tree of a query
    Parse(ParseCommand),

    /// Compile a query into a backend JSON query
    Compile(CompileCommand),

    /// List the keys queries may use
    Keys(KeysCommand),

    /// Initialize sift configuration in the current directory
    Init(InitCommand),

    /// Validate configuration and diagnose issues
    Check,

    /// Show effective configuration
    Config,
}

/// Arguments for `sift tokens`.
#[derive(Args, Debug, Clone)]
pub struct TokensCommand {
    /// Query to lex
    pub query: String,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Arguments for `sift parse`.
#[derive(Args, Debug, Clone)]
pub struct ParseCommand {
    /// Query to parse
    pub query: String,

    /// Print the canonical query text instead of the tree
    #[arg(long)]
    pub canonical: bool,
}

/// Arguments for `sift compile`.
#[derive(Args, Debug, Clone)]
pub struct CompileCommand {
    /// Query to compile
    pub query: String,

    /// Print the JSON on a single line
    #[arg(long, conflicts_with = "explain")]
    pub compact: bool,

    /// Show the query, syntax tree and compiled tree alongside the JSON
    #[arg(long)]
    pub explain: bool,
}

/// Arguments for `sift keys`.
#[derive(Args, Debug, Clone)]
pub struct KeysCommand {
    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Arguments for `sift init`.
#[derive(Args, Debug, Clone)]
pub struct InitCommand {
    /// Create global ~/.sift.toml instead
    #[arg(long)]
    pub global: bool,

    /// Overwrite existing configuration file
    #[arg(long)]
    pub force: bool,
}
