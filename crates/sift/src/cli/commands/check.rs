//! Implementation of `sift check`.

use std::process::ExitCode;

use sift_compile::KeyTable;
use sift_config::{Config, ConfigWarning, discover_config_files};
use sift_highlight::{success, warning};

use crate::cli::{context::CommandContext, output::styled};

/// Exit codes for `sift check`.
mod exit_codes {
    use std::process::ExitCode;

    /// Configuration is valid with no warnings.
    pub const OK: ExitCode = ExitCode::SUCCESS;
    /// Configuration has warnings but is usable.
    pub const WARNINGS: ExitCode = ExitCode::FAILURE;
    /// Configuration has errors and cannot be used.
    pub const ERROR: ExitCode = ExitCode::FAILURE;
}

/// Loads and validates configuration, reporting problems.
pub fn run(ctx: &CommandContext) -> ExitCode {
    let config_files = discover_config_files(&ctx.cwd);

    println!("Checking configuration...");
    println!();

    if config_files.is_empty() {
        println!("No configuration files found; using built-in keys.");
        println!();
        println!("Run 'sift init' to create a configuration file.");
        return exit_codes::OK;
    }

    println!("Config files:");
    for path in &config_files {
        println!("  {}", path.display());
    }
    println!();

    let config = match Config::load_from_files(&config_files) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {e}");
            return exit_codes::ERROR;
        }
    };

    let keys = match KeyTable::from_config(&config) {
        Ok(keys) => keys,
        Err(e) => {
            eprintln!("error: {e}");
            return exit_codes::ERROR;
        }
    };

    println!("Keys:");
    if keys.is_empty() {
        println!("  (none)");
    } else {
        for summary in keys.summaries() {
            println!("  {} -> {} [{}]", summary.name, summary.filter, summary.source);
        }
    }
    println!("Max depth: {}", config.settings.max_depth);
    println!();

    let warnings = config.validate();
    if warnings.is_empty() {
        println!("{}", styled(ctx.color, success, "No issues found."));
        return exit_codes::OK;
    }

    println!(
        "{}",
        styled(ctx.color, warning, &format!("Warnings ({}):", warnings.len()))
    );
    for w in &warnings {
        println!("  - {w}");
    }
    println!();

    print_hints(&warnings);

    exit_codes::WARNINGS
}

/// Prints hints for resolving common warnings.
fn print_hints(warnings: &[ConfigWarning]) {
    let mut hints: Vec<&str> = warnings
        .iter()
        .map(|w| match w {
            ConfigWarning::KeyNotQueryable { .. } => {
                "Rename the key using only letters and '_'; AND and OR are reserved."
            }
            ConfigWarning::EmptyField { .. } => "Set `field` to the backend field to filter on.",
            ConfigWarning::BoundIgnored { .. } => {
                "Remove `bound` from term rules, or change the rule to \"range\"."
            }
            ConfigWarning::NoKeysDefined => {
                "Add [keys.<name>] tables, or set builtin_keys = true."
            }
        })
        .collect();

    hints.sort_unstable();
    hints.dedup();

    if !hints.is_empty() {
        println!("Hints:");
        for hint in hints {
            println!("  - {hint}");
        }
    }
}
