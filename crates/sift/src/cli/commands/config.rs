//! Implementation of `sift config`.

use std::process::ExitCode;

use sift_highlight::{Highlighter, dim};

use crate::cli::{context::CommandContext, output::styled};

/// Shows the effective settings and configured keys.
pub fn run(ctx: &CommandContext) -> ExitCode {
    let config = &ctx.config;

    let toml = match config.settings_to_toml() {
        Ok(toml) => toml,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    if config.files.is_empty() {
        println!("{}", styled(ctx.color, dim, "# no configuration files found; defaults shown"));
    } else {
        for path in &config.files {
            println!("{}", styled(ctx.color, dim, &format!("# {}", path.display())));
        }
    }

    if ctx.color {
        print!("{}", Highlighter::new().highlight_toml(&toml));
    } else {
        print!("{toml}");
    }
    ExitCode::SUCCESS
}
