//! Shared context for running CLI commands.

use std::{
    env,
    io::{self, IsTerminal},
    path::{Path, PathBuf},
    process::ExitCode,
};

use sift_compile::QueryCompiler;
use sift_config::Config;

use crate::cli::args::ColorMode;

/// Command execution context built once per CLI invocation.
pub struct CommandContext {
    /// Current working directory.
    pub cwd: PathBuf,
    /// Loaded configuration (default if no config files were found).
    pub config: Config,
    /// Whether output should be colored.
    pub color: bool,
}

impl CommandContext {
    /// Loads the current directory and configuration.
    pub fn load(color: ColorMode) -> Result<Self, ExitCode> {
        let cwd = current_dir_or_failure()?;
        let config = load_config_or_failure(&cwd)?;
        Ok(Self {
            cwd,
            config,
            color: use_color(color),
        })
    }

    /// Loads only the current directory, skipping configuration parsing.
    ///
    /// Used by commands like `init` and `check` that must work even when an existing
    /// config file is invalid.
    pub fn load_cwd_only(color: ColorMode) -> Result<Self, ExitCode> {
        let cwd = current_dir_or_failure()?;
        Ok(Self {
            cwd,
            config: Config::default(),
            color: use_color(color),
        })
    }

    /// Builds the query compiler described by the configuration.
    pub fn compiler(&self) -> Result<QueryCompiler, ExitCode> {
        QueryCompiler::from_config(&self.config).map_err(|e| {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        })
    }
}

/// Resolves the color mode against the environment.
fn use_color(mode: ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => env::var_os("NO_COLOR").is_none() && io::stdout().is_terminal(),
    }
}

/// Returns the current working directory or exits with a consistent error.
fn current_dir_or_failure() -> Result<PathBuf, ExitCode> {
    env::current_dir().map_err(|e| {
        eprintln!("error: could not determine current directory: {e}");
        ExitCode::FAILURE
    })
}

/// Loads configuration from the provided directory or exits with an error.
fn load_config_or_failure(cwd: &Path) -> Result<Config, ExitCode> {
    Config::load(cwd).map_err(|e| {
        eprintln!("error: failed to load configuration: {e}");
        ExitCode::FAILURE
    })
}
