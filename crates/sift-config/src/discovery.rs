//! Configuration file discovery.
//!
//! A query's keys can come from several `.sift.toml` files: one per ancestor
//! directory, plus a global file in the home directory.

use std::path::{Path, PathBuf};

use directories::BaseDirs;

use crate::parse::is_root_config;

/// Name of a configuration file.
pub const CONFIG_FILENAME: &str = ".sift.toml";

/// Discovers the configuration files that apply to `cwd`.
///
/// Paths come back closest first. The walk ends at the first file marked
/// `root = true`; otherwise `~/.sift.toml` is appended as the lowest-precedence
/// layer, unless the walk already picked it up.
pub fn discover_config_files(cwd: &Path) -> Vec<PathBuf> {
    let mut configs = Vec::new();

    for candidate in cwd.ancestors().map(|dir| dir.join(CONFIG_FILENAME)) {
        if !candidate.is_file() {
            continue;
        }
        let stop = is_root_config(&candidate);
        configs.push(candidate);
        if stop {
            return configs;
        }
    }

    if let Some(global) = existing_global_config()
        && !configs.contains(&global)
    {
        configs.push(global);
    }

    configs
}

/// Path of `~/.sift.toml`, or `None` when no home directory is known.
pub fn global_config_path() -> Option<PathBuf> {
    let dirs = BaseDirs::new()?;
    Some(dirs.home_dir().join(CONFIG_FILENAME))
}

/// The global configuration file, if it exists on disk.
fn existing_global_config() -> Option<PathBuf> {
    global_config_path().filter(|path| path.is_file())
}

/// True when `path` names the global configuration file.
pub fn is_global_config(path: &Path) -> bool {
    global_config_path().as_deref() == Some(path)
}
