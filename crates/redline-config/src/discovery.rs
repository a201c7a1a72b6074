//! Configuration file discovery.
//!
//! Walks from a starting directory towards the filesystem root collecting `.redline.toml`
//! files, then appends the global `~/.redline.toml`.

use std::path::{Path, PathBuf};

use directories::BaseDirs;
use tracing::debug;

use crate::parse::is_root_config;

/// The configuration filename.
pub const CONFIG_FILENAME: &str = ".redline.toml";

/// Discovers all configuration files that apply to `cwd`.
///
/// Returns paths highest precedence first: the file closest to `cwd` leads, the global file
/// comes last. A file with `root = true` ends the walk, and the global file is then skipped.
pub fn discover_config_files(cwd: &Path) -> Vec<PathBuf> {
    let mut configs = Vec::new();

    for dir in cwd.ancestors() {
        let candidate = dir.join(CONFIG_FILENAME);
        if !candidate.is_file() {
            continue;
        }
        let is_root = is_root_config(&candidate);
        debug!(path = %candidate.display(), is_root, "found config file");
        configs.push(candidate);
        if is_root {
            return configs;
        }
    }

    if let Some(global) = global_config_path()
        && global.is_file()
        && !configs.contains(&global)
    {
        configs.push(global);
    }

    configs
}

/// Returns the path of the global configuration file (`~/.redline.toml`).
///
/// Returns `None` if the home directory cannot be determined.
pub fn global_config_path() -> Option<PathBuf> {
    BaseDirs::new().map(|dirs| dirs.home_dir().join(CONFIG_FILENAME))
}

/// Returns true if `path` is the global configuration file.
pub fn is_global_config(path: &Path) -> bool {
    global_config_path().is_some_and(|global| path == global)
}
