//! Platform-specific configuration paths.
//!
//! Every stage reads the same per-user file. `--config` and `ANURA_CONFIG`
//! overrides are resolved in the CLI layer before these defaults apply.

use crate::constants::{APP_NAME, CONFIG_FILE_NAME};
use crate::error::{Error, Result};
use directories::ProjectDirs;
use std::path::PathBuf;

/// Per-user configuration directory.
///
/// `~/.config/anura/` on Linux, `~/Library/Application Support/anura/` on
/// macOS, `%APPDATA%\anura\` on Windows.
pub fn config_dir() -> Result<PathBuf> {
    ProjectDirs::from("", "", APP_NAME)
        .map(|dirs| dirs.config_dir().to_path_buf())
        .ok_or(Error::ConfigDirNotFound)
}

/// Default config file path: `config.toml` inside [`config_dir`].
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}
