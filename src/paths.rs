//! XDG-style path utilities for configuration and data directories.
//!
//! XDG Base Directory conventions are preferred over OS-specific locations
//! so the bot behaves the same on a desktop and on a server.

use anyhow::{Context, Result};
use std::path::PathBuf;

const APP_DIR: &str = "elarion";

/// Returns the configuration directory for elarion.
///
/// Resolution order:
/// 1. `$XDG_CONFIG_HOME/elarion` if `XDG_CONFIG_HOME` is set
/// 2. `~/.config/elarion` otherwise
pub fn config_dir() -> Result<PathBuf> {
    match std::env::var("XDG_CONFIG_HOME") {
        Ok(xdg) if !xdg.is_empty() => Ok(PathBuf::from(xdg).join(APP_DIR)),
        _ => Ok(home_dir()?.join(".config").join(APP_DIR)),
    }
}

/// Returns the data directory for elarion, where the database lives.
///
/// Resolution order:
/// 1. `$XDG_DATA_HOME/elarion` if `XDG_DATA_HOME` is set
/// 2. `~/.local/share/elarion` otherwise
pub fn data_dir() -> Result<PathBuf> {
    match std::env::var("XDG_DATA_HOME") {
        Ok(xdg) if !xdg.is_empty() => Ok(PathBuf::from(xdg).join(APP_DIR)),
        _ => Ok(home_dir()?
            .join(".local")
            .join("share")
            .join(APP_DIR)),
    }
}

/// Default location of the translation database.
pub fn default_db_path() -> Result<PathBuf> {
    Ok(data_dir()?.join("trans.db"))
}

fn home_dir() -> Result<PathBuf> {
    dirs::home_dir().context("Failed to determine home directory")
}
