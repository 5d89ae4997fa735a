//! Subcommand implementations.

use anyhow::Result;
use std::path::Path;

use crate::config::{ConfigFile, ConfigManager, ResolveOptions, ResolvedConfig, resolve_config};

/// Configure command handler.
pub mod config;

/// Console mode command handler.
pub mod console;

/// Bot command handler.
pub mod run;

/// Picks the config file from `--config`, or the default location.
pub(crate) fn config_manager(path: Option<&Path>) -> Result<ConfigManager> {
    path.map_or_else(ConfigManager::new, |p| Ok(ConfigManager::with_path(p)))
}

/// Loads the config file and resolves it against CLI overrides.
pub(crate) fn load_resolved(
    config_path: Option<&Path>,
    db_path: Option<&Path>,
) -> Result<(ConfigFile, ResolvedConfig)> {
    let manager = config_manager(config_path)?;
    let config_file = manager.load_or_default()?;
    let options = ResolveOptions {
        db_path: db_path.map(Path::to_path_buf),
    };
    let resolved = resolve_config(&options, &config_file)?;
    Ok((config_file, resolved))
}
