//! Config inspection and template command handler.

use anyhow::Result;
use std::path::Path;

use super::config_manager;
use crate::config::{ConfigFile, ProviderKind};
use crate::paths;
use crate::ui::Style;

/// Writes the commented template to the config path.
pub fn init_config(config_path: Option<&Path>) -> Result<()> {
    let manager = config_manager(config_path)?;
    manager.init_template()?;
    println!(
        "{} Wrote {}",
        Style::success("✓"),
        Style::value(manager.config_path().display())
    );
    Ok(())
}

/// Prints the effective settings, masking secrets.
pub fn show_config(config_path: Option<&Path>, db_override: Option<&Path>) -> Result<()> {
    let manager = config_manager(config_path)?;

    if !manager.exists() {
        println!(
            "No config file at {}; using defaults and environment variables.",
            manager.config_path().display()
        );
        println!("Run 'elarion config --init' to create one.");
        println!();
    }

    let config = manager.load_or_default()?;
    print_config(&config, db_override)
}

fn set_or_not(present: bool) -> String {
    if present {
        Style::success("(set)")
    } else {
        Style::error("(not set)")
    }
}

fn print_config(config: &ConfigFile, db_override: Option<&Path>) -> Result<()> {
    let provider = &config.provider;
    let kind = match provider.kind {
        ProviderKind::Google => "google",
        ProviderKind::ChatCompletions => "chat_completions",
    };

    let db_path = match db_override.or(config.storage.path.as_deref()) {
        Some(path) => path.to_path_buf(),
        None => paths::default_db_path()?,
    };

    println!("{}", Style::header("Configuration"));
    println!(
        "  {}   {}",
        Style::label("bot token"),
        set_or_not(config.bot.get_token().is_some())
    );
    println!("  {}    {}", Style::label("provider"), Style::value(kind));
    if let Some(endpoint) = &provider.endpoint {
        println!("  {}    {}", Style::label("endpoint"), Style::secondary(endpoint));
    }
    if let Some(model) = &provider.model {
        println!("  {}       {}", Style::label("model"), Style::value(model));
    }
    println!(
        "  {}     {}",
        Style::label("api key"),
        set_or_not(provider.get_api_key().is_some())
    );
    println!(
        "  {}    {}",
        Style::label("database"),
        Style::secondary(db_path.display())
    );
    println!();
    Ok(())
}

/// Prints where the config file lives and whether it exists yet.
pub fn print_config_path(config_path: Option<&Path>) -> Result<()> {
    let manager = config_manager(config_path)?;
    let status = if manager.exists() {
        Style::success("exists")
    } else {
        Style::secondary("not created")
    };
    println!("{} ({status})", manager.config_path().display());
    Ok(())
}
