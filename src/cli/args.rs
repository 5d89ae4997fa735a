use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "elarion")]
#[command(about = "Telegram translation bot with history and usage statistics")]
#[command(version)]
pub struct Args {
    /// Path to the config file (defaults to ~/.config/elarion/config.toml)
    #[arg(short = 'c', long, global = true)]
    pub config: Option<PathBuf>,

    /// Path to the SQLite database
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the Telegram bot (default)
    Run,
    /// Chat with the bot locally in the terminal
    Console {
        /// User id to chat as
        #[arg(short = 'u', long, default_value_t = 1)]
        user_id: i64,

        /// Display name to chat as
        #[arg(short = 'n', long, default_value = "console")]
        name: String,
    },
    /// List built-in language codes
    Languages,
    /// Show or initialise the configuration file
    Config {
        /// Write a commented template config file
        #[arg(long, conflicts_with = "show")]
        init: bool,

        /// Show the resolved configuration
        #[arg(long)]
        show: bool,
    },
}
