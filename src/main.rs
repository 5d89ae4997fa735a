use anyhow::Result;
use clap::Parser;

use elarion::cli::commands::{config, console, run};
use elarion::cli::{Args, Command};
use elarion::logging;
use elarion::translation::print_languages;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    logging::init(args.verbose);

    match args.command {
        Some(Command::Languages) => {
            print_languages();
        }
        Some(Command::Config { init, show }) => {
            if init {
                config::init_config(args.config.as_deref())?;
            } else if show {
                config::show_config(args.config.as_deref(), args.db.as_deref())?;
            } else {
                config::print_config_path(args.config.as_deref())?;
            }
        }
        Some(Command::Console { user_id, name }) => {
            let options = console::ConsoleOptions {
                config: args.config,
                db: args.db,
                user_id,
                name,
            };
            console::run_console(options).await?;
        }
        Some(Command::Run) | None => {
            let options = run::RunOptions {
                config: args.config,
                db: args.db,
            };
            run::run_bot(options).await?;
        }
    }

    Ok(())
}
