use anyhow::Result;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use super::load_resolved;
use crate::app::App;
use crate::session;
use crate::transport::TelegramTransport;

pub struct RunOptions {
    pub config: Option<PathBuf>,
    pub db: Option<PathBuf>,
}

pub async fn run_bot(options: RunOptions) -> Result<()> {
    let (config_file, resolved) = load_resolved(options.config.as_deref(), options.db.as_deref())?;
    let token = resolved.require_bot_token(&config_file)?.to_string();

    let app = App::build(&resolved)?;
    let sweeper = session::spawn_sweeper(
        Arc::clone(&app.sessions),
        resolved.session_idle_timeout,
        resolved.session_sweep_interval,
    );

    let transport = Arc::new(TelegramTransport::new(
        &token,
        resolved.poll_timeout,
        Arc::clone(&app.router),
    )?);

    info!(db = %resolved.db_path.display(), "starting bot");
    let result = transport.run().await;

    sweeper.abort();
    result
}
