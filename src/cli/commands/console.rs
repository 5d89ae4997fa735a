use anyhow::Result;
use std::path::PathBuf;
use std::sync::Arc;

use super::load_resolved;
use crate::app::App;
use crate::pipeline::UserRef;
use crate::session;
use crate::transport::ConsoleTransport;

pub struct ConsoleOptions {
    pub config: Option<PathBuf>,
    pub db: Option<PathBuf>,
    pub user_id: i64,
    pub name: String,
}

pub async fn run_console(options: ConsoleOptions) -> Result<()> {
    let (_, resolved) = load_resolved(options.config.as_deref(), options.db.as_deref())?;

    let app = App::build(&resolved)?;
    let sweeper = session::spawn_sweeper(
        Arc::clone(&app.sessions),
        resolved.session_idle_timeout,
        resolved.session_sweep_interval,
    );

    let console = ConsoleTransport::new(app.router, UserRef::new(options.user_id, options.name));
    let result = console.run().await;

    sweeper.abort();
    result
}
