//! Per-user pending translation-direction selections.

mod direction;
mod registry;

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::debug;

pub use direction::Direction;
pub use registry::{Selection, SessionRegistry};

/// Spawns a background task that expires abandoned selections every
/// `interval`, dropping the ones older than `idle`.
pub fn spawn_sweeper(
    registry: Arc<SessionRegistry>,
    idle: Duration,
    interval: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        // the first tick completes immediately
        ticker.tick().await;

        loop {
            ticker.tick().await;
            let removed = registry.sweep_expired(idle);
            if removed > 0 {
                debug!(removed, remaining = registry.len(), "expired idle sessions");
            }
        }
    })
}
