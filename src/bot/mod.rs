//! Chat-facing layer: parses inbound messages and renders replies.

/// Slash command and button parsing.
pub mod command;

/// Fixed bot copy and reply formatting.
pub mod messages;

mod router;

pub use router::{EventRouter, Keyboard, Reply};
