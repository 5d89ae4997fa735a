//! Chat transports that deliver messages to the router and send replies back.

/// Interactive local REPL.
pub mod console;

/// Telegram Bot API long-polling transport.
pub mod telegram;

pub use console::ConsoleTransport;
pub use telegram::TelegramTransport;
