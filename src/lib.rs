//! # elarion - Telegram translation bot
//!
//! `elarion` is a Telegram bot that translates text between a fixed set of
//! language pairs, keeps a per-user translation history and counts how often
//! each user translates.
//!
//! ## Features
//!
//! - **Direction buttons**: pick a pair from the reply keyboard, then send text
//! - **Explicit translation**: `/translate <lang> <text>` for any supported code
//! - **History and stats**: `/history` and `/stats` backed by `SQLite`
//! - **Console mode**: talk to the bot locally with `elarion console`
//!
//! ## Quick Start
//!
//! ```bash
//! export BOT_TOKEN="123456:ABC..."
//! export GOOGLE_API_KEY="..."
//! elarion run
//!
//! # Try it without Telegram
//! elarion console
//! ```
//!
//! ## Configuration
//!
//! Settings are stored in `~/.config/elarion/config.toml`:
//!
//! ```toml
//! [bot]
//! token_env = "BOT_TOKEN"
//!
//! [provider]
//! kind = "google"
//! api_key_env = "GOOGLE_API_KEY"
//!
//! [storage]
//! path = "/var/lib/elarion/trans.db"
//! ```

/// Component wiring shared by the bot and console commands.
pub mod app;

/// Command parsing, the event router and reply copy.
pub mod bot;

/// Command-line interface definitions and handlers.
pub mod cli;

/// Configuration file management and provider settings.
pub mod config;

/// Tracing subscriber setup.
pub mod logging;

/// XDG-style path utilities for configuration and data.
pub mod paths;

/// Translation orchestration: sessions, provider calls and persistence.
pub mod pipeline;

/// Pending translation-direction selections per user.
pub mod session;

/// Translation history and usage statistics persistence.
pub mod store;

/// Translation provider clients and language codes.
pub mod translation;

/// Chat transports (Telegram and local console).
pub mod transport;

/// Terminal UI components (spinner, colors).
pub mod ui;
