//! Configuration file management.

mod manager;

pub use manager::{
    BotConfig, CONFIG_TEMPLATE, ConfigFile, ConfigManager, ProviderConfig, ProviderKind,
    ResolveOptions, ResolvedConfig, ResolvedProvider, SessionConfig, StorageConfig,
    resolve_config,
};
